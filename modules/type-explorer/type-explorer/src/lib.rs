//! Type Explorer Implementation
//!
//! Holds the latest type-system description fetched from a metadata server and
//! answers lookups against it. The public contracts live in `type-explorer-sdk`
//! and are re-exported here.
//!
//! ## Architecture
//!
//! - **Snapshot cache**: one immutable snapshot published through an atomic swap;
//!   readers never observe a partial update
//! - **Pluggable collaborators**: transport, failure reporting and session state
//!   are injected as trait objects
//! - **HTTP fetcher**: hyper client over rustls for talking to a real server

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === PUBLIC API (from SDK) ===
pub use type_explorer_sdk::{
    FailureReporter, FetchError, LoadFailure, LoadResult, SessionContext, TypeCategory,
    TypeDescriptor, TypeFetcher, TypeMap, TypeRegistrySnapshot, TypesRequest, TypesResponse,
};

// === CONFIGURATION ===
pub mod config;
pub use config::{TlsRoots, TypeExplorerConfig};

// === CACHE ===
pub mod domain;
pub use domain::{GET_TYPES_OPERATION, LoadHandle, TypeRegistryCache};

// === COLLABORATORS ===
pub mod infra;
pub use infra::{
    HttpTypeFetcher, RecordingFailureReporter, ReportedFailure, SessionState,
    TracingFailureReporter,
};
