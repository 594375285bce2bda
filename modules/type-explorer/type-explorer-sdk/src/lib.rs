//! Type Explorer SDK
//!
//! This crate provides the public contracts of the type explorer:
//! - `TypeRegistrySnapshot` and `TypeDescriptor`, the cached type-system description
//! - `TypesRequest` / `TypesResponse`, the wire shapes exchanged with a metadata server
//! - `TypeFetcher`, `FailureReporter` and `SessionContext`, the collaborators the cache
//!   depends on
//! - `FetchError` and `LoadFailure` for error handling
//!
//! ## Usage
//!
//! ```ignore
//! use type_explorer_sdk::{TypeCategory, TypeFetcher, TypesRequest};
//!
//! let request = TypesRequest::new("cocoMDS1", "platform", false);
//! let response = fetcher.fetch_types(&request).await?;
//! let entities = response.type_explorer.and_then(|tex| tex.category(TypeCategory::Entity).cloned());
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root for convenience
pub use api::{FailureReporter, LoadResult, SessionContext, TypeFetcher};
pub use error::{FetchError, LoadFailure};
pub use models::{
    ParseCategoryError, TypeCategory, TypeDescriptor, TypeMap, TypeRegistrySnapshot, TypesRequest,
    TypesResponse,
};
