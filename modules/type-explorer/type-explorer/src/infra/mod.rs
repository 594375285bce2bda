//! Infrastructure layer for the type explorer.
//!
//! Contains the collaborator implementations the cache is wired to.

pub mod http;
pub mod reporter;
pub mod session;

pub use http::HttpTypeFetcher;
pub use reporter::{RecordingFailureReporter, ReportedFailure, TracingFailureReporter};
pub use session::SessionState;
