//! Collaborator traits used by the type registry cache.
//!
//! The cache owns no transport, no UI and no session state. Each of those concerns
//! is reached through one of the traits below so hosts can plug in their own.

use async_trait::async_trait;

use crate::error::{FetchError, LoadFailure};
use crate::models::{TypesRequest, TypesResponse};

/// Outcome of one fetch, as handed to the cache's completion handler.
pub type LoadResult = Result<TypesResponse, FetchError>;

/// Issues the "get types" request against a metadata server.
///
/// Implementations own every transport detail (URL shape, verb, headers, timeouts).
/// A call completes exactly once, either with the decoded payload or with a
/// diagnostic describing why no payload could be produced.
///
/// ```ignore
/// let fetcher: Arc<dyn TypeFetcher> = Arc::new(HttpTypeFetcher::new(&cfg)?);
/// let response = fetcher.fetch_types(&request).await?;
/// ```
#[async_trait]
pub trait TypeFetcher: Send + Sync {
    /// Fetch the type-system description for the server named in `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the request cannot be sent, times out, the
    /// server answers with a non-success HTTP status, or the body cannot be decoded.
    async fn fetch_types(&self, request: &TypesRequest) -> LoadResult;
}

/// Sink for operations that failed.
///
/// Reporting is fire-and-forget: nothing is returned and the caller does not wait
/// for the failure to be displayed.
pub trait FailureReporter: Send + Sync {
    fn report_failed_operation(&self, operation: &str, failure: &LoadFailure);
}

/// Read-only view of the caller's session.
pub trait SessionContext: Send + Sync {
    /// Whether requests should target the enterprise-wide view of the server.
    fn enterprise_option(&self) -> bool;
}
