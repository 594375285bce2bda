//! Public error types for the type explorer.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by a [`TypeFetcher`](crate::TypeFetcher) when no payload
/// could be obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchError {
    /// The endpoint URL or request could not be built.
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// Network or connection level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status}: {body_preview}")]
    HttpStatus { status: u16, body_preview: String },

    /// The response body exceeded the configured size limit.
    #[error("Response body too large: limit {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The response body was not a valid types payload.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Creates an `InvalidEndpoint` error.
    #[must_use]
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a `Decode` error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns the HTTP status if the server answered with one.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Diagnostic handed to a [`FailureReporter`](crate::FailureReporter) when a
/// load does not produce a new snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadFailure {
    /// The load was rejected before any request was issued.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The fetcher could not produce a payload.
    #[error(transparent)]
    Transport(#[from] FetchError),

    /// The payload carried a status code other than 200, with the server's
    /// exception class and message when it sent them.
    #[error(
        "Server returned status {code}{}{}",
        exception_class.as_deref().map(|c| format!(" ({c})")).unwrap_or_default(),
        message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    UnexpectedStatus {
        code: u16,
        exception_class: Option<String>,
        message: Option<String>,
    },

    /// The payload had a success status but no type explorer section.
    #[error("Response did not contain a type explorer")]
    MissingTypeExplorer,
}

impl LoadFailure {
    /// Creates an `InvalidRequest` failure.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns `true` if the failure came from the transport layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if a payload arrived but had the wrong shape or status.
    #[must_use]
    pub const fn is_semantic(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedStatus { .. } | Self::MissingTypeExplorer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_constructors() {
        let err = FetchError::invalid_endpoint("ftp://x", "unsupported scheme");
        assert!(err.to_string().contains("unsupported scheme"));

        let err = FetchError::transport("connection refused");
        assert_eq!(err.to_string(), "Transport error: connection refused");

        let err = FetchError::Timeout(Duration::from_secs(5));
        assert!(err.is_timeout());
        assert_eq!(err.http_status(), None);

        let err = FetchError::HttpStatus {
            status: 503,
            body_preview: "unavailable".to_owned(),
        };
        assert_eq!(err.http_status(), Some(503));
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }

    #[test]
    fn test_load_failure_classification() {
        let err = LoadFailure::from(FetchError::transport("reset"));
        assert!(err.is_transport());
        assert!(!err.is_semantic());
        assert_eq!(err.to_string(), "Transport error: reset");

        let err = LoadFailure::UnexpectedStatus {
            code: 400,
            exception_class: None,
            message: Some("unknown server".to_owned()),
        };
        assert!(err.is_semantic());
        assert_eq!(err.to_string(), "Server returned status 400: unknown server");

        let err = LoadFailure::UnexpectedStatus {
            code: 404,
            exception_class: Some("InvalidParameterException".to_owned()),
            message: Some("unknown server".to_owned()),
        };
        assert_eq!(
            err.to_string(),
            "Server returned status 404 (InvalidParameterException): unknown server"
        );

        let err = LoadFailure::UnexpectedStatus {
            code: 500,
            exception_class: None,
            message: None,
        };
        assert_eq!(err.to_string(), "Server returned status 500");

        assert!(LoadFailure::MissingTypeExplorer.is_semantic());

        let err = LoadFailure::invalid_request("server name must not be empty");
        assert!(!err.is_transport());
        assert!(!err.is_semantic());
    }
}
