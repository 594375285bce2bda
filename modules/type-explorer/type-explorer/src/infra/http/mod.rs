//! HTTP implementation of [`TypeFetcher`].
//!
//! Sends the types request as JSON to `{base_url}/servers/{server}/types` over a
//! pooled hyper client. HTTPS only unless the configuration allows plain HTTP.

mod tls;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, Request, Uri};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tracing::{debug, warn};
use type_explorer_sdk::{FetchError, LoadResult, TypeFetcher, TypesRequest};

use crate::config::TypeExplorerConfig;

const BODY_PREVIEW_LIMIT: usize = 256;

type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Fetches type-system descriptions from a metadata server over HTTP(S).
///
/// Cloning the inner hyper client is cheap and connections are pooled, so one
/// fetcher can serve any number of concurrent loads.
pub struct HttpTypeFetcher {
    client: HyperClient,
    base_url: String,
    request_timeout: Duration,
    user_agent: HeaderValue,
    max_body_size: usize,
}

impl HttpTypeFetcher {
    /// Builds a fetcher from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidEndpoint`] if the base URL is malformed, uses a
    /// scheme the configuration does not allow, or the user agent is not a valid
    /// header value; [`FetchError::Transport`] if TLS cannot be set up.
    pub fn new(config: &TypeExplorerConfig) -> Result<Self, FetchError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        check_base_url(&base_url, config.allow_insecure_http)?;

        if config.allow_insecure_http {
            warn!("insecure HTTP enabled for the type fetcher; use only for local servers");
        }

        let https = tls::https_connector(config.tls_roots, config.allow_insecure_http)?;
        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .build::<_, Full<Bytes>>(https);

        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            FetchError::invalid_endpoint(&base_url, format!("invalid user agent: {e}"))
        })?;

        Ok(Self {
            client,
            base_url,
            request_timeout: config.request_timeout,
            user_agent,
            max_body_size: config.max_body_size,
        })
    }

    /// URL the types request for `server_name` is sent to.
    #[must_use]
    pub fn endpoint(&self, server_name: &str) -> String {
        format!(
            "{}/servers/{}/types",
            self.base_url,
            urlencoding::encode(server_name)
        )
    }

    async fn send(&self, request: &TypesRequest) -> LoadResult {
        let url = self.endpoint(&request.server_name);
        let body = serde_json::to_vec(request)
            .map_err(|e| FetchError::invalid_endpoint(&url, format!("cannot encode request: {e}")))?;

        let http_request = Request::post(url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.user_agent.clone())
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| FetchError::invalid_endpoint(&url, e.to_string()))?;

        debug!(url = %url, "sending types request");
        let response = self
            .client
            .request(http_request)
            .await
            .map_err(|e| FetchError::transport(error_chain(&e)))?;

        let status = response.status();
        let limit = self.max_body_size;
        let body = Limited::new(response.into_body(), limit)
            .collect()
            .await
            .map_err(|e| {
                if e.downcast_ref::<LengthLimitError>().is_some() {
                    FetchError::BodyTooLarge { limit }
                } else {
                    FetchError::transport(e.to_string())
                }
            })?
            .to_bytes();

        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "types response received");

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body_preview: preview(&body),
            });
        }

        serde_json::from_slice(&body).map_err(|e| FetchError::decode(e.to_string()))
    }
}

#[async_trait]
impl TypeFetcher for HttpTypeFetcher {
    async fn fetch_types(&self, request: &TypesRequest) -> LoadResult {
        let timeout = self.request_timeout;
        tokio::time::timeout(timeout, self.send(request))
            .await
            .unwrap_or(Err(FetchError::Timeout(timeout)))
    }
}

fn check_base_url(base_url: &str, allow_insecure_http: bool) -> Result<(), FetchError> {
    let uri: Uri = base_url
        .parse()
        .map_err(|e: http::uri::InvalidUri| FetchError::invalid_endpoint(base_url, e.to_string()))?;

    if uri.authority().is_none() {
        return Err(FetchError::invalid_endpoint(base_url, "missing host"));
    }
    match uri.scheme_str() {
        Some("https") => Ok(()),
        Some("http") if allow_insecure_http => Ok(()),
        Some("http") => Err(FetchError::invalid_endpoint(
            base_url,
            "plain http requires allow_insecure_http",
        )),
        _ => Err(FetchError::invalid_endpoint(
            base_url,
            "scheme must be http or https",
        )),
    }
}

fn preview(body: &[u8]) -> String {
    let end = body.len().min(BODY_PREVIEW_LIMIT);
    String::from_utf8_lossy(&body[..end]).into_owned()
}

/// Display of `err` followed by its sources; hyper's top-level messages are terse.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str, allow_insecure_http: bool) -> TypeExplorerConfig {
        TypeExplorerConfig {
            base_url: base_url.to_owned(),
            allow_insecure_http,
            ..TypeExplorerConfig::default()
        }
    }

    #[test]
    fn test_check_base_url() {
        assert!(check_base_url("https://egeria.local:9443", false).is_ok());
        assert!(check_base_url("http://localhost:8080", true).is_ok());

        let err = check_base_url("http://localhost:8080", false).unwrap_err();
        assert!(err.to_string().contains("allow_insecure_http"));

        assert!(check_base_url("ftp://files.local", true).is_err());
        assert!(check_base_url("/relative/path", true).is_err());
        assert!(check_base_url("not a url", true).is_err());
    }

    #[tokio::test]
    async fn test_endpoint_encodes_server_name() {
        let fetcher = HttpTypeFetcher::new(&config("http://localhost:8080/", true)).unwrap();
        assert_eq!(
            fetcher.endpoint("cocoMDS1"),
            "http://localhost:8080/servers/cocoMDS1/types"
        );
        assert_eq!(
            fetcher.endpoint("my server/1"),
            "http://localhost:8080/servers/my%20server%2F1/types"
        );
    }

    #[test]
    fn test_preview_truncates() {
        let body = vec![b'x'; 1000];
        assert_eq!(preview(&body).len(), BODY_PREVIEW_LIMIT);
        assert_eq!(preview(b"short"), "short");
    }

    #[test]
    fn test_error_chain_includes_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("connect failed")]
        struct Wrapper(#[source] std::io::Error);

        let err = Wrapper(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert_eq!(error_chain(&err), "connect failed: refused");
    }
}
