//! Configuration for the type explorer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Type explorer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeExplorerConfig {
    /// Base URL of the server hosting the types endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for a single "get types" request, including reading the body.
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Value sent in the `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on the response body, in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Permit plain `http://` base URLs. Meant for local servers and tests.
    pub allow_insecure_http: bool,

    /// Where TLS root certificates come from.
    pub tls_roots: TlsRoots,

    /// Initial value of the session's enterprise option.
    pub enterprise_option: bool,
}

/// Source of trusted root certificates for HTTPS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsRoots {
    /// Mozilla roots compiled into the binary.
    #[default]
    Webpki,
    /// Roots from the operating system certificate store.
    Native,
}

fn default_base_url() -> String {
    "https://localhost:8091".to_owned()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!("type-explorer/", env!("CARGO_PKG_VERSION")).to_owned()
}

fn default_max_body_size() -> usize {
    16 * 1024 * 1024
}

impl Default for TypeExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            max_body_size: default_max_body_size(),
            allow_insecure_http: false,
            tls_roots: TlsRoots::default(),
            enterprise_option: false,
        }
    }
}

/// Human-readable durations (`"30s"`, `"2m 5s"`) via `humantime`.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }
}
