//! TLS setup for the HTTP fetcher.
//!
//! Native root certificates are loaded once per process; the OS store lookup can
//! be slow on some platforms.

use std::sync::{Arc, OnceLock};

use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use rustls_pki_types::CertificateDer;
use tracing::{debug, warn};
use type_explorer_sdk::FetchError;

use crate::config::TlsRoots;

static NATIVE_ROOTS: OnceLock<Vec<CertificateDer<'static>>> = OnceLock::new();

fn load_native_roots() -> Vec<CertificateDer<'static>> {
    let result = rustls_native_certs::load_native_certs();
    for err in &result.errors {
        warn!(error = %err, "error loading native root certificate");
    }
    if result.certs.is_empty() {
        warn!("no native root CA certificates found");
    } else {
        debug!(count = result.certs.len(), "loaded native root certificates");
    }
    result.certs
}

/// Installed default provider if any, otherwise a fresh aws-lc-rs one.
fn crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

fn native_roots_client_config() -> Result<rustls::ClientConfig, FetchError> {
    let certs = NATIVE_ROOTS.get_or_init(load_native_roots);
    let mut root_store = rustls::RootCertStore::empty();
    let (added, ignored) = root_store.add_parsable_certificates(certs.iter().cloned());
    if ignored > 0 {
        warn!(added, ignored, "some native root certificates could not be parsed");
    }
    if added == 0 {
        return Err(FetchError::transport(
            "no usable native root CA certificates in the OS certificate store",
        ));
    }

    let config = rustls::ClientConfig::builder_with_provider(crypto_provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| FetchError::transport(format!("failed to set TLS protocol versions: {e}")))?
        .with_root_certificates(root_store)
        .with_no_client_auth();
    Ok(config)
}

/// Builds the connector; plain HTTP is accepted only when `allow_http` is set.
pub(super) fn https_connector(
    roots: TlsRoots,
    allow_http: bool,
) -> Result<HttpsConnector<HttpConnector>, FetchError> {
    let builder = match roots {
        TlsRoots::Webpki => hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(crypto_provider())
            .map_err(|e| FetchError::transport(format!("TLS setup failed: {e}")))?,
        TlsRoots::Native => {
            hyper_rustls::HttpsConnectorBuilder::new().with_tls_config(native_roots_client_config()?)
        }
    };
    let connector = if allow_http {
        builder.https_or_http().enable_all_versions().build()
    } else {
        builder.https_only().enable_all_versions().build()
    };
    Ok(connector)
}
