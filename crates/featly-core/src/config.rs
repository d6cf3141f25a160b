// ── Runtime connection configuration ──
//
// These types describe *how* to reach the feature items API.
// Built in memory by the caller; nothing here reads or writes files.
// The CLI (or any other front end) constructs a `ClientConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::filters::FilterDescriptor;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// Configuration for one feature session.
///
/// Built by the CLI, passed to `HttpTransport` and `CollectionController`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., `https://app.example.com`).
    pub base_url: Url,
    /// Optional API key, sent as `X-API-KEY`.
    pub api_key: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Descriptor the controller starts from.
    pub initial_filters: FilterDescriptor,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            initial_filters: FilterDescriptor::default(),
        }
    }

    pub(crate) fn transport_config(&self) -> featly_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => featly_api::TlsMode::System,
            TlsVerification::CustomCa(path) => featly_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => featly_api::TlsMode::DangerAcceptInvalid,
        };
        featly_api::TransportConfig {
            tls,
            timeout: self.timeout,
            api_key: self.api_key.clone(),
        }
    }
}
