use thiserror::Error;

/// Top-level error type for the `featly-api` crate.
///
/// Covers every failure mode of the feature items REST API:
/// authentication, transport, structured API errors, and decoding.
/// `featly-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The server rejected the request credentials (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success response, decoded from `{ message, code }` when present.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Response body did not match the expected shape. `body` is kept for logs.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the server rejected the submitted data.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Api { status: 400 | 422, .. })
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> Error {
        Error::Api {
            message: "boom".into(),
            code: Some("E_TEST".into()),
            status,
        }
    }

    #[test]
    fn classifies_status_codes() {
        assert!(api(404).is_not_found());
        assert!(!api(500).is_not_found());
        assert!(api(422).is_validation());
        assert!(api(400).is_validation());
    }

    #[test]
    fn exposes_api_error_code() {
        assert_eq!(api(500).api_error_code(), Some("E_TEST"));
        assert_eq!(Error::Tls("x".into()).api_error_code(), None);
    }
}
