// ── Core error types ──
//
// Domain-level errors from featly-core. Consumers never see reqwest
// errors or raw JSON failures directly; the `From<featly_api::Error>`
// impl translates transport-layer errors into these variants.

use thiserror::Error;

/// Failure recorded by a resource run.
///
/// Every failed `AsyncResource::run` stores one of these (behind an
/// `Arc`) in the resource's `last_error`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Server-supplied error code, when the body carried one.
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Wrap any displayable failure that has no better-fitting variant.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<featly_api::Error> for CoreError {
    fn from(err: featly_api::Error) -> Self {
        match err {
            featly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            featly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        entity_type: "resource".into(),
                        identifier: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            featly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            featly_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            featly_api::Error::Api {
                message,
                status: 404,
                ..
            } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            featly_api::Error::Api {
                message,
                status: 400 | 422,
                ..
            } => CoreError::ValidationFailed { message },
            featly_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            featly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> featly_api::Error {
        featly_api::Error::Api {
            message: message.into(),
            code: Some("code".into()),
            status,
        }
    }

    #[test]
    fn maps_404_to_not_found() {
        let err = CoreError::from(api(404, "gone"));
        assert!(err.is_not_found());
    }

    #[test]
    fn maps_422_to_validation() {
        let err = CoreError::from(api(422, "title is required"));
        assert!(
            matches!(err, CoreError::ValidationFailed { ref message } if message == "title is required")
        );
    }

    #[test]
    fn keeps_status_and_code_for_other_api_errors() {
        let err = CoreError::from(api(500, "boom"));
        match err {
            CoreError::Api {
                message,
                code,
                status,
            } => {
                assert_eq!(message, "boom");
                assert_eq!(code.as_deref(), Some("code"));
                assert_eq!(status, Some(500));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn internal_keeps_original_message() {
        let err = CoreError::internal("socket hung up");
        assert_eq!(err.to_string(), "Internal error: socket hung up");
    }
}
