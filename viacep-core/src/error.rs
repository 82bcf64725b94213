//! Error types for the ViaCEP client.
//!
//! One error enum covers validation, transport, decoding and cache failures.
//! Cache reads never produce an error; see [`crate::traits::Cache`].

use thiserror::Error;

/// Result type alias using `ViaCepError`.
pub type Result<T> = std::result::Result<T, ViaCepError>;

/// Boxed underlying cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all ViaCEP operations.
#[derive(Debug, Error)]
pub enum ViaCepError {
    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The postal code is not 8 digits (optionally `NNNNN-NNN`).
    #[error("Invalid CEP '{0}': expected 8 digits")]
    InvalidCep(String),

    /// A search argument does not meet the API's requirements.
    #[error("Invalid search: {0}")]
    InvalidSearch(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The request never produced a response (DNS, refused connection, TLS...).
    #[error("failed to send GET request to {url}: {source}")]
    Transport {
        /// Requested URL
        url: String,
        /// Underlying client error
        #[source]
        source: BoxError,
    },

    /// The request did not complete before its deadline.
    #[error("failed to send GET request to {url}: deadline exceeded")]
    Timeout {
        /// Requested URL
        url: String,
    },

    /// The service answered with anything other than 200.
    #[error("API request to {url} returned status code {status}; expected 200 (OK)")]
    UnexpectedStatus {
        /// Requested URL
        url: String,
        /// Observed HTTP status code
        status: u16,
    },

    /// The response body is not the expected JSON shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// Requested URL
        url: String,
        /// JSON decode error
        #[source]
        source: serde_json::Error,
    },

    /// The service reports that the CEP does not exist.
    #[error("CEP not found: {0}")]
    CepNotFound(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CACHE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A value could not be encoded for storage.
    #[error("failed to encode value of type {type_name}: {reason}")]
    Encode {
        /// `std::any::type_name` of the rejected value
        type_name: &'static str,
        /// Encoder message
        reason: String,
    },

    /// The remote cache store failed a write or delete.
    #[error("Cache store error: {0}")]
    Store(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ViaCepError {
    /// Returns true if retrying the same call may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ViaCepError::Transport { .. } | ViaCepError::Timeout { .. } | ViaCepError::Store(_) => {
                true
            }
            ViaCepError::UnexpectedStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this is an argument validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ViaCepError::InvalidCep(_) | ViaCepError::InvalidSearch(_)
        )
    }

    /// Returns the URL of the request that failed, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            ViaCepError::Transport { url, .. }
            | ViaCepError::Timeout { url }
            | ViaCepError::UnexpectedStatus { url, .. }
            | ViaCepError::Decode { url, .. } => Some(url),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ViaCepError::UnexpectedStatus {
            url: "http://127.0.0.1:8080/ws/01001000/json/".into(),
            status: 500,
        };
        assert_eq!(
            err.to_string(),
            "API request to http://127.0.0.1:8080/ws/01001000/json/ returned status code 500; expected 200 (OK)"
        );
        assert_eq!(err.url(), Some("http://127.0.0.1:8080/ws/01001000/json/"));
    }

    #[test]
    fn test_encode_error_display() {
        let err = ViaCepError::Encode {
            type_name: "alloc::string::String",
            reason: "boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to encode value of type alloc::string::String: boom"
        );
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ViaCepError::Transport {
            url: "http://localhost:1".into(),
            source: Box::new(io),
        };
        assert!(err.to_string().starts_with("failed to send GET request to http://localhost:1: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_classification() {
        assert!(ViaCepError::Timeout { url: "u".into() }.is_recoverable());
        assert!(ViaCepError::UnexpectedStatus { url: "u".into(), status: 503 }.is_recoverable());
        assert!(!ViaCepError::UnexpectedStatus { url: "u".into(), status: 400 }.is_recoverable());
        assert!(!ViaCepError::InvalidCep("1".into()).is_recoverable());

        assert!(ViaCepError::InvalidCep("1".into()).is_validation_error());
        assert!(ViaCepError::InvalidSearch("x".into()).is_validation_error());
        assert!(!ViaCepError::CepNotFound("99999999".into()).is_validation_error());
    }
}
