//! Error types for the inventory core.
//!
//! Every fallible operation in the crate returns [`Result`]. The variants
//! map one-to-one onto the outcomes a caller has to distinguish: endpoint
//! not configured, transport failure, remote rejection, local persistence
//! failure, and invalid payloads.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for inventory operations.
#[derive(Debug, Error)]
pub enum PatrimonioError {
    /// No usable registry endpoint is configured. Not retryable until the
    /// configuration changes.
    #[error("Registry endpoint is not configured")]
    NotConfigured,

    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// The registry service answered but reported failure in its response
    /// envelope. The remote message is surfaced verbatim.
    #[error("Registry error: {message}")]
    Service { message: String },

    // Local persistence errors
    #[error("Storage error at {path:?}: {message}")]
    Storage {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },
}

/// Result type alias for inventory operations.
pub type Result<T> = std::result::Result<T, PatrimonioError>;

// Conversion implementations for common error types

impl From<std::io::Error> for PatrimonioError {
    fn from(err: std::io::Error) -> Self {
        PatrimonioError::Storage {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for PatrimonioError {
    fn from(err: serde_json::Error) -> Self {
        PatrimonioError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for PatrimonioError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PatrimonioError::Timeout(crate::config::NetworkConfig::REQUEST_TIMEOUT)
        } else {
            PatrimonioError::Network {
                message: err.to_string(),
                source: Some(err),
            }
        }
    }
}

impl PatrimonioError {
    /// Create a storage error with path context.
    pub fn storage_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        PatrimonioError::Storage {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PatrimonioError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error may succeed on a later explicit sync attempt.
    ///
    /// Only transport-level failures qualify; a `Service` rejection means
    /// the payload itself was refused and retrying it will not help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PatrimonioError::Network { .. } | PatrimonioError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PatrimonioError::Service {
            message: "Erro desconhecido".into(),
        };
        assert_eq!(err.to_string(), "Registry error: Erro desconhecido");

        assert_eq!(
            PatrimonioError::NotConfigured.to_string(),
            "Registry endpoint is not configured"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(PatrimonioError::Network {
            message: "connection refused".into(),
            source: None,
        }
        .is_retryable());
        assert!(PatrimonioError::Timeout(std::time::Duration::from_secs(15)).is_retryable());

        assert!(!PatrimonioError::NotConfigured.is_retryable());
        assert!(!PatrimonioError::Service {
            message: "linha inexistente".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: PatrimonioError = io.into();
        assert!(matches!(err, PatrimonioError::Storage { .. }));
        assert!(!err.is_retryable());
    }
}
