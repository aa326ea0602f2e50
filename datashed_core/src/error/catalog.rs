//! Catalog and dataset download error types

use thiserror::Error;

/// Errors from the remote catalog service and dataset downloads
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Dataset does not exist upstream
    #[error("Dataset {id} not found in catalog")]
    DatasetNotFound { id: u64 },

    /// Catalog server returned a non-success status
    #[error("Catalog server error {code}: {message}")]
    ServerError { code: u16, message: String },

    /// Could not reach the catalog server
    #[error("Failed to connect to catalog: {details}")]
    ConnectionFailed { details: String },

    /// Request exceeded the configured timeout
    #[error("Catalog request timed out")]
    Timeout,

    /// Response body did not match the expected shape
    #[error("Malformed catalog response: {details}")]
    MalformedResponse { details: String },

    /// Other transport-level error
    #[error("Catalog transport error: {details}")]
    Transport { details: String },
}

impl CatalogError {
    /// Create a dataset not found error
    pub fn dataset_not_found(id: u64) -> Self {
        Self::DatasetNotFound { id }
    }

    /// Create a server error with status code context
    pub fn server_error(code: u16, message: &str) -> Self {
        Self::ServerError {
            code,
            message: message.to_string(),
        }
    }

    /// Create a malformed response error
    pub fn malformed_response(details: impl Into<String>) -> Self {
        Self::MalformedResponse {
            details: details.into(),
        }
    }

    /// Classify a reqwest transport error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionFailed {
                details: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::ServerError {
                code: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            Self::MalformedResponse {
                details: err.to_string(),
            }
        } else {
            Self::Transport {
                details: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_not_found_error() {
        let error = CatalogError::dataset_not_found(1590);
        assert!(error.to_string().contains("1590"));
        assert!(error.to_string().contains("not found"));
    }

    #[test]
    fn test_server_error() {
        let error = CatalogError::server_error(502, "bad gateway");
        assert!(error.to_string().contains("502"));
        assert!(error.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_malformed_response_error() {
        let error = CatalogError::malformed_response("missing 'datasets' field");
        assert!(error.to_string().contains("Malformed catalog response"));
        assert!(error.to_string().contains("datasets"));
    }

    #[test]
    fn test_timeout_display() {
        let error = CatalogError::Timeout;
        assert!(error.to_string().contains("timed out"));
    }
}
