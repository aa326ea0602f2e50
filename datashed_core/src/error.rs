//! Error types for the datashed core library
//!
//! This module contains all error types used throughout the library, organized
//! into logical categories for better maintainability and clarity.

use thiserror::Error;

pub mod catalog;
pub mod internal;
pub mod io;
pub mod validation;

pub use self::catalog::CatalogError;
pub use self::io::{IoError, IoErrorKind};
pub use self::validation::ValidationError;
pub use internal::InternalError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the datashed core library
///
/// Errors are categorized into four main types:
/// - I/O errors: Cache directory and file system operations
/// - Catalog errors: Remote catalog and dataset download errors
/// - Validation errors: Input validation and configuration errors
/// - Internal errors: Library internal errors
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Catalog and download related errors
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal library errors
    #[error(transparent)]
    Internal(#[from] InternalError),
}

// Conversions from external error types

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Catalog(CatalogError::from_reqwest(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Catalog(CatalogError::malformed_response(format!(
            "JSON decode error: {err}"
        )))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Validation(ValidationError::invalid_configuration(&format!(
            "Invalid catalog URL: {err}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;
    use std::path::Path;

    #[test]
    fn test_path_not_found_error_creation() {
        let path = Path::new("/cache/datasets/31");
        let error = Error::Io(IoError::path_not_found(path));

        match error {
            Error::Io(io_err) => {
                assert_eq!(io_err.kind, IoErrorKind::NotFound);
                assert_eq!(io_err.path, Some(path.to_path_buf()));
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_dataset_not_found_error() {
        let error = Error::Catalog(CatalogError::dataset_not_found(42));

        assert!(matches!(
            error,
            Error::Catalog(CatalogError::DatasetNotFound { .. })
        ));
        assert!(error.to_string().contains("42"));
        assert!(error.to_string().contains("not found"));
    }

    #[test]
    fn test_server_error_includes_status_code() {
        let error = Error::Catalog(CatalogError::server_error(503, "overloaded"));

        assert!(error.to_string().contains("503"));
        assert!(error.to_string().contains("overloaded"));
    }

    #[test]
    fn test_invalid_configuration_error() {
        let message = "cache root must be an absolute path";
        let error = Error::Validation(ValidationError::invalid_configuration(message));

        assert!(matches!(
            error,
            Error::Validation(ValidationError::InvalidConfiguration { .. })
        ));
        assert!(error.to_string().contains("Invalid configuration"));
        assert!(error.to_string().contains("cache root"));
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "No such directory");
        let error: Error = io_error.into();

        match error {
            Error::Io(io_err) => {
                assert_eq!(io_err.kind, IoErrorKind::NotFound);
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_source_chain() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "Access denied");
        let path = Path::new("/cache/datasets/7");
        let error = Error::Io(IoError::permission_denied(path, io_error));

        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_error_display_formatting() {
        let errors = vec![
            Error::Io(IoError::path_not_found(&std::path::PathBuf::from(
                "/cache/datasets/31",
            ))),
            Error::Catalog(CatalogError::ConnectionFailed {
                details: "connection refused".to_string(),
            }),
            Error::Catalog(CatalogError::dataset_not_found(31)),
            Error::Catalog(CatalogError::server_error(500, "internal error")),
            Error::Validation(ValidationError::invalid_configuration("bad setting")),
            Error::Internal(InternalError::assertion("invariant violated")),
        ];

        for error in errors {
            let display_string = error.to_string();
            assert!(!display_string.is_empty());
        }
    }
}
