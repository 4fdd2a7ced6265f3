//! Error types for parkmeans.
//!
//! Errors carry a status code plus a human readable message. The code decides
//! how the command-line driver terminates (see [`ErrorCode::exit_code`]).

use std::fmt;
use std::io;
use thiserror::Error;

/// Exit code used when an input or output file cannot be opened, read or written.
pub const EXIT_IO_FAILURE: u8 = 2;

/// Exit code used for every other fatal condition.
pub const EXIT_FAILURE: u8 = 1;

/// Error codes for clustering and I/O operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid argument provided.
    InvalidArgument,
    /// File or resource not found.
    NotFound,
    /// Permission denied while accessing a file.
    PermissionDenied,
    /// Any other I/O failure.
    Io,
    /// Input content could not be parsed.
    InvalidData,
    /// Allocation or thread creation failed.
    ResourceExhausted,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// Whether this code describes a failure of the I/O layer.
    pub fn is_io(self) -> bool {
        matches!(
            self,
            ErrorCode::NotFound | ErrorCode::PermissionDenied | ErrorCode::Io
        )
    }

    /// Process exit code for a run that failed with this code.
    pub fn exit_code(self) -> u8 {
        if self.is_io() {
            EXIT_IO_FAILURE
        } else {
            EXIT_FAILURE
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            ErrorCode::Io => write!(f, "IO"),
            ErrorCode::InvalidData => write!(f, "INVALID_DATA"),
            ErrorCode::ResourceExhausted => write!(f, "RESOURCE_EXHAUSTED"),
            ErrorCode::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Main error type for parkmeans operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct KMeansError {
    code: ErrorCode,
    message: String,
}

impl KMeansError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, msg)
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, msg)
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidData, msg)
    }

    /// Create a resource exhausted error.
    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceExhausted, msg)
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    /// Wrap an I/O error, prefixing the message with some context (usually a path).
    pub fn io(context: impl fmt::Display, err: io::Error) -> Self {
        let code = code_for_io_kind(err.kind());
        Self::new(code, format!("{context}: {err}"))
    }
}

fn code_for_io_kind(kind: io::ErrorKind) -> ErrorCode {
    match kind {
        io::ErrorKind::NotFound => ErrorCode::NotFound,
        io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
        io::ErrorKind::OutOfMemory => ErrorCode::ResourceExhausted,
        _ => ErrorCode::Io,
    }
}

impl From<io::Error> for KMeansError {
    fn from(err: io::Error) -> Self {
        Self::new(code_for_io_kind(err.kind()), err.to_string())
    }
}

impl From<std::collections::TryReserveError> for KMeansError {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::resource_exhausted(err.to_string())
    }
}

/// Result type alias for parkmeans operations.
pub type Result<T> = std::result::Result<T, KMeansError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = KMeansError::invalid_argument("bad value");
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.message(), "bad value");
    }

    #[test]
    fn test_error_display() {
        let err = KMeansError::not_found("data.csv");
        let display = format!("{}", err);
        assert!(display.contains("NOT_FOUND"));
        assert!(display.contains("data.csv"));
    }

    #[test]
    fn test_io_error_mapping() {
        let err = KMeansError::io(
            "data.csv",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(err.message().starts_with("data.csv: "));

        let err: KMeansError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.code(), ErrorCode::PermissionDenied);

        let err: KMeansError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert_eq!(err.code(), ErrorCode::Io);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorCode::NotFound.exit_code(), EXIT_IO_FAILURE);
        assert_eq!(ErrorCode::PermissionDenied.exit_code(), EXIT_IO_FAILURE);
        assert_eq!(ErrorCode::Io.exit_code(), EXIT_IO_FAILURE);
        assert_eq!(ErrorCode::InvalidData.exit_code(), EXIT_FAILURE);
        assert_eq!(ErrorCode::InvalidArgument.exit_code(), EXIT_FAILURE);
        assert_eq!(ErrorCode::ResourceExhausted.exit_code(), EXIT_FAILURE);
        assert_ne!(EXIT_IO_FAILURE, 0);
    }
}
