use std::io;
use thiserror::Error;

/// Custom error type for devinfo
#[derive(Error, Debug)]
pub enum DevinfoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Not supported on this platform: {0}")]
    Unsupported(String),

    #[error("Unknown permission: {0}")]
    InvalidPermission(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for devinfo
pub type Result<T> = std::result::Result<T, DevinfoError>;

impl DevinfoError {
    /// Create a probe failure
    pub fn probe<S: Into<String>>(msg: S) -> Self {
        DevinfoError::Probe(msg.into())
    }

    /// Create an unsupported-fact error
    pub fn unsupported<S: Into<String>>(what: S) -> Self {
        DevinfoError::Unsupported(what.into())
    }

    pub fn invalid_permission<S: Into<String>>(id: S) -> Self {
        DevinfoError::InvalidPermission(id.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        DevinfoError::Other(msg.into())
    }
}
