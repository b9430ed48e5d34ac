//! Error types for collaborator store operations

use std::error::Error;
use std::fmt;

/// Error type for store operations
#[derive(Debug)]
pub enum StoreError {
    /// Connection error
    Connection(String),

    /// Query error
    Query(String),

    /// Backend-specific error
    Backend(String),

    /// Data conversion error
    Conversion(String),

    /// Store timeout error
    Timeout(String),

    /// Other error
    Other(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Connection(msg) => write!(f, "Connection error: {}", msg),
            StoreError::Query(msg) => write!(f, "Query error: {}", msg),
            StoreError::Backend(msg) => write!(f, "Backend error: {}", msg),
            StoreError::Conversion(msg) => write!(f, "Conversion error: {}", msg),
            StoreError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            StoreError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl Error for StoreError {}

/// Convert a standard IO error to a store error
impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}
