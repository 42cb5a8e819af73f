//! Error types for lrucache

use std::fmt;

/// Result type alias for lrucache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity is not a positive integer (holds the rejected input)
    InvalidCapacity(String),

    /// Key not present in the cache
    KeyNotFound,

    /// Pop on an empty recency list
    Empty,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(input) => {
                write!(f, "Invalid capacity: {} (must be a positive integer)", input)
            }
            Error::KeyNotFound => write!(f, "Key not found"),
            Error::Empty => write!(f, "Recency list is empty"),
        }
    }
}

impl std::error::Error for Error {}
