//! Error types for freqcache

use std::fmt;

/// Result type alias for freqcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction and auditing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity must be at least 1
    ZeroCapacity,

    /// Internal bookkeeping is inconsistent (reported by `check_invariants`)
    Invariant(String),
}

impl Error {
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Error::Invariant(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroCapacity => write!(f, "Invalid capacity: must be at least 1"),
            Error::Invariant(msg) => write!(f, "Invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::ZeroCapacity.to_string(),
            "Invalid capacity: must be at least 1"
        );
        assert_eq!(
            Error::invariant("bucket 3 is empty").to_string(),
            "Invariant violated: bucket 3 is empty"
        );
    }
}
