//! Error types for cpool

use thiserror::Error;

/// Core error type for pool and driver operations
#[derive(Error, Debug)]
pub enum CpoolError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Pool is closed")]
    PoolClosed,
}

impl CpoolError {
    /// Whether a caller may reasonably retry the operation that produced this error.
    ///
    /// The pool never retries on its own; callers retry `acquire` themselves.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CpoolError::Connection(_))
    }
}

/// Result type alias for cpool operations
pub type Result<T> = std::result::Result<T, CpoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CpoolError::Connection("refused".into());
        assert_eq!(err.to_string(), "Connection error: refused");

        let err = CpoolError::Configuration("max_size must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: max_size must be greater than 0"
        );

        assert_eq!(CpoolError::PoolClosed.to_string(), "Pool is closed");
    }

    #[test]
    fn test_error_retryable() {
        assert!(CpoolError::Connection("reset".into()).is_retryable());
        assert!(!CpoolError::Configuration("bad".into()).is_retryable());
        assert!(!CpoolError::PoolClosed.is_retryable());
    }
}
