//! Unified error type for coordination primitives
//!
//! Control-flow outcomes (stale responses, rejected gate tokens) are not
//! errors and never appear here. This type only covers invalid input to the
//! primitives themselves.

use serde::{Deserialize, Serialize};

/// Error type for purse-core operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum CoreError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },
}

impl CoreError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Result alias for purse-core operations
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_display() {
        let err = CoreError::invalid("max_attempts must be at least 1");
        assert_eq!(err.to_string(), "Invalid: max_attempts must be at least 1");
    }
}
