//! Error types shared across the qmap toolkit's core types.
//!
//! Mapper-specific and Clifford-specific failures live in their own crates
//! (`MapperError`, `CliffordError`); this enum only covers validation of the
//! shared data model (circuits, devices, tableaux, config) that every crate
//! in the workspace builds on.

use thiserror::Error;

/// Unified error type for `qmap_core` operations (circuit/device/tableau
/// validation, config (de)serialization).
#[derive(Error, Debug)]
pub enum CoreError {
    // ============ Invalid input ============
    /// Invalid qubit index
    #[error("invalid qubit index {0}, maximum is {1}")]
    InvalidQubit(usize, usize),

    /// Unknown or unsupported gate name encountered while parsing input.
    #[error("unknown gate: {0}")]
    UnknownGate(String),

    /// A coupling graph failed a required connectivity check.
    #[error("disconnected subgraph: {0}")]
    DisconnectedSubgraph(String),

    /// A tableau was built or supplied with inconsistent dimensions.
    #[error("tableau size mismatch: {0}")]
    TableauSizeMismatch(String),

    // ============ Config errors ============
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    // ============ I/O errors ============
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ============ Invariant violations (programmer bugs) ============
    /// A data-model invariant was violated. Never returned as a recoverable
    /// condition in normal operation; only constructed from
    /// `debug_assert!`-guarded paths.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result type alias for `qmap_core` operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Creates a config error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an invariant-violation error with the given message.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidQubit(5, 3);
        assert!(err.to_string().contains('5'));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_result_type() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(CoreError::config("test error"))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
