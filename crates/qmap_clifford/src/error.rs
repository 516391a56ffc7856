//! Error types for the Clifford synthesizer.

use thiserror::Error;

/// Unified error type for `qmap_clifford` operations.
#[derive(Error, Debug)]
pub enum CliffordError {
    // ============ Invalid input ============
    /// The configured single-qubit gate set cannot realize every
    /// single-qubit Clifford (§4.6.1).
    #[error("incomplete gate set: {0}")]
    IncompleteGateSet(String),

    /// A target or intermediate tableau had the wrong shape for its qubit
    /// count.
    #[error("tableau size mismatch: {0}")]
    TableauSizeMismatch(String),

    /// Propagated shared data-model error (tableau/config validation).
    #[error(transparent)]
    Core(#[from] qmap_core::CoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ============ Infeasible ============
    /// No circuit realizing the target tableau exists within the searched
    /// timestep/gate budget.
    #[error("no circuit realizes the target tableau within the searched budget: {0}")]
    Infeasible(String),

    // ============ Resource exhaustion ============
    /// The solver exceeded its wall-clock budget.
    #[error("synthesis run timed out after {0}ms")]
    Timeout(u64),

    // ============ Invariant violations (programmer bugs) ============
    /// A solver model failed to reproduce a valid tableau transition.
    /// Never returned as a recoverable condition in normal operation.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result type alias for `qmap_clifford` operations.
pub type Result<T> = std::result::Result<T, CliffordError>;

impl CliffordError {
    /// Creates a config error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an infeasible error with the given message.
    pub fn infeasible(msg: impl Into<String>) -> Self {
        Self::Infeasible(msg.into())
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
        let err = CliffordError::Timeout(500);
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_core_error_conversion() {
        let core_err = qmap_core::CoreError::InvalidQubit(9, 4);
        let err: CliffordError = core_err.into();
        assert!(matches!(err, CliffordError::Core(_)));
    }
}
