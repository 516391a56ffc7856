//! Error types for the circuit-to-graph mapper.

use thiserror::Error;

/// Unified error type for `qmap_route` operations.
#[derive(Error, Debug)]
pub enum MapperError {
    // ============ Invalid input ============
    /// Circuit references a qubit with no corresponding device site.
    #[error("circuit needs {0} physical qubits, device has only {1}")]
    DeviceTooSmall(usize, usize),

    /// A device graph lacks the connectivity a request assumes.
    #[error("disconnected subgraph: {0}")]
    DisconnectedSubgraph(String),

    /// Propagated shared data-model error (gate/circuit/tableau validation).
    #[error(transparent)]
    Core(#[from] qmap_core::CoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ============ Infeasible ============
    /// The exact mapper proved UNSAT at the configured swap limit(s).
    #[error("no mapping exists within swap budget: {0}")]
    Infeasible(String),

    // ============ Resource exhaustion ============
    /// A* or the exact solver exceeded its wall-clock budget.
    #[error("mapping run timed out after {0}ms")]
    Timeout(u64),

    /// An early-termination node/solution cap was hit before any valid
    /// mapping was found.
    #[error("node/solution cap reached with no valid mapping: {0}")]
    CapReached(String),

    // ============ Invariant violations (programmer bugs) ============
    /// A mapping state or tableau invariant was violated. Never returned as
    /// a recoverable condition in normal operation.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result type alias for `qmap_route` operations.
pub type Result<T> = std::result::Result<T, MapperError>;

impl MapperError {
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
        let err = MapperError::DeviceTooSmall(5, 3);
        assert!(err.to_string().contains('5'));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_core_error_conversion() {
        let core_err = qmap_core::CoreError::InvalidQubit(9, 4);
        let err: MapperError = core_err.into();
        assert!(matches!(err, MapperError::Core(_)));
    }
}
