//! Quantum gate definitions.
//!
//! This module provides quantum gate types with:
//! - Matrix representations for simulation
//! - Commutativity analysis for circuit optimization
//! - Inverse gate computation
//! - Clifford-subset classification used by the mapper and synthesizer

use crate::physics::{self, GateType, Matrix2x2, Matrix4x4};
use serde::{Deserialize, Serialize};

/// Quantum gate enumeration.
///
/// Covers the full gate vocabulary the toolkit carries end-to-end: the
/// Clifford generators (`I, H, X, Y, Z, S, Sdg, SX, SXdg`) plus `CX`, `CZ`,
/// `SWAP`, parametrized rotations (`Rx, Ry, Rz`, opaque payloads the mapper
/// routes around but never emits itself), `Measure` and `Barrier`.
///
/// # Example
///
/// ```
/// use qmap_core::prelude::*;
///
/// let h = Gate::H(0);
/// let cx = Gate::CX(0, 1);
///
/// // Check commutativity
/// assert!(h.commutes_with(&Gate::X(1)));  // Different qubits
/// assert!(!h.commutes_with(&Gate::X(0))); // Same qubit, different axis
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // Single-qubit Clifford generators
    /// Identity gate
    I(usize),
    /// Hadamard gate
    H(usize),
    /// Pauli-X (NOT) gate
    X(usize),
    /// Pauli-Y gate
    Y(usize),
    /// Pauli-Z gate
    Z(usize),
    /// S gate (√Z, phase gate)
    S(usize),
    /// S† (S-dagger) gate
    Sdg(usize),
    /// √X gate
    SX(usize),
    /// √X† gate
    SXdg(usize),
    /// T gate (π/8 gate) — not Clifford, carried through as an opaque payload
    T(usize),

    // Single-qubit rotation gates
    /// Rotation around X-axis by angle θ
    Rx(usize, f64),
    /// Rotation around Y-axis by angle θ
    Ry(usize, f64),
    /// Rotation around Z-axis by angle θ
    Rz(usize, f64),

    // Two-qubit gates
    /// Controlled-NOT gate (control, target)
    CX(usize, usize),
    /// Controlled-Z gate
    CZ(usize, usize),
    /// SWAP gate
    SWAP(usize, usize),

    // Non-unitary / structural operations
    /// Measurement in computational basis
    Measure(usize),
    /// Scheduling barrier across the listed qubits; no unitary effect
    Barrier(Vec<usize>),
}

impl Gate {
    /// Returns the qubit indices this gate operates on.
    ///
    /// For single-qubit gates, returns a single-element vector.
    /// For two-qubit gates, returns [control, target] or [qubit1, qubit2].
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Gate::I(q)
            | Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::SX(q)
            | Gate::SXdg(q)
            | Gate::T(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _)
            | Gate::Measure(q) => vec![*q],
            Gate::CX(c, t) | Gate::CZ(c, t) | Gate::SWAP(c, t) => vec![*c, *t],
            Gate::Barrier(qs) => qs.clone(),
        }
    }

    /// Returns the gate type for commutativity analysis.
    pub fn gate_type(&self) -> GateType {
        match self {
            Gate::I(_) => GateType::Diagonal,
            Gate::Z(_) | Gate::S(_) | Gate::Sdg(_) | Gate::T(_) | Gate::Rz(_, _) => {
                GateType::Diagonal
            }
            Gate::X(_) | Gate::SX(_) | Gate::SXdg(_) | Gate::Rx(_, _) => GateType::XRotation,
            Gate::Y(_) | Gate::Ry(_, _) => GateType::YRotation,
            Gate::H(_) => GateType::Hadamard,
            Gate::CX(_, _) | Gate::CZ(_, _) | Gate::SWAP(_, _) => GateType::TwoQubit,
            Gate::Measure(_) => GateType::Measurement,
            Gate::Barrier(_) => GateType::Measurement,
        }
    }

    /// Checks if this gate commutes with another gate.
    ///
    /// Two gates commute if applying them in either order produces
    /// the same result. This check considers:
    /// 1. Gates on disjoint qubits always commute
    /// 2. Diagonal gates (Z, S, Sdg, T, Rz) commute with each other
    /// 3. Same-axis rotations commute (Rx with Rx, etc.)
    ///
    /// # Example
    ///
    /// ```
    /// use qmap_core::prelude::*;
    ///
    /// // Different qubits - always commute
    /// assert!(Gate::H(0).commutes_with(&Gate::X(1)));
    ///
    /// // Diagonal gates on same qubit - commute
    /// assert!(Gate::Z(0).commutes_with(&Gate::Rz(0, 0.5)));
    /// assert!(Gate::S(0).commutes_with(&Gate::T(0)));
    ///
    /// // Different axes on same qubit - don't commute
    /// assert!(!Gate::X(0).commutes_with(&Gate::Z(0)));
    /// ```
    pub fn commutes_with(&self, other: &Gate) -> bool {
        let q1 = self.qubits();
        let q2 = other.qubits();

        // Gates on disjoint qubits always commute
        if q1.iter().all(|q| !q2.contains(q)) {
            return true;
        }

        // Measurement and barriers don't commute with anything on the same qubit
        if matches!(self, Gate::Measure(_) | Gate::Barrier(_))
            || matches!(other, Gate::Measure(_) | Gate::Barrier(_))
        {
            return false;
        }

        // Check gate type compatibility for same-qubit operations
        let t1 = self.gate_type();
        let t2 = other.gate_type();

        physics::gate_types_commute(t1, t2)
    }

    /// Returns true if this is a single-qubit gate (excludes barrier/measure).
    pub fn is_single_qubit(&self) -> bool {
        matches!(
            self,
            Gate::I(_)
                | Gate::H(_)
                | Gate::X(_)
                | Gate::Y(_)
                | Gate::Z(_)
                | Gate::S(_)
                | Gate::Sdg(_)
                | Gate::SX(_)
                | Gate::SXdg(_)
                | Gate::T(_)
                | Gate::Rx(_, _)
                | Gate::Ry(_, _)
                | Gate::Rz(_, _)
        )
    }

    /// Returns true if this is a two-qubit gate.
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Gate::CX(_, _) | Gate::CZ(_, _) | Gate::SWAP(_, _))
    }

    /// Returns true if this is a measurement operation.
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::Measure(_))
    }

    /// Returns true if this is a structural barrier (no unitary effect).
    pub fn is_barrier(&self) -> bool {
        matches!(self, Gate::Barrier(_))
    }

    /// Returns true if this gate is one of the Clifford generators
    /// `{I, H, X, Y, Z, S, Sdg, SX, SXdg, CX, CZ, SWAP}`.
    ///
    /// `T`, `Rx`, `Ry`, `Rz` (for general angles) are not Clifford.
    pub fn is_clifford(&self) -> bool {
        matches!(
            self,
            Gate::I(_)
                | Gate::H(_)
                | Gate::X(_)
                | Gate::Y(_)
                | Gate::Z(_)
                | Gate::S(_)
                | Gate::Sdg(_)
                | Gate::SX(_)
                | Gate::SXdg(_)
                | Gate::CX(_, _)
                | Gate::CZ(_, _)
                | Gate::SWAP(_, _)
        )
    }

    /// Returns the 2x2 matrix representation for single-qubit gates.
    ///
    /// Returns `None` for two-qubit gates, measurements, and barriers.
    pub fn matrix_2x2(&self) -> Option<Matrix2x2> {
        match self {
            Gate::I(_) => Some(physics::IDENTITY),
            Gate::H(_) => Some(physics::HADAMARD),
            Gate::X(_) => Some(physics::PAULI_X),
            Gate::Y(_) => Some(physics::PAULI_Y),
            Gate::Z(_) => Some(physics::PAULI_Z),
            Gate::S(_) => Some(physics::S_GATE),
            Gate::Sdg(_) => Some(physics::S_DAGGER),
            Gate::SX(_) => Some(physics::SX_GATE),
            Gate::SXdg(_) => Some(physics::SX_DAGGER),
            Gate::T(_) => Some(physics::T_GATE),
            Gate::Rx(_, theta) => Some(physics::rx(*theta)),
            Gate::Ry(_, theta) => Some(physics::ry(*theta)),
            Gate::Rz(_, theta) => Some(physics::rz(*theta)),
            _ => None,
        }
    }

    /// Returns the 4x4 matrix representation for two-qubit gates.
    ///
    /// Returns `None` for single-qubit gates, measurements, and barriers.
    /// The matrix assumes standard ordering (control < target for CX).
    pub fn matrix_4x4(&self) -> Option<Matrix4x4> {
        match self {
            Gate::CX(_, _) => Some(physics::CX),
            Gate::CZ(_, _) => Some(physics::CZ),
            Gate::SWAP(_, _) => Some(physics::SWAP),
            _ => None,
        }
    }

    /// Returns the inverse (adjoint) of this gate.
    ///
    /// For unitary gates, the inverse satisfies U†U = I.
    /// Returns `None` for measurements and barriers (not reversible).
    pub fn inverse(&self) -> Option<Gate> {
        match self {
            // Self-inverse gates
            Gate::I(q) => Some(Gate::I(*q)),
            Gate::H(q) => Some(Gate::H(*q)),
            Gate::X(q) => Some(Gate::X(*q)),
            Gate::Y(q) => Some(Gate::Y(*q)),
            Gate::Z(q) => Some(Gate::Z(*q)),
            Gate::CX(c, t) => Some(Gate::CX(*c, *t)),
            Gate::CZ(c, t) => Some(Gate::CZ(*c, *t)),
            Gate::SWAP(a, b) => Some(Gate::SWAP(*a, *b)),

            // Dagger pairs
            Gate::S(q) => Some(Gate::Sdg(*q)),
            Gate::Sdg(q) => Some(Gate::S(*q)),
            Gate::SX(q) => Some(Gate::SXdg(*q)),
            Gate::SXdg(q) => Some(Gate::SX(*q)),
            Gate::T(q) => Some(Gate::Rz(*q, -std::f64::consts::FRAC_PI_4)),

            // Rotation inverses: negate the angle
            Gate::Rx(q, theta) => Some(Gate::Rx(*q, -theta)),
            Gate::Ry(q, theta) => Some(Gate::Ry(*q, -theta)),
            Gate::Rz(q, theta) => Some(Gate::Rz(*q, -theta)),

            // Not reversible
            Gate::Measure(_) | Gate::Barrier(_) => None,
        }
    }

    /// Returns the rotation angle for rotation gates.
    ///
    /// Returns `None` for non-rotation gates.
    pub fn rotation_angle(&self) -> Option<f64> {
        match self {
            Gate::Rx(_, theta) | Gate::Ry(_, theta) | Gate::Rz(_, theta) => Some(*theta),
            Gate::S(_) => Some(std::f64::consts::FRAC_PI_2),
            Gate::Sdg(_) => Some(-std::f64::consts::FRAC_PI_2),
            Gate::T(_) => Some(std::f64::consts::FRAC_PI_4),
            Gate::Z(_) => Some(std::f64::consts::PI),
            _ => None,
        }
    }

    /// Estimates the gate time in nanoseconds.
    pub fn estimated_time_ns(&self) -> f64 {
        if self.is_barrier() {
            0.0
        } else if self.is_single_qubit() {
            physics::gate_times::SINGLE_QUBIT
        } else if self.is_two_qubit() {
            physics::gate_times::TWO_QUBIT
        } else {
            physics::gate_times::MEASUREMENT
        }
    }

    /// Estimates the gate error rate.
    pub fn estimated_error(&self) -> f64 {
        if self.is_barrier() {
            0.0
        } else if self.is_single_qubit() {
            physics::gate_errors::SINGLE_QUBIT_TYPICAL
        } else if self.is_two_qubit() {
            physics::gate_errors::TWO_QUBIT_TYPICAL
        } else {
            physics::gate_errors::MEASUREMENT_TYPICAL
        }
    }

    /// Remaps the qubits of the gate using the provided mapping.
    /// mapping[old_qubit_index] = new_qubit_index
    pub fn map_qubits(&self, mapping: &[usize]) -> Gate {
        match self {
            Gate::I(q) => Gate::I(mapping[*q]),
            Gate::H(q) => Gate::H(mapping[*q]),
            Gate::X(q) => Gate::X(mapping[*q]),
            Gate::Y(q) => Gate::Y(mapping[*q]),
            Gate::Z(q) => Gate::Z(mapping[*q]),
            Gate::S(q) => Gate::S(mapping[*q]),
            Gate::Sdg(q) => Gate::Sdg(mapping[*q]),
            Gate::SX(q) => Gate::SX(mapping[*q]),
            Gate::SXdg(q) => Gate::SXdg(mapping[*q]),
            Gate::T(q) => Gate::T(mapping[*q]),
            Gate::Rx(q, theta) => Gate::Rx(mapping[*q], *theta),
            Gate::Ry(q, theta) => Gate::Ry(mapping[*q], *theta),
            Gate::Rz(q, theta) => Gate::Rz(mapping[*q], *theta),
            Gate::CX(c, t) => Gate::CX(mapping[*c], mapping[*t]),
            Gate::CZ(c, t) => Gate::CZ(mapping[*c], mapping[*t]),
            Gate::SWAP(a, b) => Gate::SWAP(mapping[*a], mapping[*b]),
            Gate::Measure(q) => Gate::Measure(mapping[*q]),
            Gate::Barrier(qs) => Gate::Barrier(qs.iter().map(|q| mapping[*q]).collect()),
        }
    }

    /// Decomposes a `SWAP(a, b)` into its three-`CX` realization, in the
    /// order `CX(a,b), CX(b,a), CX(a,b)`. Returns `None` for non-SWAP gates.
    pub fn decompose_swap(&self) -> Option<[Gate; 3]> {
        match self {
            Gate::SWAP(a, b) => Some([Gate::CX(*a, *b), Gate::CX(*b, *a), Gate::CX(*a, *b)]),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gate::I(q) => write!(f, "I({})", q),
            Gate::H(q) => write!(f, "H({})", q),
            Gate::X(q) => write!(f, "X({})", q),
            Gate::Y(q) => write!(f, "Y({})", q),
            Gate::Z(q) => write!(f, "Z({})", q),
            Gate::S(q) => write!(f, "S({})", q),
            Gate::Sdg(q) => write!(f, "Sdg({})", q),
            Gate::SX(q) => write!(f, "SX({})", q),
            Gate::SXdg(q) => write!(f, "SXdg({})", q),
            Gate::T(q) => write!(f, "T({})", q),
            Gate::Rx(q, theta) => write!(f, "Rx({}, {:.4})", q, theta),
            Gate::Ry(q, theta) => write!(f, "Ry({}, {:.4})", q, theta),
            Gate::Rz(q, theta) => write!(f, "Rz({}, {:.4})", q, theta),
            Gate::CX(c, t) => write!(f, "CX({}, {})", c, t),
            Gate::CZ(c, t) => write!(f, "CZ({}, {})", c, t),
            Gate::SWAP(a, b) => write!(f, "SWAP({}, {})", a, b),
            Gate::Measure(q) => write!(f, "Measure({})", q),
            Gate::Barrier(qs) => write!(f, "Barrier({:?})", qs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_gate_qubits() {
        assert_eq!(Gate::H(0).qubits(), vec![0]);
        assert_eq!(Gate::CX(0, 1).qubits(), vec![0, 1]);
        assert_eq!(Gate::SWAP(2, 5).qubits(), vec![2, 5]);
        assert_eq!(Gate::Barrier(vec![0, 1, 2]).qubits(), vec![0, 1, 2]);
    }

    #[test]
    fn test_commutes_different_qubits() {
        assert!(Gate::H(0).commutes_with(&Gate::X(1)));
        assert!(Gate::CX(0, 1).commutes_with(&Gate::H(2)));
        assert!(Gate::Rz(0, 0.5).commutes_with(&Gate::Ry(1, 0.3)));
    }

    #[test]
    fn test_commutes_diagonal_gates() {
        assert!(Gate::Z(0).commutes_with(&Gate::S(0)));
        assert!(Gate::S(0).commutes_with(&Gate::T(0)));
        assert!(Gate::Sdg(0).commutes_with(&Gate::Rz(0, 0.5)));
        assert!(Gate::Rz(0, 0.1).commutes_with(&Gate::Rz(0, 0.2)));
    }

    #[test]
    fn test_commutes_same_axis() {
        assert!(Gate::X(0).commutes_with(&Gate::Rx(0, 0.5)));
        assert!(Gate::SX(0).commutes_with(&Gate::Rx(0, 0.2)));
        assert!(Gate::Y(0).commutes_with(&Gate::Ry(0, 0.5)));
    }

    #[test]
    fn test_not_commutes_different_axes() {
        assert!(!Gate::X(0).commutes_with(&Gate::Y(0)));
        assert!(!Gate::X(0).commutes_with(&Gate::Z(0)));
        assert!(!Gate::H(0).commutes_with(&Gate::X(0)));
    }

    #[test]
    fn test_measurement_and_barrier_never_commute() {
        assert!(!Gate::Measure(0).commutes_with(&Gate::H(0)));
        assert!(!Gate::Barrier(vec![0]).commutes_with(&Gate::Z(0)));
    }

    #[test]
    fn test_matrix_single_qubit() {
        assert!(Gate::H(0).matrix_2x2().is_some());
        assert!(Gate::SX(0).matrix_2x2().is_some());
        assert!(Gate::CX(0, 1).matrix_2x2().is_none());
    }

    #[test]
    fn test_matrix_two_qubit() {
        assert!(Gate::CX(0, 1).matrix_4x4().is_some());
        assert!(Gate::CZ(0, 1).matrix_4x4().is_some());
        assert!(Gate::SWAP(0, 1).matrix_4x4().is_some());
        assert!(Gate::H(0).matrix_4x4().is_none());
    }

    #[test]
    fn test_inverse() {
        assert_eq!(Gate::H(0).inverse(), Some(Gate::H(0)));
        assert_eq!(Gate::CX(0, 1).inverse(), Some(Gate::CX(0, 1)));
        assert_eq!(Gate::S(0).inverse(), Some(Gate::Sdg(0)));
        assert_eq!(Gate::Sdg(0).inverse(), Some(Gate::S(0)));
        assert_eq!(Gate::SX(0).inverse(), Some(Gate::SXdg(0)));

        let rx = Gate::Rx(0, 0.5);
        if let Some(Gate::Rx(q, theta)) = rx.inverse() {
            assert_eq!(q, 0);
            assert!((theta + 0.5).abs() < 1e-10);
        } else {
            panic!("Expected Rx inverse");
        }

        assert_eq!(Gate::Measure(0).inverse(), None);
        assert_eq!(Gate::Barrier(vec![0]).inverse(), None);
    }

    #[test]
    fn test_is_clifford() {
        assert!(Gate::H(0).is_clifford());
        assert!(Gate::S(0).is_clifford());
        assert!(Gate::Sdg(0).is_clifford());
        assert!(Gate::SX(0).is_clifford());
        assert!(Gate::CX(0, 1).is_clifford());
        assert!(!Gate::T(0).is_clifford());
        assert!(!Gate::Rx(0, 0.5).is_clifford());
    }

    #[test]
    fn test_rotation_angle() {
        assert_eq!(Gate::Rx(0, 0.5).rotation_angle(), Some(0.5));
        assert_eq!(Gate::Rz(0, PI).rotation_angle(), Some(PI));
        assert!(Gate::S(0).rotation_angle().is_some());
        assert_eq!(Gate::H(0).rotation_angle(), None);
    }

    #[test]
    fn test_decompose_swap() {
        let decomposed = Gate::SWAP(1, 2).decompose_swap().unwrap();
        assert_eq!(decomposed, [Gate::CX(1, 2), Gate::CX(2, 1), Gate::CX(1, 2)]);
        assert!(Gate::H(0).decompose_swap().is_none());
    }
}
