//! Binary symplectic stabilizer tableau for Clifford circuits.
//!
//! A tableau over `n` qubits tracks how each of `2n` Pauli generators (the
//! `n` X-type and `n` Z-type "destabilizer/stabilizer" rows used by the
//! synthesizer, `s = 2n` rows total) transforms under the circuit: each row
//! is `(x_0..x_{n-1}, z_0..z_{n-1}, phase)`, stored as bits in a single
//! `Vec<bool>` of length `2n + 1` per row. Gate application rewrites rows in
//! place following the standard CHP update rules (Aaronson & Gottesman).

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// A binary symplectic stabilizer tableau: `rows` rows, each of length
/// `2 * num_qubits + 1` (X bits, then Z bits, then a phase bit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tableau {
    /// Number of qubits the tableau acts on.
    pub num_qubits: usize,
    /// Row-major bits: `rows[r][q]` is the X bit, `rows[r][num_qubits + q]`
    /// the Z bit, and `rows[r][2 * num_qubits]` the phase bit.
    pub rows: Vec<Vec<bool>>,
}

impl Tableau {
    /// Number of bits in one row: `2 * num_qubits` Pauli bits plus 1 phase
    /// bit.
    fn row_len(num_qubits: usize) -> usize {
        2 * num_qubits + 1
    }

    /// Builds the identity tableau (`2n` rows: the destabilizers `X_i` and
    /// the stabilizers `Z_i`, all with zero phase).
    pub fn identity(num_qubits: usize) -> Self {
        let row_len = Self::row_len(num_qubits);
        let mut rows = vec![vec![false; row_len]; 2 * num_qubits];
        for i in 0..num_qubits {
            rows[i][i] = true; // destabilizer i: X_i
            rows[num_qubits + i][num_qubits + i] = true; // stabilizer i: Z_i
        }
        Self { num_qubits, rows }
    }

    /// Validates row count and row width; called from any constructor that
    /// accepts external data (deserialized tableaux, etc).
    pub fn is_valid(&self) -> bool {
        if self.rows.len() != 2 * self.num_qubits {
            return false;
        }
        let expected_len = Self::row_len(self.num_qubits);
        self.rows.iter().all(|r| r.len() == expected_len)
    }

    /// Builds a tableau from raw rows, validating shape.
    pub fn from_rows(num_qubits: usize, rows: Vec<Vec<bool>>) -> Result<Self> {
        let t = Self { num_qubits, rows };
        if !t.is_valid() {
            return Err(CoreError::TableauSizeMismatch(format!(
                "expected {} rows of length {} for {} qubits",
                2 * num_qubits,
                Self::row_len(num_qubits),
                num_qubits
            )));
        }
        Ok(t)
    }

    #[inline]
    fn x(&self, row: usize, q: usize) -> bool {
        self.rows[row][q]
    }

    #[inline]
    fn z(&self, row: usize, q: usize) -> bool {
        self.rows[row][self.num_qubits + q]
    }

    #[inline]
    fn set_x(&mut self, row: usize, q: usize, v: bool) {
        self.rows[row][q] = v;
    }

    #[inline]
    fn set_z(&mut self, row: usize, q: usize, v: bool) {
        self.rows[row][self.num_qubits + q] = v;
    }

    #[inline]
    fn phase(&self, row: usize) -> bool {
        self.rows[row][2 * self.num_qubits]
    }

    #[inline]
    fn set_phase(&mut self, row: usize, v: bool) {
        let idx = 2 * self.num_qubits;
        self.rows[row][idx] = v;
    }

    fn check_qubit(&self, q: usize) -> Result<()> {
        if q >= self.num_qubits {
            return Err(CoreError::InvalidQubit(q, self.num_qubits));
        }
        Ok(())
    }

    /// Applies a Hadamard gate on qubit `q`: swaps X and Z bits, flips the
    /// phase where both were set (`H` maps `Y -> -Y`).
    pub fn h(&mut self, q: usize) -> Result<()> {
        self.check_qubit(q)?;
        for r in 0..self.rows.len() {
            let (xb, zb) = (self.x(r, q), self.z(r, q));
            if xb && zb {
                let p = self.phase(r);
                self.set_phase(r, p ^ true);
            }
            self.set_x(r, q, zb);
            self.set_z(r, q, xb);
        }
        Ok(())
    }

    /// Applies a Pauli-X gate on qubit `q`: flips phase where Z is set
    /// (`X` maps `Z -> -Z`, `Y -> -Y`).
    pub fn x_gate(&mut self, q: usize) -> Result<()> {
        self.check_qubit(q)?;
        for r in 0..self.rows.len() {
            if self.z(r, q) {
                let p = self.phase(r);
                self.set_phase(r, p ^ true);
            }
        }
        Ok(())
    }

    /// Applies a Pauli-Z gate on qubit `q`: flips phase where X is set.
    pub fn z_gate(&mut self, q: usize) -> Result<()> {
        self.check_qubit(q)?;
        for r in 0..self.rows.len() {
            if self.x(r, q) {
                let p = self.phase(r);
                self.set_phase(r, p ^ true);
            }
        }
        Ok(())
    }

    /// Applies a Pauli-Y gate on qubit `q`: flips phase where exactly one
    /// of X, Z is set.
    pub fn y_gate(&mut self, q: usize) -> Result<()> {
        self.check_qubit(q)?;
        for r in 0..self.rows.len() {
            if self.x(r, q) != self.z(r, q) {
                let p = self.phase(r);
                self.set_phase(r, p ^ true);
            }
        }
        Ok(())
    }

    /// Applies an S gate (`sqrt(Z)`) on qubit `q`: `Z_q' = Z_q XOR X_q`,
    /// flips phase where both X and Z were set.
    pub fn s(&mut self, q: usize) -> Result<()> {
        self.check_qubit(q)?;
        for r in 0..self.rows.len() {
            let (xb, zb) = (self.x(r, q), self.z(r, q));
            if xb && zb {
                let p = self.phase(r);
                self.set_phase(r, p ^ true);
            }
            self.set_z(r, q, zb ^ xb);
        }
        Ok(())
    }

    /// Applies an S-dagger gate on qubit `q` (`S` applied three times, or
    /// equivalently `S` followed by a phase correction).
    pub fn sdg(&mut self, q: usize) -> Result<()> {
        self.check_qubit(q)?;
        // Sdg = Z . S (apply S, then Z): flips phase when X set, post-S.
        for r in 0..self.rows.len() {
            let (xb, zb) = (self.x(r, q), self.z(r, q));
            if xb && !zb {
                let p = self.phase(r);
                self.set_phase(r, p ^ true);
            }
            self.set_z(r, q, zb ^ xb);
        }
        Ok(())
    }

    /// Applies a CNOT (CX) gate with `control` and `target` qubits.
    pub fn cx(&mut self, control: usize, target: usize) -> Result<()> {
        self.check_qubit(control)?;
        self.check_qubit(target)?;
        if control == target {
            return Err(CoreError::invariant("CX control and target must differ"));
        }
        for r in 0..self.rows.len() {
            let (xc, zc) = (self.x(r, control), self.z(r, control));
            let (xt, zt) = (self.x(r, target), self.z(r, target));
            if xc && zt && (xt == zc) {
                let p = self.phase(r);
                self.set_phase(r, p ^ true);
            }
            self.set_x(r, target, xt ^ xc);
            self.set_z(r, control, zc ^ zt);
        }
        Ok(())
    }

    /// Applies a SWAP gate as three CNOTs: `CX(a,b) CX(b,a) CX(a,b)`.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.cx(a, b)?;
        self.cx(b, a)?;
        self.cx(a, b)?;
        Ok(())
    }

    /// Applies a Clifford gate from `crate::types::Gate`, if supported.
    /// Non-Clifford or multi-qubit-non-CX/SWAP gates return an error.
    pub fn apply_gate(&mut self, gate: &super::Gate) -> Result<()> {
        use super::Gate;
        match *gate {
            Gate::I(_) => Ok(()),
            Gate::H(q) => self.h(q),
            Gate::X(q) => self.x_gate(q),
            Gate::Y(q) => self.y_gate(q),
            Gate::Z(q) => self.z_gate(q),
            Gate::S(q) => self.s(q),
            Gate::Sdg(q) => self.sdg(q),
            Gate::CX(c, t) => self.cx(c, t),
            Gate::SWAP(a, b) => self.swap(a, b),
            Gate::CZ(c, t) => {
                self.h(t)?;
                self.cx(c, t)?;
                self.h(t)
            }
            _ => Err(CoreError::invariant(format!(
                "{gate} is not representable in the stabilizer tableau"
            ))),
        }
    }

    /// Checks that `rows` form a valid symplectic basis: the `2n x 2n`
    /// Pauli-bit submatrix (ignoring phases) must have full rank over
    /// GF(2) and each destabilizer/stabilizer pair must anticommute while
    /// all other pairs commute. Used as a consistency check after
    /// synthesis or deserialization.
    pub fn has_valid_symplectic_structure(&self) -> bool {
        if !self.is_valid() {
            return false;
        }
        let n = self.num_qubits;
        if self.rows.len() != 2 * n {
            return false;
        }
        // Symplectic inner product: sum_q (x_i[q] z_j[q] + z_i[q] x_j[q]) mod 2.
        let symplectic_ip = |a: &[bool], b: &[bool]| -> bool {
            let mut acc = false;
            for q in 0..n {
                let xi = a[q];
                let zi = a[n + q];
                let xj = b[q];
                let zj = b[n + q];
                acc ^= (xi && zj) ^ (zi && xj);
            }
            acc
        };
        for i in 0..n {
            for j in 0..n {
                let expect = i == j;
                if symplectic_ip(&self.rows[i], &self.rows[n + j]) != expect {
                    return false;
                }
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if symplectic_ip(&self.rows[i], &self.rows[j]) {
                    return false;
                }
                if symplectic_ip(&self.rows[n + i], &self.rows[n + j]) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gate;

    #[test]
    fn test_identity_shape() {
        let t = Tableau::identity(3);
        assert!(t.is_valid());
        assert_eq!(t.rows.len(), 6);
        assert_eq!(t.rows[0].len(), 7);
    }

    #[test]
    fn test_h_then_h_is_identity() {
        let mut t = Tableau::identity(2);
        let start = t.clone();
        t.h(0).unwrap();
        t.h(0).unwrap();
        assert_eq!(t, start);
    }

    #[test]
    fn test_s_four_times_is_identity() {
        let mut t = Tableau::identity(1);
        let start = t.clone();
        for _ in 0..4 {
            t.s(0).unwrap();
        }
        assert_eq!(t, start);
    }

    #[test]
    fn test_s_then_sdg_is_identity() {
        let mut t = Tableau::identity(2);
        let start = t.clone();
        t.s(1).unwrap();
        t.sdg(1).unwrap();
        assert_eq!(t, start);
    }

    #[test]
    fn test_cx_is_involution() {
        let mut t = Tableau::identity(2);
        let start = t.clone();
        t.cx(0, 1).unwrap();
        t.cx(0, 1).unwrap();
        assert_eq!(t, start);
    }

    #[test]
    fn test_swap_is_involution() {
        let mut t = Tableau::identity(3);
        let start = t.clone();
        t.swap(0, 2).unwrap();
        t.swap(0, 2).unwrap();
        assert_eq!(t, start);
    }

    #[test]
    fn test_swap_matches_three_cnots() {
        let mut via_swap = Tableau::identity(2);
        via_swap.swap(0, 1).unwrap();

        let mut via_cx = Tableau::identity(2);
        via_cx.cx(0, 1).unwrap();
        via_cx.cx(1, 0).unwrap();
        via_cx.cx(0, 1).unwrap();

        assert_eq!(via_swap, via_cx);
    }

    #[test]
    fn test_identity_has_valid_symplectic_structure() {
        let t = Tableau::identity(4);
        assert!(t.has_valid_symplectic_structure());
    }

    #[test]
    fn test_structure_preserved_under_clifford_gates() {
        let mut t = Tableau::identity(3);
        t.apply_gate(&Gate::H(0)).unwrap();
        t.apply_gate(&Gate::CX(0, 1)).unwrap();
        t.apply_gate(&Gate::S(2)).unwrap();
        t.apply_gate(&Gate::CZ(1, 2)).unwrap();
        assert!(t.has_valid_symplectic_structure());
    }

    #[test]
    fn test_invalid_qubit_errors() {
        let mut t = Tableau::identity(2);
        assert!(t.h(5).is_err());
        assert!(t.cx(0, 5).is_err());
    }

    #[test]
    fn test_from_rows_rejects_bad_shape() {
        let result = Tableau::from_rows(2, vec![vec![false; 3]]);
        assert!(result.is_err());
    }
}
