//! # qmap_core
//!
//! Shared data model for the qmap circuit mapping and Clifford synthesis
//! toolkit: gates and circuits, the device (coupling-graph) model with its
//! distance/fidelity tables, the stabilizer tableau, cardinality-constraint
//! encoding helpers shared by the exact mapper and the Clifford encoder, and
//! the `MapperConfig`/`CliffordConfig` configuration surface.
//!
//! This crate owns no search or solver logic; it is the vocabulary that
//! `qmap_route` (Core A, the mapper) and `qmap_clifford` (Core B, the
//! synthesizer) both build on.
//!
//! ## Example
//!
//! ```rust
//! use qmap_core::prelude::*;
//!
//! let mut circuit = CircuitGenome::new(3);
//! circuit.add_gate(Gate::H(0)).unwrap();
//! circuit.add_gate(Gate::CX(0, 1)).unwrap();
//!
//! // Check commutativity for optimization
//! assert!(Gate::Z(0).commutes_with(&Gate::Rz(0, 0.5)));
//! ```

pub mod cardinality;
pub mod config;
pub mod error;
pub mod physics;
pub mod prelude;
pub mod types;

pub use error::{CoreError, Result};
pub use types::{CircuitGenome, Fidelity, Gate, HardwareProfile, Tableau};
