//! # qmap_clifford
//!
//! Core B: the Clifford circuit synthesizer. Encodes a target stabilizer
//! tableau and a choice of single-qubit gate set into a Boolean constraint
//! system (§4.6), hands it to the `z3` solver either directly or through
//! `z3::Optimize`'s MaxSAT interface (§4.7), and reconstructs a circuit from
//! the resulting model (§4.8).
//!
//! [`synthesize`] is the single entry point for one synthesis run;
//! [`synthesize_parallel`] races several independent attempts across
//! `CliffordConfig::n_threads_heuristic` worker tasks and keeps the
//! cheapest (§5).

pub mod encoder;
pub mod error;
pub mod gate_set;
pub mod result;
pub mod synthesis;

pub use error::{CliffordError, Result};
pub use gate_set::SingleGateKind;
pub use result::CliffordResult;
pub use synthesis::{synthesize, synthesize_parallel};
