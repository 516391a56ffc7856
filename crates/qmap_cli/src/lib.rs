//! # qmap_cli
//!
//! Library half of the `qmap` command-line front end over `qmap_route`
//! (Core A, the mapper) and `qmap_clifford` (Core B, the synthesizer):
//! loading circuits, devices, tableaux, and config overrides from JSON.
//!
//! ## Library usage
//!
//! ```rust
//! use qmap_core::types::{CircuitGenome, Gate};
//!
//! let mut circuit = CircuitGenome::new(2);
//! circuit.add_gate(Gate::H(0)).unwrap();
//! circuit.add_gate(Gate::CX(0, 1)).unwrap();
//! ```

pub mod pipeline;

pub use pipeline::{
    load_circuit, load_clifford_config, load_device, load_mapper_config, load_tableau,
    write_mapping_result,
};
