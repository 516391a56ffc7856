//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use qmap_core::prelude::*;
//! ```

pub use crate::cardinality::{encode_at_most_one, encode_exactly_one};
pub use crate::config::{
    CardinalityEncoding, CliffordConfig, CommanderGrouping, EarlyTermination, EncodingStyle,
    Heuristic, InitialLayout, Layering, LookaheadConfig, MapperConfig, MapperMethod,
    SwapReduction, TargetMetric, TeleportationConfig,
};
pub use crate::error::{CoreError, Result};
pub use crate::physics::{
    gate_errors, gate_times, t1_typical, t2_typical, GateType, Matrix2x2, Matrix4x4, C64,
};
pub use crate::types::{
    CircuitGenome, CouplerProperties, Fidelity, Gate, HardwareProfile, QubitProperties, Tableau,
    Topology,
};
