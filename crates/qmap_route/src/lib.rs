//! # qmap_route
//!
//! Core A: the circuit-to-graph mapper. Partitions a circuit into layers
//! (§4.2), then routes each layer onto a device's coupling graph either
//! heuristically (A* SWAP insertion, §4.3) or exactly (Boolean-constraint
//! encoding over a fixed physical subgraph, §4.4).
//!
//! [`map_circuit`] is the single entry point; it dispatches on
//! [`qmap_core::config::MapperMethod`].

pub mod error;
pub mod exact;
pub mod layering;
pub mod mapping;

pub use error::{MapperError, Result};
pub use layering::{partition_layers, Layer};
pub use mapping::result::MappingResult;
pub use mapping::state::MappingState;

use qmap_core::config::{MapperConfig, MapperMethod};
use qmap_core::types::{CircuitGenome, HardwareProfile};

/// Runs a single mapping/synthesis-adjacent job: maps `circuit` onto
/// `device` using whichever core `config.method` selects.
pub fn map_circuit(
    circuit: &CircuitGenome,
    device: &HardwareProfile,
    config: &MapperConfig,
) -> Result<MappingResult> {
    match config.method {
        MapperMethod::Heuristic => mapping::route_circuit(circuit, device, config),
        MapperMethod::Exact => {
            let layers = layering::partition_layers(&circuit.gates, config.layering);
            let exact = exact::solve_exact(device, &layers, circuit.num_qubits, config)?;
            mapping::result::assemble_from_exact(circuit, device, &layers, &exact)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmap_core::config::MapperMethod;
    use qmap_core::types::Gate;

    #[test]
    fn test_dispatch_heuristic() {
        let device = HardwareProfile::linear("l4", 4);
        let mut circuit = CircuitGenome::new(4);
        circuit.add_gate(Gate::CX(0, 3)).unwrap();
        let mut config = MapperConfig::default();
        config.method = MapperMethod::Heuristic;
        let result = map_circuit(&circuit, &device, &config).unwrap();
        assert!(!result.timed_out);
    }

    #[test]
    fn test_dispatch_exact() {
        let device = HardwareProfile::linear("l4", 4);
        let mut circuit = CircuitGenome::new(2);
        circuit.add_gate(Gate::CX(0, 1)).unwrap();
        let mut config = MapperConfig::default();
        config.method = MapperMethod::Exact;
        config.subgraph = vec![0, 1];
        config.swap_reduction = qmap_core::config::SwapReduction::Custom;
        config.swap_limit = 0;
        let result = map_circuit(&circuit, &device, &config).unwrap();
        assert_eq!(result.swap_count, 0);
    }
}
