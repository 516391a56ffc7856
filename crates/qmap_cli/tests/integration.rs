//! End-to-end integration tests for the qmap toolkit: a circuit routed onto
//! a device by `qmap_route`, and a target tableau synthesized into a
//! circuit by `qmap_clifford`.

use qmap_clifford::gate_set::ENCODER_GENERATORS;
use qmap_core::config::{CliffordConfig, MapperConfig, MapperMethod, SwapReduction, TargetMetric};
use qmap_core::types::{CircuitGenome, Gate, HardwareProfile, Tableau};
use qmap_route::map_circuit;

#[test]
fn test_heuristic_map_bell_state_on_linear_device() {
    let mut circuit = CircuitGenome::new(3);
    circuit.add_gate(Gate::H(0)).unwrap();
    circuit.add_gate(Gate::CX(0, 2)).unwrap();

    let device = HardwareProfile::linear("test-linear", 3);
    let config = MapperConfig::default();

    let result = map_circuit(&circuit, &device, &config).unwrap();
    assert!(!result.timed_out);
    assert_eq!(result.output_permutation.len(), 3);

    // Every two-qubit gate in the mapped circuit must land on a coupled pair.
    for gate in &result.circuit.gates {
        let qs = gate.qubits();
        if qs.len() == 2 {
            assert!(device.are_connected(qs[0], qs[1]));
        }
    }
}

#[test]
fn test_exact_map_already_adjacent_pair_needs_no_swaps() {
    let mut circuit = CircuitGenome::new(2);
    circuit.add_gate(Gate::CX(0, 1)).unwrap();

    let device = HardwareProfile::linear("test-linear", 2);
    let mut config = MapperConfig::default();
    config.method = MapperMethod::Exact;
    config.subgraph = vec![0, 1];
    config.swap_reduction = SwapReduction::Custom;
    config.swap_limit = 0;

    let result = map_circuit(&circuit, &device, &config).unwrap();
    assert_eq!(result.swap_count, 0);
}

#[test]
fn test_device_too_small_is_rejected() {
    let mut circuit = CircuitGenome::new(4);
    circuit.add_gate(Gate::CX(0, 3)).unwrap();

    let device = HardwareProfile::linear("test-tiny", 2);
    let config = MapperConfig::default();

    assert!(map_circuit(&circuit, &device, &config).is_err());
}

#[test]
fn test_synthesize_bell_preparation_tableau() {
    let mut target = Tableau::identity(2);
    target.h(0).unwrap();
    target.cx(0, 1).unwrap();

    let config = CliffordConfig {
        target: TargetMetric::Gates,
        ..CliffordConfig::default()
    };

    let result = qmap_clifford::synthesize(&target, &ENCODER_GENERATORS, &config).unwrap();
    assert!(result.gates >= 2);
    assert_eq!(result.circuit.num_qubits, 2);
}

#[test]
fn test_synthesize_parallel_agrees_with_single_threaded_on_gate_count() {
    let mut target = Tableau::identity(1);
    target.h(0).unwrap();
    target.s(0).unwrap();

    let mut config = CliffordConfig {
        target: TargetMetric::Gates,
        ..CliffordConfig::default()
    };

    let single = qmap_clifford::synthesize(&target, &ENCODER_GENERATORS, &config).unwrap();

    config.n_threads_heuristic = 3;
    let parallel = qmap_clifford::synthesize_parallel(&target, &ENCODER_GENERATORS, &config).unwrap();

    assert_eq!(single.gates, parallel.gates);
}

#[test]
fn test_incomplete_gate_set_is_rejected_before_solving() {
    let target = Tableau::identity(1);
    let config = CliffordConfig::default();
    let incomplete = [qmap_clifford::SingleGateKind::X, qmap_clifford::SingleGateKind::Z];

    assert!(qmap_clifford::synthesize(&target, &incomplete, &config).is_err());
}
