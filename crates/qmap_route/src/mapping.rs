//! Heuristic-mapper orchestration (Core A1, §4.3 phases ii-v): builds the
//! initial layout, runs A* layer by layer with between-layer stitching and
//! dynamic auto-splitting, then emits the mapped circuit and output
//! permutation (§4.8).

pub mod astar;
pub mod initial_layout;
pub mod result;
pub mod state;

use crate::error::{MapperError, Result};
use crate::layering::{self, Layer};
use astar::{AstarOutcome, AstarParams};
use qmap_core::config::{Heuristic, MapperConfig};
use qmap_core::types::{CircuitGenome, Gate, HardwareProfile};
use result::MappingResult;
use state::MappingState;
use std::time::Instant;

/// Runs the heuristic mapper end to end on `circuit` over `device`.
pub fn route_circuit(
    circuit: &CircuitGenome,
    device: &HardwareProfile,
    config: &MapperConfig,
) -> Result<MappingResult> {
    if circuit.num_qubits > device.num_qubits {
        return Err(MapperError::DeviceTooSmall(
            circuit.num_qubits,
            device.num_qubits,
        ));
    }

    let deadline = (config.timeout_ms > 0)
        .then(|| Instant::now() + std::time::Duration::from_millis(config.timeout_ms));

    let mut layers = layering::partition_layers(&circuit.gates, config.layering);
    let dist = device.distance_table();
    let max_skip = layers.len().max(1);
    let edge_skip = device.edge_skip_distance_table(max_skip);
    let fidelity = device.fidelity_cost_table();
    let teleport_channels = if config.teleportation.enabled {
        device.teleport_channels(config.teleportation.num_channels, config.seed)
    } else {
        Vec::new()
    };

    let mut state = initial_layout::build_initial_layout(
        config.initial_layout,
        device,
        circuit.num_qubits,
        &layers,
        config.seed,
    );

    let mut out = CircuitGenome::new(device.num_qubits);
    let mut total_swaps = 0usize;

    let mut i = 0;
    while i < layers.len() {
        if let Some(dl) = deadline {
            if Instant::now() >= dl {
                return Ok(MappingResult::timeout(device.num_qubits));
            }
        }

        let future: Vec<Layer> = layers[(i + 1)..].to_vec();
        let params = AstarParams {
            heuristic: config.heuristic,
            lookahead: config.lookahead,
            early_termination: config.early_termination,
            early_termination_limit: config.early_termination_limit,
            future_layers: &future,
            teleportation: config.teleportation,
            teleport_channels: &teleport_channels,
        };

        match astar::route_layer(device, &dist, &edge_skip, &fidelity, &layers[i], &state, &params) {
            AstarOutcome::Solved { swaps, state: next_state } => {
                emit_layer(&mut out, &state, &layers[i], &swaps, device, &teleport_channels)?;
                total_swaps += swaps.len();
                state = next_state;
                i += 1;
            }
            AstarOutcome::CapReached => {
                if let Some((head, tail)) = layering::auto_split(&layers[i]) {
                    layers[i] = head;
                    layers.insert(i + 1, tail);
                    // Retry the (now smaller) layer from scratch.
                } else {
                    return Err(MapperError::CapReached(format!(
                        "layer {i} exceeded its node/solution cap with no smaller split available"
                    )));
                }
            }
        }
    }

    let output_permutation = (0..circuit.num_qubits)
        .map(|l| state.site_of(l).unwrap_or(l))
        .collect();

    Ok(MappingResult {
        circuit: out,
        output_permutation,
        swap_count: total_swaps,
        timed_out: false,
    })
}

/// Emits one layer's single-qubit gates (addressed by the *pre-swap*
/// layout), then its swap prefix (decomposed into CNOTs), then its
/// two-qubit gates (addressed by the *post-swap* layout, with direction
/// reversal applied where the device demands it).
fn emit_layer(
    out: &mut CircuitGenome,
    pre: &MappingState,
    layer: &Layer,
    swaps: &[(usize, usize)],
    device: &HardwareProfile,
    teleport_channels: &[(usize, usize)],
) -> Result<()> {
    for gate in &layer.single_qubit_gates {
        out.add_gate(relocate_single(gate, pre))
            .map_err(MapperError::from)?;
    }

    let mut post = pre.clone();
    for &(a, b) in swaps {
        for decomposed in Gate::SWAP(a, b)
            .decompose_swap()
            .expect("SWAP always decomposes")
        {
            out.add_gate(decomposed).map_err(MapperError::from)?;
        }
        post.swap(a, b);
    }

    for gate in &layer.two_qubit_gates {
        let qs = gate.qubits();
        if qs.len() != 2 {
            continue;
        }
        let (p1, p2) = (
            post.site_of(qs[0]).unwrap_or(qs[0]),
            post.site_of(qs[1]).unwrap_or(qs[1]),
        );
        emit_two_qubit(out, gate, p1, p2, device)?;
    }
    Ok(())
}

fn relocate_single(gate: &Gate, state: &MappingState) -> Gate {
    let qs = gate.qubits();
    if qs.len() != 1 {
        return gate.clone();
    }
    let site = state.site_of(qs[0]).unwrap_or(qs[0]);
    gate.map_qubits(&{
        let mut table = (0..=qs[0]).collect::<Vec<_>>();
        table[qs[0]] = site;
        table
    })
}

/// Emits a two-qubit gate at physical sites `(p1, p2)`, wrapping `CX` in
/// Hadamards when only the reverse device edge exists (§4.4 glossary
/// "direction reversal"). Symmetric gates (`CZ`, `SWAP`) never need it.
fn emit_two_qubit(
    out: &mut CircuitGenome,
    gate: &Gate,
    p1: usize,
    p2: usize,
    device: &HardwareProfile,
) -> Result<()> {
    let forward = device.are_connected(p1, p2);
    let reverse = device.are_connected(p2, p1);
    match gate {
        Gate::CX(_, _) => {
            if forward {
                out.add_gate(Gate::CX(p1, p2)).map_err(MapperError::from)
            } else if reverse {
                out.add_gate(Gate::H(p1)).map_err(MapperError::from)?;
                out.add_gate(Gate::H(p2)).map_err(MapperError::from)?;
                out.add_gate(Gate::CX(p2, p1)).map_err(MapperError::from)?;
                out.add_gate(Gate::H(p1)).map_err(MapperError::from)?;
                out.add_gate(Gate::H(p2)).map_err(MapperError::from)
            } else {
                Err(MapperError::invariant(format!(
                    "no device edge between mapped sites {p1} and {p2}"
                )))
            }
        }
        Gate::CZ(_, _) => out.add_gate(Gate::CZ(p1, p2)).map_err(MapperError::from),
        Gate::SWAP(_, _) => out.add_gate(Gate::SWAP(p1, p2)).map_err(MapperError::from),
        other => Err(MapperError::invariant(format!(
            "{other} is not a routable two-qubit gate"
        ))),
    }
}
