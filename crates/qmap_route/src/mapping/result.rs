//! Result assembly for a mapping run (§4.8).

use crate::error::{MapperError, Result};
use crate::exact::ExactResult;
use crate::layering::Layer;
use qmap_core::types::{CircuitGenome, Gate, HardwareProfile};
use serde::{Deserialize, Serialize};

/// Outcome of a mapping run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingResult {
    /// The mapped circuit: original gates plus inserted SWAPs, decomposed
    /// into device-native gates.
    pub circuit: CircuitGenome,
    /// `output_permutation[l]`: physical site holding logical qubit `l`
    /// after the whole circuit has run (composition of the initial layout
    /// and every swap applied across every layer).
    pub output_permutation: Vec<usize>,
    /// Total number of SWAPs inserted.
    pub swap_count: usize,
    /// Whether the run hit a timeout (no circuit is meaningful if so).
    pub timed_out: bool,
}

impl MappingResult {
    /// A timeout result: no partial mapped circuit is committed (§7,
    /// §8 invariant 7).
    pub fn timeout(num_qubits: usize) -> Self {
        Self {
            circuit: CircuitGenome::new(num_qubits),
            output_permutation: Vec::new(),
            swap_count: 0,
            timed_out: true,
        }
    }
}

/// Assembles a [`MappingResult`] from a completed exact-mapper run (§4.8):
/// walks timesteps in order, emitting each layer's single-qubit gates
/// against its slot placement, the swaps realizing the transition into it,
/// then its two-qubit gates (mirroring the heuristic mapper's
/// `emit_two_qubit`: Hadamard-wrapped when only the reverse device edge
/// connects the chosen slots, rejected if neither direction does).
pub fn assemble_from_exact(
    circuit: &CircuitGenome,
    device: &HardwareProfile,
    layers: &[Layer],
    exact: &ExactResult,
) -> Result<MappingResult> {
    let mut out = CircuitGenome::new(device.num_qubits);
    let slot_site = |slot: usize| exact.subgraph[slot];

    for (t, layer) in layers.iter().enumerate() {
        for gate in &layer.single_qubit_gates {
            let qs = gate.qubits();
            if qs.len() != 1 {
                continue;
            }
            let site = slot_site(exact.placements[t][qs[0]]);
            out.add_gate(gate.map_qubits(&one_entry_table(qs[0], site)))
                .map_err(MapperError::from)?;
        }

        if t > 0 {
            for &(slot_a, slot_b) in &exact.swaps_between[t - 1] {
                let (a, b) = (slot_site(slot_a), slot_site(slot_b));
                for decomposed in Gate::SWAP(a, b)
                    .decompose_swap()
                    .expect("SWAP always decomposes")
                {
                    out.add_gate(decomposed).map_err(MapperError::from)?;
                }
            }
        }

        for gate in &layer.two_qubit_gates {
            let qs = gate.qubits();
            if qs.len() != 2 {
                continue;
            }
            let (p1, p2) = (
                slot_site(exact.placements[t][qs[0]]),
                slot_site(exact.placements[t][qs[1]]),
            );
            super::emit_two_qubit(&mut out, gate, p1, p2, device)?;
        }
    }

    let last_t = layers.len().saturating_sub(1);
    let output_permutation = (0..circuit.num_qubits)
        .map(|l| {
            exact
                .placements
                .get(last_t)
                .map(|p| slot_site(p[l]))
                .unwrap_or(l)
        })
        .collect();

    Ok(MappingResult {
        circuit: out,
        output_permutation,
        swap_count: exact.total_swaps,
        timed_out: false,
    })
}

fn one_entry_table(q: usize, site: usize) -> Vec<usize> {
    let mut table: Vec<usize> = (0..=q).collect();
    table[q] = site;
    table
}
