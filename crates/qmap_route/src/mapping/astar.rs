//! A*-style SWAP-insertion search for a single layer (Core A1, §4.3).
//!
//! Node expansion order is deterministic: the frontier is a total order on
//! (total cost ascending, `g` descending so nodes closer to the goal win
//! ties, generation id ascending as the final tiebreak). Nodes are kept in
//! an arena indexed by id; the frontier and parent links hold ids, not
//! addresses (§9 ownership note).

use crate::layering::Layer;
use crate::mapping::state::MappingState;
use qmap_core::config::{EarlyTermination, Heuristic, LookaheadConfig, TeleportationConfig};
use qmap_core::types::HardwareProfile;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One SWAP applied between two physical sites.
pub type SwapOp = (usize, usize);

/// True when a two-qubit gate with operands at `p1`/`p2` can be executed
/// in place: either a real device edge connects them, or (when
/// teleportation is enabled, §4.3) they sit at the two endpoints of a
/// designated long-range channel, which realizes the gate as a compound
/// teleportation operation instead of a physical-adjacency one.
fn gate_realizable(
    p1: usize,
    p2: usize,
    device: &HardwareProfile,
    teleportation: TeleportationConfig,
    channels: &[(usize, usize)],
) -> bool {
    if device.are_connected(p1, p2) || device.are_connected(p2, p1) {
        return true;
    }
    teleportation.enabled && channels.iter().any(|&(c0, c1)| (c0 == p1 && c1 == p2) || (c0 == p2 && c1 == p1))
}

/// Lower bound on the swaps still needed to bring `p1`/`p2` into a
/// realizable configuration, allowing for routing each operand onto its
/// own endpoint of some teleport channel instead of onto each other.
/// Still admissible: it is the minimum over two independent shortest-path
/// routings (direct adjacency, or one operand per channel endpoint), never
/// more than the true cost of whichever option the search actually takes.
fn teleport_shortcut_cost(p1: usize, p2: usize, dist: &[Vec<usize>], channels: &[(usize, usize)]) -> f64 {
    let mut best = dist[p1][p2].saturating_sub(1) as f64;
    for &(c0, c1) in channels {
        let via = dist[p1][c0] as f64 + dist[p2][c1] as f64;
        let via_rev = dist[p1][c1] as f64 + dist[p2][c0] as f64;
        best = best.min(via).min(via_rev);
    }
    best
}

/// Sum, over every two-qubit gate in `layer` whose operands already sit on
/// physically adjacent sites, of the direction-reversal cost (§4.3) owed
/// because only the reverse device edge connects them — the `H`-wrap cost
/// `emit_two_qubit`-equivalent emission pays later. Zero for pairs realized
/// on the forward edge, via teleportation, or not yet adjacent at all.
fn reversal_component(mode: Heuristic, state: &MappingState, layer: &Layer, device: &HardwareProfile) -> f64 {
    let mut total = 0.0;
    for (q1, q2) in layer.pairs() {
        let (Some(p1), Some(p2)) = (state.site_of(q1), state.site_of(q2)) else {
            continue;
        };
        if device.are_connected(p1, p2) || !device.are_connected(p2, p1) {
            continue;
        }
        total += match mode {
            Heuristic::Fidelity => device.reverse_cost(p1, p2),
            _ => 1.0,
        };
    }
    total
}

/// A node in the A* search arena.
#[derive(Debug, Clone)]
struct SearchNode {
    id: usize,
    parent_id: Option<usize>,
    /// Sum of swap costs applied from the root, excluding reversal cost.
    swap_accum: f64,
    /// `swap_accum` plus the current state's reversal cost (§4.3): the
    /// fixed cost-so-far term used for ordering and termination decisions.
    g: f64,
    h: f64,
    lookahead_penalty: f64,
    state: MappingState,
    swaps: Vec<SwapOp>,
    depth: usize,
}

impl SearchNode {
    fn total_cost(&self) -> f64 {
        self.g + self.h + self.lookahead_penalty
    }
}

/// Wraps a node id for the binary heap; `BinaryHeap` is a max-heap so the
/// `Ord` impl here inverts cost to make the heap pop the *cheapest* node
/// first, per §3's total order.
struct HeapEntry {
    id: usize,
    total_cost: f64,
    g: f64,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower total cost first; among equal costs, larger g (closer to
        // goal) first; remaining ties broken by smaller (earlier) id.
        other
            .total_cost
            .partial_cmp(&self.total_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.g.partial_cmp(&other.g).unwrap_or(Ordering::Equal))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Outcome of a single-layer A* run.
#[derive(Debug, Clone)]
pub enum AstarOutcome {
    /// A valid mapping was found: swaps to apply (in order) and the
    /// resulting state.
    Solved {
        swaps: Vec<SwapOp>,
        state: MappingState,
    },
    /// An early-termination policy fired before any solution was found.
    CapReached,
}

/// Parameters threaded through a layer's A* search.
pub struct AstarParams<'a> {
    pub heuristic: Heuristic,
    pub lookahead: LookaheadConfig,
    pub early_termination: EarlyTermination,
    pub early_termination_limit: usize,
    /// Future layers considered for lookahead discounting, nearest first.
    pub future_layers: &'a [Layer],
    /// Teleportation settings (§4.3); `teleportation.enabled == false` by
    /// default, in which case `teleport_channels` is ignored.
    pub teleportation: TeleportationConfig,
    /// Designated long-range channel endpoints, precomputed once per run.
    pub teleport_channels: &'a [(usize, usize)],
}

/// Runs A* for a single layer starting from `initial`, possibly placing
/// any unplaced logical qubits it first touches (Dynamic initial layout)
/// on an arbitrary free adjacent site before routing.
pub fn route_layer(
    device: &HardwareProfile,
    dist: &[Vec<usize>],
    edge_skip: &[Vec<Vec<usize>>],
    fidelity_cost: &[Vec<f64>],
    layer: &Layer,
    initial: &MappingState,
    params: &AstarParams,
) -> AstarOutcome {
    let mut state = initial.clone();
    place_unplaced_operands(&mut state, device, layer);

    if is_satisfied(&state, layer, device, params.teleportation, params.teleport_channels) {
        return AstarOutcome::Solved {
            swaps: Vec::new(),
            state,
        };
    }

    let mut arena: Vec<SearchNode> = Vec::new();
    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();

    let root_h = heuristic(
        &state,
        layer,
        params.heuristic,
        dist,
        edge_skip,
        fidelity_cost,
        0,
        params.teleportation,
        params.teleport_channels,
    );
    let root_reversal = reversal_component(params.heuristic, &state, layer, device);
    let root = SearchNode {
        id: 0,
        parent_id: None,
        swap_accum: 0.0,
        g: root_reversal,
        h: root_h,
        lookahead_penalty: lookahead_penalty(&state, params, dist, edge_skip, fidelity_cost),
        state,
        swaps: Vec::new(),
        depth: 0,
    };
    heap.push(HeapEntry {
        id: 0,
        total_cost: root.total_cost(),
        g: root.g,
    });
    arena.push(root);

    let mut expanded = 0usize;
    let mut solutions_seen = 0usize;
    let mut best_cost = f64::INFINITY;
    let mut expanded_since_improvement = 0usize;
    let mut expanded_since_solution = 0usize;

    while let Some(entry) = heap.pop() {
        let node_id = entry.id;
        let (g, depth, is_valid, swaps_snapshot, state_snapshot) = {
            let node = &arena[node_id];
            (
                node.g,
                node.depth,
                is_satisfied(&node.state, layer, device, params.teleportation, params.teleport_channels),
                node.swaps.clone(),
                node.state.clone(),
            )
        };

        if is_valid {
            solutions_seen += 1;
            if g < best_cost {
                best_cost = g;
                expanded_since_improvement = 0;
            }
            let stop = match params.early_termination {
                EarlyTermination::SolutionCount => {
                    solutions_seen >= params.early_termination_limit
                }
                _ => true,
            };
            if stop {
                return AstarOutcome::Solved {
                    swaps: swaps_snapshot,
                    state: state_snapshot,
                };
            }
        }

        expanded += 1;
        expanded_since_improvement += 1;
        expanded_since_solution += 1;

        if should_terminate(
            params,
            expanded,
            solutions_seen,
            expanded_since_improvement,
            expanded_since_solution,
        ) {
            return AstarOutcome::CapReached;
        }

        for (a, b) in candidate_swaps(&arena[node_id].state, layer, device, params.teleportation, params.teleport_channels) {
            let mut next_state = arena[node_id].state.clone();
            next_state.swap(a, b);
            let swap_cost = edge_cost(device, fidelity_cost, params.heuristic, a, b);
            let mut next_swaps = arena[node_id].swaps.clone();
            next_swaps.push((a, b));

            let new_id = arena.len();
            let swap_accum = arena[node_id].swap_accum + swap_cost;
            let reversal = reversal_component(params.heuristic, &next_state, layer, device);
            let g = swap_accum + reversal;
            let h = heuristic(
                &next_state,
                layer,
                params.heuristic,
                dist,
                edge_skip,
                fidelity_cost,
                depth + 1,
                params.teleportation,
                params.teleport_channels,
            );
            let lookahead_penalty = lookahead_penalty(&next_state, params, dist, edge_skip, fidelity_cost);
            let node = SearchNode {
                id: new_id,
                parent_id: Some(node_id),
                swap_accum,
                g,
                h,
                lookahead_penalty,
                state: next_state,
                swaps: next_swaps,
                depth: depth + 1,
            };
            heap.push(HeapEntry {
                id: new_id,
                total_cost: node.total_cost(),
                g: node.g,
            });
            arena.push(node);
        }
    }

    AstarOutcome::CapReached
}

fn should_terminate(
    params: &AstarParams,
    expanded: usize,
    solutions_seen: usize,
    expanded_since_improvement: usize,
    expanded_since_solution: usize,
) -> bool {
    let limit = params.early_termination_limit;
    match params.early_termination {
        EarlyTermination::None => false,
        EarlyTermination::NodeLimit => expanded >= limit,
        EarlyTermination::NodesAfterFirstSolution => solutions_seen > 0 && expanded_since_solution >= limit,
        EarlyTermination::NodesAfterCurrentOptimum => {
            solutions_seen > 0 && expanded_since_improvement >= limit
        }
        EarlyTermination::SolutionCount => false, // handled inline at solution discovery
        EarlyTermination::SolutionCountAfterOptimum => solutions_seen >= limit && solutions_seen > 0,
    }
}

/// Assigns a free physical site (the first free site adjacent to an
/// already-placed operand, else any free site) to any logical qubit this
/// layer's gates touch that has not yet been placed (Dynamic initial
/// layout).
fn place_unplaced_operands(state: &mut MappingState, device: &HardwareProfile, layer: &Layer) {
    for (q1, q2) in layer.pairs() {
        for q in [q1, q2] {
            if q < state.locations.len() && state.locations[q].is_none() {
                let site = first_free_site(state, device);
                if let Some(site) = site {
                    state.place(q, site);
                }
            }
        }
    }
}

fn first_free_site(state: &MappingState, _device: &HardwareProfile) -> Option<usize> {
    state.qubits.iter().position(|q| q.is_none())
}

/// True when every two-qubit gate in `layer` has both operands on
/// physically adjacent (or directly coupled, respecting directionality on
/// non-bidirectional devices) sites, or sitting at the two endpoints of a
/// teleportation channel when one is enabled.
fn is_satisfied(
    state: &MappingState,
    layer: &Layer,
    device: &HardwareProfile,
    teleportation: TeleportationConfig,
    channels: &[(usize, usize)],
) -> bool {
    layer.pairs().iter().all(|&(q1, q2)| {
        let (Some(p1), Some(p2)) = (state.site_of(q1), state.site_of(q2)) else {
            return false;
        };
        gate_realizable(p1, p2, device, teleportation, channels)
    })
}

/// Candidate SWAPs: any device edge incident to a physical site currently
/// holding an operand of an unsatisfied gate in this layer.
fn candidate_swaps(
    state: &MappingState,
    layer: &Layer,
    device: &HardwareProfile,
    teleportation: TeleportationConfig,
    channels: &[(usize, usize)],
) -> Vec<(usize, usize)> {
    let mut active_sites = std::collections::HashSet::new();
    for (q1, q2) in layer.pairs() {
        let (Some(p1), Some(p2)) = (state.site_of(q1), state.site_of(q2)) else {
            continue;
        };
        if !gate_realizable(p1, p2, device, teleportation, channels) {
            active_sites.insert(p1);
            active_sites.insert(p2);
        }
    }

    let mut swaps = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for &site in &active_sites {
        for neighbor in device.neighbors(site) {
            let key = (site.min(neighbor), site.max(neighbor));
            if seen.insert(key) {
                swaps.push(key);
            }
        }
    }
    swaps
}

fn edge_cost(device: &HardwareProfile, fidelity_cost: &[Vec<f64>], heuristic: Heuristic, a: usize, b: usize) -> f64 {
    match heuristic {
        Heuristic::Fidelity => fidelity_cost[a][b],
        _ => {
            let _ = device;
            1.0
        }
    }
}

/// Admissible heuristic estimate: sum (or max, for the max-distance
/// variant) of edge-skip distances over unsatisfied pairs, in hop space or
/// fidelity-cost space depending on `mode`.
fn heuristic(
    state: &MappingState,
    layer: &Layer,
    mode: Heuristic,
    dist: &[Vec<usize>],
    edge_skip: &[Vec<Vec<usize>>],
    fidelity_cost: &[Vec<f64>],
    swaps_applied: usize,
    teleportation: TeleportationConfig,
    teleport_channels: &[(usize, usize)],
) -> f64 {
    let pairs = layer.pairs();
    let mut per_pair_costs: Vec<f64> = Vec::with_capacity(pairs.len());
    let mut per_pair_shared: Vec<f64> = Vec::with_capacity(pairs.len());

    for &(q1, q2) in &pairs {
        let (Some(p1), Some(p2)) = (state.site_of(q1), state.site_of(q2)) else {
            per_pair_costs.push(0.0);
            per_pair_shared.push(0.0);
            continue;
        };
        let k = swaps_applied.min(edge_skip.len().saturating_sub(1));
        let mut cost = match mode {
            Heuristic::Fidelity => fidelity_cost[p1][p2],
            _ => edge_skip.get(k).map(|table| table[p1][p2] as f64).unwrap_or(dist[p1][p2] as f64),
        };
        if teleportation.enabled {
            cost = cost.min(teleport_shortcut_cost(p1, p2, dist, teleport_channels));
        }
        per_pair_costs.push(cost);
        // Shared-swap credit: the portion of distance already collapsed by
        // swaps other pairs also benefited from, approximated as the gap
        // between the unskipped and skipped distance for this pair.
        let base = match mode {
            Heuristic::Fidelity => fidelity_cost[p1][p2],
            _ => dist[p1][p2] as f64,
        };
        per_pair_shared.push((base - cost).max(0.0));
    }

    match mode {
        Heuristic::MaxDistance => per_pair_costs.iter().cloned().fold(0.0, f64::max),
        Heuristic::BasicMinusSharedSwaps => {
            let sum: f64 = per_pair_costs.iter().sum();
            let shared: f64 = per_pair_shared.iter().sum();
            (sum - shared).max(0.0)
        }
        _ => per_pair_costs.iter().sum(),
    }
}

/// Discounted contribution from the next `lookahead.depth` layers,
/// evaluated against the candidate's current layout (§4.3 lookahead).
fn lookahead_penalty(
    state: &MappingState,
    params: &AstarParams,
    dist: &[Vec<usize>],
    edge_skip: &[Vec<Vec<usize>>],
    fidelity_cost: &[Vec<f64>],
) -> f64 {
    if !params.lookahead.enabled {
        return 0.0;
    }
    let mut total = 0.0;
    let mut scale = params.lookahead.first_factor;
    for future in params.future_layers.iter().take(params.lookahead.depth) {
        total += scale
            * heuristic(
                state,
                future,
                params.heuristic,
                dist,
                edge_skip,
                fidelity_cost,
                0,
                params.teleportation,
                params.teleport_channels,
            );
        scale *= params.lookahead.factor;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layering::Layer;
    use qmap_core::types::Gate;

    fn line_device(n: usize) -> HardwareProfile {
        HardwareProfile::linear("test-line", n)
    }

    fn default_params() -> AstarParams<'static> {
        AstarParams {
            heuristic: Heuristic::Basic,
            lookahead: LookaheadConfig::default(),
            early_termination: EarlyTermination::None,
            early_termination_limit: 0,
            future_layers: &[],
            teleportation: TeleportationConfig::default(),
            teleport_channels: &[],
        }
    }

    #[test]
    fn test_already_adjacent_needs_no_swaps() {
        let device = line_device(4);
        let dist = device.distance_table();
        let edge_skip = device.edge_skip_distance_table(4);
        let fidelity = device.fidelity_cost_table();
        let layer = Layer {
            two_qubit_gates: vec![Gate::CX(0, 1)],
            single_qubit_gates: vec![],
        };
        let state = MappingState::identity(4, 4);
        let params = default_params();
        let outcome = route_layer(&device, &dist, &edge_skip, &fidelity, &layer, &state, &params);
        match outcome {
            AstarOutcome::Solved { swaps, .. } => assert!(swaps.is_empty()),
            AstarOutcome::CapReached => panic!("expected a solution"),
        }
    }

    #[test]
    fn test_five_qubit_line_cnot_0_4_reaches_adjacency_optimally() {
        // Line 0-1-2-3-4, CNOT(0,4): the two endpoints start 4 hops apart,
        // so bringing them adjacent costs exactly dist-1 swaps.
        let device = line_device(5);
        let dist = device.distance_table();
        let edge_skip = device.edge_skip_distance_table(4);
        let fidelity = device.fidelity_cost_table();
        let layer = Layer {
            two_qubit_gates: vec![Gate::CX(0, 4)],
            single_qubit_gates: vec![],
        };
        let state = MappingState::identity(5, 5);
        let params = default_params();
        let outcome = route_layer(&device, &dist, &edge_skip, &fidelity, &layer, &state, &params);
        match outcome {
            AstarOutcome::Solved { swaps, state } => {
                assert_eq!(swaps.len(), dist[0][4] - 1);
                assert!(is_satisfied(
                    &state,
                    &layer,
                    &device,
                    TeleportationConfig::default(),
                    &[]
                ));
            }
            AstarOutcome::CapReached => panic!("expected a solution"),
        }
    }

    #[test]
    fn test_node_limit_caps_search() {
        let device = line_device(5);
        let dist = device.distance_table();
        let edge_skip = device.edge_skip_distance_table(4);
        let fidelity = device.fidelity_cost_table();
        let layer = Layer {
            two_qubit_gates: vec![Gate::CX(0, 4)],
            single_qubit_gates: vec![],
        };
        let state = MappingState::identity(5, 5);
        let mut params = default_params();
        params.early_termination = EarlyTermination::NodeLimit;
        params.early_termination_limit = 1;
        let outcome = route_layer(&device, &dist, &edge_skip, &fidelity, &layer, &state, &params);
        assert!(matches!(outcome, AstarOutcome::CapReached));
    }

    #[test]
    fn test_teleport_channel_satisfies_gate_without_swaps() {
        // Line 0-1-2-3-4-5-6: the farthest-pair channel sits exactly on
        // CNOT(0,6)'s operands, so no physical adjacency swaps are needed
        // when teleportation is enabled.
        let device = line_device(7);
        let dist = device.distance_table();
        let edge_skip = device.edge_skip_distance_table(6);
        let fidelity = device.fidelity_cost_table();
        let layer = Layer {
            two_qubit_gates: vec![Gate::CX(0, 6)],
            single_qubit_gates: vec![],
        };
        let state = MappingState::identity(7, 7);
        let channels = device.teleport_channels(1, 0);
        assert_eq!(channels, vec![(0, 6)]);

        let mut params = default_params();
        params.teleportation.enabled = true;
        params.teleport_channels = &channels;

        let outcome = route_layer(&device, &dist, &edge_skip, &fidelity, &layer, &state, &params);
        match outcome {
            AstarOutcome::Solved { swaps, state } => {
                assert!(swaps.is_empty());
                assert!(is_satisfied(&state, &layer, &device, params.teleportation, &channels));
            }
            AstarOutcome::CapReached => panic!("expected a solution"),
        }
    }

    #[test]
    fn test_teleport_channel_reduces_swaps_for_nearby_pair() {
        // Line 0..=8, channel at (1,7): CNOT(0,6) is 6 hops apart directly,
        // but 0 is one swap from channel endpoint 1, and 6 is one swap from
        // endpoint 7, so teleportation should finish in fewer swaps than
        // routing 0 and 6 directly adjacent.
        let device = line_device(9);
        let dist = device.distance_table();
        let edge_skip = device.edge_skip_distance_table(8);
        let fidelity = device.fidelity_cost_table();
        let layer = Layer {
            two_qubit_gates: vec![Gate::CX(0, 6)],
            single_qubit_gates: vec![],
        };
        let state = MappingState::identity(9, 9);
        let channels = vec![(1usize, 7usize)];

        let mut params = default_params();
        params.teleportation.enabled = true;
        params.teleport_channels = &channels;
        let with_teleport = route_layer(&device, &dist, &edge_skip, &fidelity, &layer, &state, &params);

        params.teleportation.enabled = false;
        let without_teleport = route_layer(&device, &dist, &edge_skip, &fidelity, &layer, &state, &params);

        let (Some(swaps_with), Some(swaps_without)) = (
            as_swap_count(&with_teleport),
            as_swap_count(&without_teleport),
        ) else {
            panic!("expected both searches to find a solution");
        };
        assert!(swaps_with < swaps_without);
    }

    fn as_swap_count(outcome: &AstarOutcome) -> Option<usize> {
        match outcome {
            AstarOutcome::Solved { swaps, .. } => Some(swaps.len()),
            AstarOutcome::CapReached => None,
        }
    }

    #[test]
    fn test_disabled_teleportation_ignores_channels() {
        let device = line_device(7);
        let dist = device.distance_table();
        let edge_skip = device.edge_skip_distance_table(6);
        let fidelity = device.fidelity_cost_table();
        let layer = Layer {
            two_qubit_gates: vec![Gate::CX(0, 6)],
            single_qubit_gates: vec![],
        };
        let state = MappingState::identity(7, 7);
        let channels = device.teleport_channels(1, 0);
        let params = default_params(); // teleportation disabled by default
        let outcome = route_layer(&device, &dist, &edge_skip, &fidelity, &layer, &state, &params);
        match outcome {
            AstarOutcome::Solved { swaps, .. } => assert_eq!(swaps.len(), dist[0][6] - 1),
            AstarOutcome::CapReached => panic!("expected a solution"),
        }
        let _ = channels;
    }
}
