//! Hardware profile for quantum devices.
//!
//! This module defines the hardware characteristics including:
//! - Qubit connectivity (topology)
//! - Per-qubit T1/T2 times
//! - Gate error rates
//! - Gate timings

use crate::physics::{gate_errors, gate_times, t1_typical, t2_typical};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Converts a gate error rate into an additive fidelity-routing cost
/// `-log2(1 - e)`, so that a path's total cost corresponds to
/// `-log2(product of per-edge fidelities)`.
fn fidelity_edge_cost(error_rate: f64) -> f64 {
    let fidelity = (1.0 - error_rate).max(f64::MIN_POSITIVE);
    -fidelity.log2()
}

/// Min-heap ordering wrapper for `(cost, node)` pairs with `f64` costs.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedCost(f64, usize);

impl Eq for OrderedCost {}

impl PartialOrd for OrderedCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedCost {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .partial_cmp(&self.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.1.cmp(&self.1))
    }
}

/// Fidelity value constrained to [0.0, 1.0].
///
/// Fidelity measures how close a quantum state or operation is to the ideal.
/// - 1.0 = perfect fidelity
/// - 0.0 = completely orthogonal/wrong
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Fidelity(f64);

impl Fidelity {
    /// Creates a new Fidelity value.
    ///
    /// # Panics
    /// Panics if value is not in [0.0, 1.0].
    pub fn new(value: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&value),
            "Fidelity must be in [0.0, 1.0], got {}",
            value
        );
        Self(value)
    }

    /// Creates a Fidelity, clamping to [0.0, 1.0].
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the fidelity as f64.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Perfect fidelity (1.0).
    pub const PERFECT: Self = Self(1.0);

    /// Zero fidelity (0.0).
    pub const ZERO: Self = Self(0.0);

    /// Converts error rate to fidelity (F = 1 - ε).
    pub fn from_error_rate(error: f64) -> Self {
        Self::clamped(1.0 - error)
    }

    /// Returns the error rate (ε = 1 - F).
    pub fn error_rate(&self) -> f64 {
        1.0 - self.0
    }
}

impl Default for Fidelity {
    fn default() -> Self {
        Self::PERFECT
    }
}

impl std::fmt::Display for Fidelity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Qubit properties for a single qubit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QubitProperties {
    /// T1 relaxation time (μs)
    pub t1: f64,
    /// T2 dephasing time (μs)
    pub t2: f64,
    /// Readout fidelity
    pub readout_fidelity: Fidelity,
    /// Single-qubit gate fidelity
    pub single_gate_fidelity: Fidelity,
    /// Frequency (GHz), if known
    pub frequency: Option<f64>,
    /// Anharmonicity (MHz), if known
    pub anharmonicity: Option<f64>,
}

impl Default for QubitProperties {
    fn default() -> Self {
        Self {
            t1: t1_typical::NISQ_TYPICAL,
            t2: t2_typical::NISQ_TYPICAL,
            readout_fidelity: Fidelity::from_error_rate(gate_errors::MEASUREMENT_TYPICAL),
            single_gate_fidelity: Fidelity::from_error_rate(gate_errors::SINGLE_QUBIT_TYPICAL),
            frequency: None,
            anharmonicity: None,
        }
    }
}

impl QubitProperties {
    /// Creates a new QubitProperties with the given T1/T2 values.
    pub fn with_t1t2(t1: f64, t2: f64) -> Self {
        Self {
            t1,
            t2,
            ..Default::default()
        }
    }

    /// Returns the T2/T1 ratio (dephasing quality indicator).
    ///
    /// For superconducting qubits, typically 0.5 ≤ T2/T1 ≤ 2.0.
    /// T2 ≤ 2*T1 is a physical constraint.
    pub fn t2_t1_ratio(&self) -> f64 {
        if self.t1 > 0.0 {
            self.t2 / self.t1
        } else {
            0.0
        }
    }
}

/// Two-qubit gate properties between a pair of qubits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouplerProperties {
    /// Control qubit index
    pub qubit1: usize,
    /// Target qubit index
    pub qubit2: usize,
    /// Two-qubit gate fidelity
    pub gate_fidelity: Fidelity,
    /// Gate time (ns)
    pub gate_time_ns: f64,
    /// Native gate type (e.g., "CZ", "CX", "iSWAP")
    pub native_gate: String,
}

impl CouplerProperties {
    /// Creates a new CouplerProperties with default values.
    pub fn new(qubit1: usize, qubit2: usize) -> Self {
        Self {
            qubit1,
            qubit2,
            gate_fidelity: Fidelity::from_error_rate(gate_errors::TWO_QUBIT_TYPICAL),
            gate_time_ns: gate_times::TWO_QUBIT,
            native_gate: "CZ".to_string(),
        }
    }

    /// Returns the ordered pair (min, max) for consistent edge representation.
    pub fn edge(&self) -> (usize, usize) {
        if self.qubit1 <= self.qubit2 {
            (self.qubit1, self.qubit2)
        } else {
            (self.qubit2, self.qubit1)
        }
    }
}

/// Topology types for common quantum hardware layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// All qubits connected to all others
    AllToAll,
    /// Linear chain: qubit i connected to i±1
    Linear,
    /// Ring: linear with wrap-around
    Ring,
    /// 2D grid/lattice (e.g., Google Sycamore)
    Grid { rows: usize, cols: usize },
    /// Heavy-hex lattice (e.g., IBM)
    HeavyHex,
    /// Custom topology (defined by edge list)
    Custom,
}

/// Represents the crosstalk interaction strength between pairs of qubits.
///
/// Stores entries as (min, max) -> strength key pairs to ensure symmetry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CrosstalkMatrix {
    /// Interaction strength mapping (e.g., ZZ interaction frequency or error rate).
    /// Key is (qubit1, qubit2) where qubit1 < qubit2.
    /// Value is the interaction strength (normalized 0.0 to 1.0 or frequency in Hz depending on usage).
    pub interactions: HashMap<(usize, usize), f64>,
}

impl CrosstalkMatrix {
    /// Creates a new empty CrosstalkMatrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interaction strength between two qubits.
    pub fn set_interaction(&mut self, q1: usize, q2: usize, strength: f64) {
        let key = if q1 < q2 { (q1, q2) } else { (q2, q1) };
        self.interactions.insert(key, strength);
    }

    /// Gets the interaction strength between two qubits.
    pub fn get_interaction(&self, q1: usize, q2: usize) -> Option<f64> {
        let key = if q1 < q2 { (q1, q2) } else { (q2, q1) };
        self.interactions.get(&key).copied()
    }

    /// Returns true if the matrix is empty.
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }
}

/// Hardware profile describing a quantum device.
///
/// Contains qubit properties, connectivity, and calibration data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareProfile {
    /// Device name
    pub name: String,
    /// Number of qubits
    pub num_qubits: usize,
    /// Topology type
    pub topology: Topology,
    /// Per-qubit properties
    pub qubit_properties: Vec<QubitProperties>,
    /// Two-qubit gate properties (connectivity)
    pub couplers: Vec<CouplerProperties>,
    /// If true, each coupler is a directed edge `qubit1 -> qubit2` (native
    /// two-qubit gate direction matters, e.g. CX control/target). If false,
    /// couplers are bidirectional.
    #[serde(default)]
    pub directed: bool,
    /// Connectivity graph as adjacency set
    #[serde(skip)]
    connectivity: HashSet<(usize, usize)>,
    /// Calibration timestamp (Unix time)
    pub calibration_timestamp: Option<u64>,
    /// Crosstalk interaction matrix
    pub crosstalk: CrosstalkMatrix,
}

impl HardwareProfile {
    /// Creates a new HardwareProfile with default qubit properties.
    pub fn new(name: impl Into<String>, num_qubits: usize, topology: Topology) -> Self {
        let qubit_properties = vec![QubitProperties::default(); num_qubits];
        let couplers = Self::generate_couplers(num_qubits, &topology);
        let connectivity = couplers.iter().map(|c| c.edge()).collect();

        Self {
            name: name.into(),
            num_qubits,
            topology,
            qubit_properties,
            couplers,
            directed: false,
            connectivity,
            calibration_timestamp: None,
            crosstalk: CrosstalkMatrix::default(),
        }
    }

    /// Creates a linear topology (chain).
    pub fn linear(name: impl Into<String>, num_qubits: usize) -> Self {
        Self::new(name, num_qubits, Topology::Linear)
    }

    /// Creates an all-to-all connected topology.
    pub fn all_to_all(name: impl Into<String>, num_qubits: usize) -> Self {
        Self::new(name, num_qubits, Topology::AllToAll)
    }

    /// Creates a grid topology.
    pub fn grid(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self::new(name, rows * cols, Topology::Grid { rows, cols })
    }

    /// Creates an IBM Heavy-hex topology.
    ///
    /// Heavy-hex is IBM's qubit topology used in Falcon, Hummingbird, and Eagle processors.
    /// It consists of hexagonal cells with "bridge" qubits on alternating edges.
    ///
    /// # Arguments
    /// * `name` - Device name
    /// * `rows` - Number of hexagonal rows (e.g., 3 for 27-qubit Falcon)
    /// * `cols` - Number of hexagonal columns
    ///
    /// # Example
    /// ```
    /// use qmap_core::types::HardwareProfile;
    /// let falcon = HardwareProfile::heavy_hex("ibm_falcon", 3, 3); // ~27 qubits
    /// ```
    pub fn heavy_hex(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        // Heavy-hex structure:
        // Each "unit cell" consists of a hexagon with bridge qubits
        // For simplicity, we generate a regular pattern:
        //
        // Row 0:  0 - 1 - 2 - 3 - 4   (main qubits)
        //         |       |       |
        // Bridge: 5       6       7
        //         |       |       |
        // Row 1:  8 - 9 -10 -11 -12
        //             |       |
        // Bridge:    13      14
        //             |       |
        // Row 2: 15 -16 -17 -18 -19
        //         |       |       |
        // Bridge:20      21      22
        //         |       |       |
        // Row 3: 23 -24 -25 -26 -27

        let qubits_per_row = cols;
        let bridges_per_gap = cols.div_ceil(2); // Alternating bridges

        // Calculate total qubits
        let main_qubits = rows * qubits_per_row;
        let bridge_rows = rows.saturating_sub(1);
        let bridge_qubits = bridge_rows * bridges_per_gap;
        let num_qubits = main_qubits + bridge_qubits;

        let qubit_properties = vec![QubitProperties::default(); num_qubits];
        let couplers = Self::generate_heavy_hex_couplers(rows, cols, num_qubits);
        let connectivity = couplers.iter().map(|c| c.edge()).collect();

        Self {
            name: name.into(),
            num_qubits,
            topology: Topology::HeavyHex,
            qubit_properties,
            couplers,
            directed: false,
            connectivity,
            calibration_timestamp: None,
            crosstalk: CrosstalkMatrix::default(),
        }
    }

    /// Generates couplers for heavy-hex topology.
    fn generate_heavy_hex_couplers(
        rows: usize,
        cols: usize,
        _total_qubits: usize,
    ) -> Vec<CouplerProperties> {
        let mut couplers = Vec::new();
        let bridges_per_gap = cols.div_ceil(2);

        for row in 0..rows {
            // Calculate main row qubit offset
            let main_row_offset: usize = (0..row)
                .map(|r| cols + if r < rows - 1 { bridges_per_gap } else { 0 })
                .sum();

            // Horizontal connections in main row
            for c in 0..(cols.saturating_sub(1)) {
                let q1 = main_row_offset + c;
                let q2 = main_row_offset + c + 1;
                couplers.push(CouplerProperties::new(q1, q2));
            }

            // Vertical connections to bridge qubits (alternating pattern)
            if row < rows - 1 {
                let bridge_row_offset = main_row_offset + cols;
                for b in 0..bridges_per_gap {
                    let bridge_col = b * 2; // Every other column
                    if bridge_col < cols {
                        let bridge_idx = bridge_row_offset + b;
                        let top_qubit = main_row_offset + bridge_col;

                        // Calculate next row offset
                        let next_main_offset = main_row_offset + cols + bridges_per_gap;
                        let bottom_qubit = next_main_offset + bridge_col;

                        // Connect bridge to top and bottom
                        couplers.push(CouplerProperties::new(top_qubit, bridge_idx));
                        couplers.push(CouplerProperties::new(bridge_idx, bottom_qubit));
                    }
                }
            }
        }

        // Remove any invalid or duplicate couplers
        couplers.retain(|c| c.qubit1 != c.qubit2);
        couplers.sort_by_key(|c| c.edge());
        couplers.dedup_by_key(|c| c.edge());

        couplers
    }

    /// Generates couplers based on topology.
    fn generate_couplers(num_qubits: usize, topology: &Topology) -> Vec<CouplerProperties> {
        let mut couplers = Vec::new();

        match topology {
            Topology::AllToAll => {
                for i in 0..num_qubits {
                    for j in (i + 1)..num_qubits {
                        couplers.push(CouplerProperties::new(i, j));
                    }
                }
            },
            Topology::Linear => {
                for i in 0..(num_qubits.saturating_sub(1)) {
                    couplers.push(CouplerProperties::new(i, i + 1));
                }
            },
            Topology::Ring => {
                for i in 0..num_qubits {
                    couplers.push(CouplerProperties::new(i, (i + 1) % num_qubits));
                }
            },
            Topology::Grid { rows, cols } => {
                for r in 0..*rows {
                    for c in 0..*cols {
                        let idx = r * cols + c;
                        // Right neighbor
                        if c + 1 < *cols {
                            couplers.push(CouplerProperties::new(idx, idx + 1));
                        }
                        // Bottom neighbor
                        if r + 1 < *rows {
                            couplers.push(CouplerProperties::new(idx, idx + cols));
                        }
                    }
                }
            },
            Topology::HeavyHex | Topology::Custom => {
                // For custom/heavy-hex, couplers must be added manually
            },
        }

        couplers
    }

    /// Checks if two qubits are directly connected.
    ///
    /// For directed topologies this only reports edges usable in the given
    /// order; use [`HardwareProfile::are_linked`] to ignore direction.
    pub fn are_connected(&self, q1: usize, q2: usize) -> bool {
        if self.directed {
            self.couplers
                .iter()
                .any(|c| c.qubit1 == q1 && c.qubit2 == q2)
        } else {
            let edge = if q1 <= q2 { (q1, q2) } else { (q2, q1) };
            self.connectivity.contains(&edge)
        }
    }

    /// Checks if two qubits share a coupler in either direction.
    pub fn are_linked(&self, q1: usize, q2: usize) -> bool {
        let edge = if q1 <= q2 { (q1, q2) } else { (q2, q1) };
        self.connectivity.contains(&edge)
    }

    /// Returns the coupling map (list of physical edges).
    pub fn coupling_map(&self) -> &Vec<CouplerProperties> {
        &self.couplers
    }

    /// Calculate shortest path distance between two qubits using BFS.
    pub fn shortest_path_distance(&self, start: usize, end: usize) -> Option<usize> {
        if start == end {
            return Some(0);
        }

        let mut visited = vec![false; self.num_qubits];
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((start, 0));
        visited[start] = true;

        while let Some((current, dist)) = queue.pop_front() {
            if current == end {
                return Some(dist);
            }

            for &neighbor in self.neighbors(current).iter() {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back((neighbor, dist + 1));
                }
            }
        }
        None
    }

    /// Computes the all-pairs shortest hop-distance table via Dijkstra
    /// (uniform unit edge weight, direction-aware when `directed`).
    ///
    /// Used by the mapper's heuristic cost function; unreachable pairs are
    /// given distance `usize::MAX`.
    pub fn distance_table(&self) -> Vec<Vec<usize>> {
        let n = self.num_qubits;
        let mut table = vec![vec![usize::MAX; n]; n];
        for src in 0..n {
            table[src][src] = 0;
            let mut heap = std::collections::BinaryHeap::new();
            heap.push(std::cmp::Reverse((0usize, src)));
            while let Some(std::cmp::Reverse((d, u))) = heap.pop() {
                if d > table[src][u] {
                    continue;
                }
                for v in self.successors(u) {
                    let nd = d + 1;
                    if nd < table[src][v] {
                        table[src][v] = nd;
                        heap.push(std::cmp::Reverse((nd, v)));
                    }
                }
            }
        }
        table
    }

    /// Computes the all-pairs shortest fidelity-cost table.
    ///
    /// Each directed edge `u -> v` with gate error rate `e` contributes
    /// `-log2(1 - e)` to the path cost; the returned table gives the
    /// minimum total cost between every pair of qubits, for use in
    /// fidelity-aware routing.
    pub fn fidelity_cost_table(&self) -> Vec<Vec<f64>> {
        let n = self.num_qubits;
        let mut table = vec![vec![f64::INFINITY; n]; n];
        let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        for c in &self.couplers {
            let cost = fidelity_edge_cost(c.gate_fidelity.error_rate());
            adj[c.qubit1].push((c.qubit2, cost));
            if !self.directed {
                adj[c.qubit2].push((c.qubit1, cost));
            }
        }

        for src in 0..n {
            table[src][src] = 0.0;
            let mut heap = std::collections::BinaryHeap::new();
            heap.push(OrderedCost(0.0, src));
            while let Some(OrderedCost(d, u)) = heap.pop() {
                if d > table[src][u] {
                    continue;
                }
                for &(v, w) in &adj[u] {
                    let nd = d + w;
                    if nd < table[src][v] {
                        table[src][v] = nd;
                        heap.push(OrderedCost(nd, v));
                    }
                }
            }
        }
        table
    }

    /// Computes the edge-skip-distance table `edgeSkipDist[k][u][v]`: the
    /// shortest path from `u` to `v` when up to `k` coupler traversals may
    /// be taken for free.
    ///
    /// This is an admissible relaxation of [`distance_table`](Self::distance_table)
    /// used by the heuristic mapper to bound the number of SWAPs still
    /// needed after some "free" two-qubit interactions (e.g. gates that can
    /// be reordered onto already-adjacent qubits). `edge_skip_distance_table(0)`
    /// coincides with `distance_table`.
    pub fn edge_skip_distance_table(&self, max_k: usize) -> Vec<Vec<Vec<usize>>> {
        let n = self.num_qubits;
        let mut table = vec![vec![vec![usize::MAX; n]; n]; max_k + 1];

        for src in 0..n {
            // 0-1 BFS over states (node, skips_used): normal edges cost 1,
            // "skip" transitions reuse the same coupler edges at cost 0 but
            // consume one unit of the skip budget.
            let mut dist = vec![vec![usize::MAX; n]; max_k + 1];
            dist[0][src] = 0;
            let mut deque = std::collections::VecDeque::new();
            deque.push_back((0usize, src));

            while let Some((budget, u)) = deque.pop_front() {
                let d = dist[budget][u];
                for v in self.successors(u) {
                    // Normal hop: cost 1, same budget.
                    if d + 1 < dist[budget][v] {
                        dist[budget][v] = d + 1;
                        deque.push_back((budget, v));
                    }
                    // Free hop: cost 0, consumes one skip.
                    if budget < max_k && d < dist[budget + 1][v] {
                        dist[budget + 1][v] = d;
                        deque.push_front((budget + 1, v));
                    }
                }
            }

            // edgeSkipDist[k] allows *up to* k skips, so take the running
            // minimum across budgets.
            for k in 0..=max_k {
                for node in 0..n {
                    let best = (0..=k).map(|b| dist[b][node]).min().unwrap_or(usize::MAX);
                    table[k][src][node] = best;
                }
            }
        }

        table
    }

    /// Picks `count` designated teleportation channels: pairs of physical
    /// sites, greedily chosen farthest-apart first with endpoints reused
    /// across channels only once every site has appeared at least once.
    ///
    /// Reproducible given the same `seed`: pairs tied on distance are
    /// shuffled by a seeded RNG rather than left in ascending-index order,
    /// so channel selection is deterministic-per-seed without hard-coding a
    /// single tie-break rule (§5).
    pub fn teleport_channels(&self, count: usize, seed: u64) -> Vec<(usize, usize)> {
        if count == 0 || self.num_qubits < 2 {
            return Vec::new();
        }
        let dist = self.distance_table();
        let n = self.num_qubits;
        let mut pairs: Vec<(usize, usize, usize)> = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                if dist[u][v] != usize::MAX {
                    pairs.push((dist[u][v], u, v));
                }
            }
        }
        pairs.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut i = 0;
        while i < pairs.len() {
            let mut j = i + 1;
            while j < pairs.len() && pairs[j].0 == pairs[i].0 {
                j += 1;
            }
            pairs[i..j].shuffle(&mut rng);
            i = j;
        }

        let mut used = HashSet::new();
        let mut channels = Vec::new();
        for &(_, u, v) in &pairs {
            if channels.len() >= count {
                break;
            }
            if used.contains(&u) && used.contains(&v) {
                continue;
            }
            used.insert(u);
            used.insert(v);
            channels.push((u, v));
        }
        // Not enough disjoint-ish pairs to hit `count`: fill in from the
        // remaining farthest pairs regardless of reuse.
        for &(_, u, v) in &pairs {
            if channels.len() >= count {
                break;
            }
            if !channels.contains(&(u, v)) {
                channels.push((u, v));
            }
        }
        channels
    }

    /// Enumerates all connected subsets of exactly `k` physical qubits.
    ///
    /// Used by the exact mapper to restrict its assignment search to
    /// subgraphs that can actually host a layer's active qubits. Exhaustive
    /// bitmask DFS; intended for small `k` (the size of one mapping layer).
    pub fn connected_subsets(&self, k: usize) -> Vec<Vec<usize>> {
        if k == 0 || k > self.num_qubits {
            return Vec::new();
        }
        let n = self.num_qubits;
        let mut results = Vec::new();
        let mut seen = HashSet::new();

        for start in 0..n {
            let mut stack = vec![(1u128 << start, start)];
            while let Some((mask, _last)) = stack.pop() {
                let size = mask.count_ones() as usize;
                if size == k {
                    if seen.insert(mask) {
                        let members: Vec<usize> =
                            (0..n).filter(|&q| mask & (1u128 << q) != 0).collect();
                        results.push(members);
                    }
                    continue;
                }
                for q in 0..n {
                    if mask & (1u128 << q) != 0 {
                        for nb in self.neighbors(q) {
                            let bit = 1u128 << nb;
                            if mask & bit == 0 {
                                stack.push((mask | bit, nb));
                            }
                        }
                    }
                }
            }
        }

        results
    }

    /// Returns all qubits connected to the given qubit.
    pub fn neighbors(&self, qubit: usize) -> Vec<usize> {
        self.couplers
            .iter()
            .filter_map(|c| {
                if c.qubit1 == qubit {
                    Some(c.qubit2)
                } else if c.qubit2 == qubit {
                    Some(c.qubit1)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Returns qubits reachable from `qubit` via a directed coupler
    /// `qubit -> neighbor`. Identical to [`neighbors`](Self::neighbors) for
    /// undirected profiles.
    pub fn successors(&self, qubit: usize) -> Vec<usize> {
        if !self.directed {
            return self.neighbors(qubit);
        }
        self.couplers
            .iter()
            .filter_map(|c| (c.qubit1 == qubit).then_some(c.qubit2))
            .collect()
    }

    /// Returns the coupler properties for a pair of qubits.
    pub fn get_coupler(&self, q1: usize, q2: usize) -> Option<&CouplerProperties> {
        self.couplers
            .iter()
            .find(|c| (c.qubit1 == q1 && c.qubit2 == q2) || (c.qubit1 == q2 && c.qubit2 == q1))
    }

    /// Single-qubit gate error rate at `qubit`.
    ///
    /// `kind` is accepted for forward compatibility with per-gate-type error
    /// models (§4.1's `singleQubitErr(q, type)`); the current model tracks a
    /// single fidelity per qubit regardless of which single-qubit gate is
    /// applied, so every `kind` reads the same value.
    pub fn single_qubit_err(&self, qubit: usize, _kind: crate::physics::GateType) -> f64 {
        self.qubit_properties
            .get(qubit)
            .map(|q| q.single_gate_fidelity.error_rate())
            .unwrap_or(gate_errors::SINGLE_QUBIT_TYPICAL)
    }

    /// Two-qubit gate error rate on the edge `(u, v)`, direction-agnostic.
    /// Falls back to the typical two-qubit error rate when no coupler joins
    /// `u` and `v`.
    pub fn two_qubit_err(&self, u: usize, v: usize) -> f64 {
        self.get_coupler(u, v)
            .map(|c| c.gate_fidelity.error_rate())
            .unwrap_or(gate_errors::TWO_QUBIT_TYPICAL)
    }

    /// Cost of a single SWAP across the edge `(u, v)`: three two-qubit gate
    /// applications worth of error, `-log2((1-e)^3)` in fidelity terms and
    /// `3` in unit-cost terms, matching [`crate::types::Gate::decompose_swap`]'s
    /// three-`CX` expansion.
    pub fn swap_cost(&self, u: usize, v: usize) -> f64 {
        3.0 * fidelity_edge_cost(self.two_qubit_err(u, v))
    }

    /// Cost of reversing a two-qubit gate's orientation on the edge `(u, v)`:
    /// two extra `H` gates on each of `u` and `v`, the wrap the mapper
    /// applies when only the reverse device edge exists. Zero on a
    /// bidirectional device, where no wrap is ever needed.
    pub fn reverse_cost(&self, u: usize, v: usize) -> f64 {
        if !self.directed {
            return 0.0;
        }
        let h = crate::physics::GateType::Hadamard;
        2.0 * fidelity_edge_cost(self.single_qubit_err(u, h))
            + 2.0 * fidelity_edge_cost(self.single_qubit_err(v, h))
    }

    /// Returns the average T1 across all qubits.
    pub fn avg_t1(&self) -> f64 {
        if self.qubit_properties.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.qubit_properties.iter().map(|q| q.t1).sum();
        sum / self.qubit_properties.len() as f64
    }

    /// Returns the average T2 across all qubits.
    pub fn avg_t2(&self) -> f64 {
        if self.qubit_properties.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.qubit_properties.iter().map(|q| q.t2).sum();
        sum / self.qubit_properties.len() as f64
    }

    /// Returns the minimum T1 (worst qubit).
    pub fn min_t1(&self) -> f64 {
        self.qubit_properties
            .iter()
            .map(|q| q.t1)
            .fold(f64::INFINITY, f64::min)
    }

    /// Returns the average two-qubit gate fidelity.
    pub fn avg_two_qubit_fidelity(&self) -> Fidelity {
        if self.couplers.is_empty() {
            return Fidelity::PERFECT;
        }
        let sum: f64 = self.couplers.iter().map(|c| c.gate_fidelity.value()).sum();
        Fidelity::clamped(sum / self.couplers.len() as f64)
    }

    /// Estimates the circuit execution time in nanoseconds.
    ///
    /// Assumes sequential execution (no parallelism).
    pub fn estimate_circuit_time_ns(&self, depth: usize, two_qubit_gate_count: usize) -> f64 {
        let single_qubit_time = gate_times::SINGLE_QUBIT * depth as f64;
        let two_qubit_time = gate_times::TWO_QUBIT * two_qubit_gate_count as f64;
        single_qubit_time + two_qubit_time
    }

    /// Validates qubit index.
    pub fn validate_qubit(&self, qubit: usize) -> crate::Result<()> {
        if qubit >= self.num_qubits {
            Err(crate::CoreError::InvalidQubit(qubit, self.num_qubits))
        } else {
            Ok(())
        }
    }

    /// Rebuilds the connectivity set from couplers.
    pub fn rebuild_connectivity(&mut self) {
        self.connectivity = self.couplers.iter().map(|c| c.edge()).collect();
    }

    /// Adds a custom coupler.
    pub fn add_coupler(&mut self, coupler: CouplerProperties) {
        let edge = coupler.edge();
        if !self.connectivity.contains(&edge) {
            self.connectivity.insert(edge);
            self.couplers.push(coupler);
        }
    }

    /// Validates that a circuit can execute on this hardware.
    ///
    /// Checks:
    /// 1. All qubit indices are valid
    /// 2. All two-qubit gates operate on connected qubits
    ///
    /// Returns a list of invalid gates (index, gate, reason).
    pub fn validate_circuit(&self, circuit: &super::CircuitGenome) -> Vec<(usize, String)> {
        let mut errors = Vec::new();

        for (idx, gate) in circuit.gates.iter().enumerate() {
            let qubits = gate.qubits();

            // Check qubit indices
            for &q in &qubits {
                if q >= self.num_qubits {
                    errors.push((
                        idx,
                        format!(
                            "{}: qubit {} exceeds hardware limit {}",
                            gate, q, self.num_qubits
                        ),
                    ));
                }
            }

            // Check connectivity for two-qubit gates
            if gate.is_two_qubit() && qubits.len() == 2 {
                let (q1, q2) = (qubits[0], qubits[1]);
                if q1 < self.num_qubits && q2 < self.num_qubits && !self.are_connected(q1, q2) {
                    errors.push((
                        idx,
                        format!("{}: qubits {} and {} are not connected", gate, q1, q2),
                    ));
                }
            }
        }

        errors
    }

    /// Returns true if the circuit can execute on this hardware.
    pub fn is_circuit_valid(&self, circuit: &super::CircuitGenome) -> bool {
        self.validate_circuit(circuit).is_empty()
    }
}

impl Default for HardwareProfile {
    fn default() -> Self {
        Self::linear("default", 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fidelity_new() {
        let f = Fidelity::new(0.99);
        assert!((f.value() - 0.99).abs() < 1e-10);
    }

    #[test]
    #[should_panic]
    fn test_fidelity_out_of_range() {
        let _ = Fidelity::new(1.5);
    }

    #[test]
    fn test_fidelity_clamped() {
        let f = Fidelity::clamped(1.5);
        assert!((f.value() - 1.0).abs() < 1e-10);

        let f2 = Fidelity::clamped(-0.5);
        assert!((f2.value() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_fidelity_from_error() {
        let f = Fidelity::from_error_rate(0.01);
        assert!((f.value() - 0.99).abs() < 1e-10);
        assert!((f.error_rate() - 0.01).abs() < 1e-10);
    }

    #[test]
    fn test_linear_topology() {
        let hw = HardwareProfile::linear("test", 5);
        assert_eq!(hw.num_qubits, 5);
        assert_eq!(hw.couplers.len(), 4); // 0-1, 1-2, 2-3, 3-4

        assert!(hw.are_connected(0, 1));
        assert!(hw.are_connected(1, 2));
        assert!(!hw.are_connected(0, 2));
        assert!(!hw.are_connected(0, 4));
    }

    #[test]
    fn test_all_to_all_topology() {
        let hw = HardwareProfile::all_to_all("test", 4);
        assert_eq!(hw.num_qubits, 4);
        assert_eq!(hw.couplers.len(), 6); // C(4,2) = 6

        assert!(hw.are_connected(0, 1));
        assert!(hw.are_connected(0, 3));
        assert!(hw.are_connected(1, 3));
    }

    #[test]
    fn test_grid_topology() {
        let hw = HardwareProfile::grid("test", 2, 3);
        assert_eq!(hw.num_qubits, 6);
        // 2x3 grid has 7 edges: 3 horizontal + 2 vertical per row
        assert_eq!(hw.couplers.len(), 7);

        // Row 0: 0-1, 1-2
        assert!(hw.are_connected(0, 1));
        assert!(hw.are_connected(1, 2));
        // Vertical: 0-3, 1-4, 2-5
        assert!(hw.are_connected(0, 3));
        assert!(hw.are_connected(1, 4));
        // Not connected diagonally
        assert!(!hw.are_connected(0, 4));
    }

    #[test]
    fn test_neighbors() {
        let hw = HardwareProfile::linear("test", 5);

        assert_eq!(hw.neighbors(0), vec![1]);
        assert_eq!(hw.neighbors(2).len(), 2); // 1 and 3
        assert_eq!(hw.neighbors(4), vec![3]);
    }

    #[test]
    fn test_qubit_properties() {
        let qp = QubitProperties::with_t1t2(100.0, 80.0);
        assert!((qp.t2_t1_ratio() - 0.8).abs() < 1e-10);
    }

    #[test]
    fn test_avg_t1() {
        let mut hw = HardwareProfile::linear("test", 3);
        hw.qubit_properties[0].t1 = 100.0;
        hw.qubit_properties[1].t1 = 200.0;
        hw.qubit_properties[2].t1 = 300.0;

        assert!((hw.avg_t1() - 200.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_circuit_valid() {
        use super::super::{CircuitGenome, Gate};

        let hw = HardwareProfile::linear("test", 5);
        let mut circuit = CircuitGenome::new(5);
        circuit.add_gate(Gate::H(0)).unwrap();
        circuit.add_gate(Gate::CX(0, 1)).unwrap(); // Connected in linear
        circuit.add_gate(Gate::CX(1, 2)).unwrap(); // Connected

        assert!(hw.is_circuit_valid(&circuit));
        assert!(hw.validate_circuit(&circuit).is_empty());
    }

    #[test]
    fn test_validate_circuit_invalid_connectivity() {
        use super::super::{CircuitGenome, Gate};

        let hw = HardwareProfile::linear("test", 5);
        let mut circuit = CircuitGenome::new(5);
        circuit.add_gate(Gate::H(0)).unwrap();
        circuit.add_gate(Gate::CX(0, 2)).unwrap(); // NOT connected in linear!

        assert!(!hw.is_circuit_valid(&circuit));
        let errors = hw.validate_circuit(&circuit);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].1.contains("not connected"));
    }

    #[test]
    fn test_validate_circuit_invalid_qubit() {
        use super::super::{CircuitGenome, Gate};

        let hw = HardwareProfile::linear("test", 3);
        let mut circuit = CircuitGenome::new(5); // Circuit has 5 qubits
        circuit.add_gate(Gate::H(4)).unwrap(); // Qubit 4 > hw limit (3)

        assert!(!hw.is_circuit_valid(&circuit));
        let errors = hw.validate_circuit(&circuit);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].1.contains("exceeds hardware limit"));
    }

    #[test]
    fn test_heavy_hex_topology() {
        // Test 3x5 heavy-hex (similar to small IBM device)
        let hw = HardwareProfile::heavy_hex("test_heavy_hex", 3, 5);

        // Should have main qubits (3*5=15) + bridge qubits (2 gaps * 3 bridges = 6)
        // Total: 21 qubits
        assert!(hw.num_qubits > 0);
        assert!(!hw.couplers.is_empty());

        // Check horizontal connectivity in first row
        assert!(hw.are_connected(0, 1));
        assert!(hw.are_connected(1, 2));

        // Check that topology is HeavyHex
        assert_eq!(hw.topology, Topology::HeavyHex);

        println!("Heavy-hex qubits: {}", hw.num_qubits);
        println!("Heavy-hex couplers: {}", hw.couplers.len());
        for c in &hw.couplers {
            println!("  {} -- {}", c.qubit1, c.qubit2);
        }
    }

    #[test]
    fn test_heavy_hex_small() {
        // Minimal 2x3 heavy-hex
        let hw = HardwareProfile::heavy_hex("mini", 2, 3);

        // 2 rows * 3 cols = 6 main qubits
        // 1 gap * 2 bridges = 2 bridge qubits
        // Total: 8 qubits
        assert_eq!(hw.num_qubits, 8);

        // Horizontal: 0-1, 1-2 (row 0), 5-6, 6-7 (row 1) = 4
        // Vertical via bridges: 0-3, 3-5, 2-4, 4-7 = 4
        // Total: 8 couplers
        assert!(hw.couplers.len() >= 4); // At least horizontal connections
    }

    #[test]
    fn test_distance_table_matches_bfs() {
        let hw = HardwareProfile::linear("test", 5);
        let table = hw.distance_table();
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(table[i][j], hw.shortest_path_distance(i, j).unwrap());
            }
        }
    }

    #[test]
    fn test_directed_connectivity() {
        let mut hw = HardwareProfile::new("test", 3, Topology::Custom);
        hw.directed = true;
        hw.add_coupler(CouplerProperties::new(0, 1));
        hw.add_coupler(CouplerProperties::new(1, 2));

        assert!(hw.are_connected(0, 1));
        assert!(!hw.are_connected(1, 0));
        assert!(hw.are_linked(1, 0));
        assert_eq!(hw.successors(0), vec![1]);
        assert!(hw.successors(1).contains(&2));
    }

    #[test]
    fn test_reverse_cost_zero_on_bidirectional_device() {
        let hw = HardwareProfile::linear("test", 3);
        assert_eq!(hw.reverse_cost(0, 1), 0.0);
    }

    #[test]
    fn test_reverse_cost_positive_on_directed_device() {
        let mut hw = HardwareProfile::new("test", 2, Topology::Custom);
        hw.directed = true;
        hw.add_coupler(CouplerProperties::new(0, 1));
        assert!(hw.reverse_cost(0, 1) > 0.0);
        assert!(hw.reverse_cost(1, 0) > 0.0);
    }

    #[test]
    fn test_swap_cost_is_three_two_qubit_errors() {
        let hw = HardwareProfile::linear("test", 2);
        let one_gate = hw.two_qubit_err(0, 1);
        assert!((hw.swap_cost(0, 1) - 3.0 * super::fidelity_edge_cost(one_gate)).abs() < 1e-12);
    }

    #[test]
    fn test_single_qubit_err_falls_back_to_typical_for_unknown_qubit() {
        let hw = HardwareProfile::linear("test", 2);
        let err = hw.single_qubit_err(99, crate::physics::GateType::Hadamard);
        assert_eq!(err, crate::physics::gate_errors::SINGLE_QUBIT_TYPICAL);
    }

    #[test]
    fn test_two_qubit_err_falls_back_to_typical_for_unconnected_pair() {
        let hw = HardwareProfile::linear("test", 4);
        let err = hw.two_qubit_err(0, 3);
        assert_eq!(err, crate::physics::gate_errors::TWO_QUBIT_TYPICAL);
    }

    #[test]
    fn test_fidelity_cost_table_prefers_high_fidelity_path() {
        let mut hw = HardwareProfile::linear("test", 3);
        // Make the 1-2 edge much noisier than 0-1, so a path through it
        // costs more even though both are single hops.
        for c in hw.couplers.iter_mut() {
            if c.edge() == (1, 2) {
                c.gate_fidelity = Fidelity::from_error_rate(0.5);
            }
        }
        let table = hw.fidelity_cost_table();
        assert!(table[0][1] < table[1][2]);
        assert_eq!(table[0][0], 0.0);
    }

    #[test]
    fn test_edge_skip_distance_table_monotonic() {
        let hw = HardwareProfile::linear("test", 6);
        let table = hw.edge_skip_distance_table(2);
        // More skip budget never increases distance.
        for u in 0..6 {
            for v in 0..6 {
                assert!(table[0][u][v] >= table[1][u][v]);
                assert!(table[1][u][v] >= table[2][u][v]);
            }
        }
        assert_eq!(table[0][0][3], 3);
        // With 2 free hops, 0->3 should cost at most 1 real hop.
        assert!(table[2][0][3] <= 1);
    }

    #[test]
    fn test_connected_subsets() {
        let hw = HardwareProfile::linear("test", 4);
        let pairs = hw.connected_subsets(2);
        // Linear chain of 4 has 3 connected pairs: (0,1) (1,2) (2,3)
        assert_eq!(pairs.len(), 3);
        for subset in &pairs {
            assert_eq!(subset.len(), 2);
            assert!(hw.are_linked(subset[0], subset[1]));
        }
    }

    #[test]
    fn test_teleport_channels_picks_farthest_pair_first() {
        let hw = HardwareProfile::linear("test", 5);
        let channels = hw.teleport_channels(1, 0);
        assert_eq!(channels, vec![(0, 4)]);
    }

    #[test]
    fn test_teleport_channels_respects_count() {
        let hw = HardwareProfile::linear("test", 6);
        let channels = hw.teleport_channels(2, 0);
        assert_eq!(channels.len(), 2);
        let dist = hw.distance_table();
        for (u, v) in &channels {
            assert!(dist[*u][*v] >= 2);
        }
    }

    #[test]
    fn test_teleport_channels_zero_count_is_empty() {
        let hw = HardwareProfile::linear("test", 4);
        assert!(hw.teleport_channels(0, 0).is_empty());
    }

    #[test]
    fn test_teleport_channels_deterministic_per_seed() {
        let hw = HardwareProfile::new("grid", 9, crate::types::Topology::Grid { rows: 3, cols: 3 });
        let a = hw.teleport_channels(3, 42);
        let b = hw.teleport_channels(3, 42);
        assert_eq!(a, b);
    }
}
