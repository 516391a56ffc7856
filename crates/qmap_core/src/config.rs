//! Configuration surface for the mapper (Core A) and the Clifford
//! synthesizer (Core B).
//!
//! Both `MapperConfig` and `CliffordConfig` are plain `serde`-derived
//! structs with a `Default` impl and a JSON round-trip, following the same
//! shape as the rest of the workspace's config types: `from_json`/`to_json`
//! wrapping `serde_json`, never a bespoke parser.

use serde::{Deserialize, Serialize};

// ============================================================================
// Shared enums
// ============================================================================

/// Which mapper core handles routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MapperMethod {
    /// A*-style search inserting SWAPs per layer (Core A1).
    Heuristic,
    /// Boolean-constraint encoding of the same problem (Core A2).
    Exact,
}

/// A* heuristic function variants for the heuristic mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Heuristic {
    /// Sum of edge-skip distances over unsatisfied pairs.
    Basic,
    /// Like `Basic`, but subtracts the cost a shared swap already
    /// collapsed for other pairs so it isn't double-counted.
    BasicMinusSharedSwaps,
    /// Maximum (rather than sum) of edge-skip distances across pairs.
    MaxDistance,
    /// `Basic` evaluated against fidelity-cost tables instead of hop counts.
    Fidelity,
}

/// Initial layout seeding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitialLayout {
    /// `locations[l] = l`.
    Identity,
    /// Greedily place the first few layers' operands on adjacent sites.
    Static,
    /// Leave logical qubits unplaced; A* chooses a site on first use.
    Dynamic,
}

/// Layer partitioning rule (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Layering {
    /// One layer per gate.
    IndividualGates,
    /// Append while the new gate's qubits are disjoint from the layer.
    DisjointQubits,
    /// Variant tuned for circuits with long runs of odd/even-indexed pairs.
    OddGates,
    /// Variant tuned for triangular qubit-interaction patterns.
    QubitTriangle,
    /// Disjoint-qubit layering restricted to two-qubit blocks.
    Disjoint2qBlocks,
}

/// Early-termination policy for the A* frontier (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EarlyTermination {
    /// No early termination; search the full frontier up to the node cap.
    None,
    /// Stop after expanding `limit` nodes total.
    NodeLimit,
    /// Stop after `limit` additional nodes are expanded past the first
    /// solution found.
    NodesAfterFirstSolution,
    /// Stop after `limit` additional nodes are expanded past the node at
    /// which the current optimum was last improved.
    NodesAfterCurrentOptimum,
    /// Stop once `limit` solutions (valid mappings popped) have been seen.
    SolutionCount,
    /// Stop once `limit` solutions have been seen after the optimum.
    SolutionCountAfterOptimum,
}

/// Exact-mapper search strategy over swap-count upper bounds (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapReduction {
    /// Do not restrict the candidate subgraph swap budget.
    None,
    /// Prune subgraphs whose minimum required swaps exceed a coupling
    /// limit computed from the subgraph itself.
    CouplingLimit,
    /// Use a user-supplied swap limit (see `MapperConfig::swap_limit`).
    Custom,
    /// Start from an initial limit and increase it until satisfiable.
    Increasing,
}

/// Cardinality-constraint encoding strategy, shared by the exact mapper's
/// assignment-matrix constraints and the Clifford encoder's exactly-one
/// constraints (§4.4, §4.6; resolves the "two near-duplicate Encodings
/// modules" open question onto a single canonical module, see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardinalityEncoding {
    /// Pairwise at-most-one over all literal pairs; O(n^2) clauses.
    Naive,
    /// Commander encoding with configurable group size.
    Commander,
    /// Bimander encoding (commander groups plus a binary selector).
    Bimander,
}

/// Commander-encoding group-size policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommanderGrouping {
    /// Fixed groups of 2.
    Fixed2,
    /// Fixed groups of 3.
    Fixed3,
    /// Recursively split into halves (`floor(n/2)`, remainder absorbed into
    /// the second half — see DESIGN.md for the open-question resolution).
    Halves,
    /// Groups of size `ceil(log2(n))`.
    Logarithm,
}

/// Clifford synthesis objective (§4.7). `StDepth` resolves the open
/// question in SPEC_FULL.md §4.7.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetMetric {
    /// Total gate count (single- plus two-qubit).
    Gates,
    /// Two-qubit gate count only.
    TwoQubitGates,
    /// Circuit depth (number of timesteps with any gate).
    Depth,
    /// Depth counted separately for single- and two-qubit layers.
    StDepth,
}

/// Which Clifford encoding style to build (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EncodingStyle {
    /// At most one gate touches the whole register per timestep.
    SingleGate,
    /// Each qubit touched by at most one gate per timestep; multiple
    /// qubits may be touched in parallel.
    MultiGate,
}

// ============================================================================
// Lookahead
// ============================================================================

/// Lookahead configuration for the heuristic mapper: contribution from the
/// next `depth` layers is scaled by `first_factor * factor^i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookaheadConfig {
    /// Enable lookahead.
    pub enabled: bool,
    /// Number of future layers to consider.
    pub depth: usize,
    /// Scale applied to the nearest future layer.
    pub first_factor: f64,
    /// Per-layer decay factor applied beyond the first.
    pub factor: f64,
}

impl Default for LookaheadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            depth: 0,
            first_factor: 0.5,
            factor: 0.5,
        }
    }
}

// ============================================================================
// Teleportation
// ============================================================================

/// Optional teleportation-channel configuration (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeleportationConfig {
    /// Enable teleportation moves during A* expansion.
    pub enabled: bool,
    /// Number of ancillary qubits dedicated as teleportation channels.
    pub num_channels: usize,
}

impl Default for TeleportationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            num_channels: 0,
        }
    }
}

// ============================================================================
// MapperConfig
// ============================================================================

/// Top-level configuration for a single mapping run (Core A).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Which mapper core to run.
    pub method: MapperMethod,
    /// A* heuristic variant (heuristic method only).
    pub heuristic: Heuristic,
    /// Initial layout seed.
    pub initial_layout: InitialLayout,
    /// Layer partition rule.
    pub layering: Layering,
    /// Lookahead settings.
    pub lookahead: LookaheadConfig,
    /// Early-termination policy.
    pub early_termination: EarlyTermination,
    /// Node-count limit paired with `early_termination`.
    pub early_termination_limit: usize,
    /// Node-count limit at which a dynamically-split layer gets split
    /// (§4.2 "dynamic auto-splitting").
    pub auto_split_node_limit: usize,
    /// Exact-mapper swap-budget strategy.
    pub swap_reduction: SwapReduction,
    /// Custom swap limit (used when `swap_reduction == Custom`, and as the
    /// starting point when `Increasing`).
    pub swap_limit: usize,
    /// Cardinality encoding for the exact mapper's assignment constraints.
    pub encoding: CardinalityEncoding,
    /// Commander group-size policy.
    pub commander_grouping: CommanderGrouping,
    /// Restrict the exact mapper to this physical-qubit subset; empty means
    /// "unset".
    pub subgraph: Vec<usize>,
    /// Enumerate all connected size-m subgraphs and pick the cheapest
    /// (exact mapper only; ignored if `subgraph` is non-empty).
    pub use_subsets: bool,
    /// Teleportation-channel settings.
    pub teleportation: TeleportationConfig,
    /// Wall-clock cap, milliseconds. `0` means "no timeout".
    pub timeout_ms: u64,
    /// RNG seed for tie-breaking in Static/Dynamic layout and teleportation
    /// channel selection.
    pub seed: u64,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            method: MapperMethod::Heuristic,
            heuristic: Heuristic::Basic,
            initial_layout: InitialLayout::Identity,
            layering: Layering::DisjointQubits,
            lookahead: LookaheadConfig::default(),
            early_termination: EarlyTermination::None,
            early_termination_limit: 0,
            auto_split_node_limit: 10_000,
            swap_reduction: SwapReduction::None,
            swap_limit: 0,
            encoding: CardinalityEncoding::Naive,
            commander_grouping: CommanderGrouping::Fixed3,
            subgraph: Vec::new(),
            use_subsets: true,
            teleportation: TeleportationConfig::default(),
            timeout_ms: 60_000,
            seed: 0,
        }
    }
}

impl MapperConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Serializes configuration to a JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

// ============================================================================
// CliffordConfig
// ============================================================================

/// Top-level configuration for a single Clifford-synthesis run (Core B).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliffordConfig {
    /// Optimization objective.
    pub target: TargetMetric,
    /// Encoding style.
    pub encoding_style: EncodingStyle,
    /// Cardinality encoding for exactly-one constraints.
    pub encoding: CardinalityEncoding,
    /// Commander group-size policy.
    pub commander_grouping: CommanderGrouping,
    /// Use MaxSAT (weighted soft clauses) rather than iterated binary
    /// search over a hard upper bound.
    pub use_max_sat: bool,
    /// Apply symmetry-breaking clauses (§4.6).
    pub use_symmetry_breaking: bool,
    /// After optimizing depth, re-run at the same T minimizing gate count.
    pub refine_gates_after_depth: bool,
    /// After optimizing two-qubit gates, retry with a larger gate budget.
    pub widen_budget_after_two_qubit: bool,
    /// Number of worker tasks for heuristic-mode sub-circuit synthesis
    /// parallelism (§5).
    pub n_threads_heuristic: usize,
    /// Wall-clock cap, milliseconds. `0` means "no timeout".
    pub timeout_ms: u64,
    /// RNG seed.
    pub seed: u64,
}

impl Default for CliffordConfig {
    fn default() -> Self {
        Self {
            target: TargetMetric::Gates,
            encoding_style: EncodingStyle::SingleGate,
            encoding: CardinalityEncoding::Naive,
            commander_grouping: CommanderGrouping::Fixed3,
            use_max_sat: false,
            use_symmetry_breaking: true,
            refine_gates_after_depth: false,
            widen_budget_after_two_qubit: false,
            n_threads_heuristic: 1,
            timeout_ms: 60_000,
            seed: 0,
        }
    }
}

impl CliffordConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Serializes configuration to a JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapper_config() {
        let config = MapperConfig::default();
        assert_eq!(config.method, MapperMethod::Heuristic);
        assert_eq!(config.initial_layout, InitialLayout::Identity);
    }

    #[test]
    fn test_mapper_config_json_roundtrip() {
        let config = MapperConfig::default();
        let json = config.to_json().unwrap();
        let parsed = MapperConfig::from_json(&json).unwrap();
        assert_eq!(config.method, parsed.method);
        assert_eq!(config.heuristic, parsed.heuristic);
    }

    #[test]
    fn test_default_clifford_config() {
        let config = CliffordConfig::default();
        assert_eq!(config.target, TargetMetric::Gates);
        assert!(config.use_symmetry_breaking);
    }

    #[test]
    fn test_clifford_config_json_roundtrip() {
        let config = CliffordConfig::default();
        let json = config.to_json().unwrap();
        let parsed = CliffordConfig::from_json(&json).unwrap();
        assert_eq!(config.target, parsed.target);
        assert_eq!(config.use_max_sat, parsed.use_max_sat);
    }

    #[test]
    fn test_partial_json_overrides_fill_defaults() {
        // serde(default) lets a config file override just one key.
        let json = r#"{"target": "twoQubitGates"}"#;
        let config = CliffordConfig::from_json(json).unwrap();
        assert_eq!(config.target, TargetMetric::TwoQubitGates);
        assert_eq!(config.encoding_style, EncodingStyle::SingleGate);
    }
}
