//! Exact mapper (Core A2, §4.4): a Boolean-constraint encoding of the whole
//! layered circuit on a fixed physical subgraph, minimizing total SWAP cost
//! via an iterated hard upper bound.
//!
//! Each layer becomes one encoding timestep `t`. For a candidate subgraph
//! `C` of exactly `m = num_logical` physical sites, `X[t][i][l]` says
//! "logical `l` sits at slot `i`" (`i` indexes into `C`, not a raw physical
//! index). Consecutive timesteps are tied together by a permutation
//! selector `Y[t][π]`: exactly one permutation of slots is chosen, and it
//! must carry every logical qubit's slot from `t-1` to `t`. The minimum
//! number of SWAPs realizing a permutation is `m - cycles(π)`. The total
//! objective is the sum of that quantity over all transitions, plus one
//! unit for every two-qubit gate whose chosen placement lands on a
//! reverse-only device edge (§4.4).

use crate::error::{MapperError, Result};
use crate::layering::Layer;
use qmap_core::config::{MapperConfig, SwapReduction};
use qmap_core::types::{Gate, HardwareProfile};
use rayon::prelude::*;
use z3::ast::{Ast, Bool, Int};
use z3::{Config as Z3Config, Context, SatResult, Solver};

/// A permutation of `0..m` slots, plus its minimum-swap realization cost.
#[derive(Debug, Clone)]
struct Perm {
    /// `image[i]` is the slot that receives whatever occupied slot `i`.
    image: Vec<usize>,
    cost: usize,
}

fn cycle_count(image: &[usize]) -> usize {
    let n = image.len();
    let mut seen = vec![false; n];
    let mut cycles = 0;
    for start in 0..n {
        if seen[start] {
            continue;
        }
        cycles += 1;
        let mut cur = start;
        while !seen[cur] {
            seen[cur] = true;
            cur = image[cur];
        }
    }
    cycles
}

/// All permutations of `0..m`, annotated with swap cost, filtered to those
/// realizable within `max_cost` swaps (§4.4 "permutations whose minimum-swap
/// realization exceeds the configured swap limit are pruned up front").
fn permutations_within(m: usize, max_cost: usize) -> Vec<Perm> {
    let mut indices: Vec<usize> = (0..m).collect();
    let mut out = Vec::new();
    permute(&mut indices, 0, &mut out);
    out.into_iter()
        .filter_map(|image| {
            let cost = m - cycle_count(&image);
            (cost <= max_cost).then_some(Perm { image, cost })
        })
        .collect()
}

fn permute(buf: &mut Vec<usize>, k: usize, out: &mut Vec<Vec<usize>>) {
    if k == buf.len() {
        out.push(buf.clone());
        return;
    }
    for i in k..buf.len() {
        buf.swap(k, i);
        permute(buf, k + 1, out);
        buf.swap(k, i);
    }
}

/// Outcome of a successful exact-mapper run.
#[derive(Debug, Clone)]
pub struct ExactResult {
    /// Physical subgraph used, in slot order (`slots[i]` is a device qubit).
    pub subgraph: Vec<usize>,
    /// `placements[t][l]` is the slot index holding logical `l` at layer `t`.
    pub placements: Vec<Vec<usize>>,
    /// Swaps (as slot-index pairs) applied between layer `t-1` and `t`,
    /// one entry per transition (`swaps_between[t-1]` precedes layer `t`).
    pub swaps_between: Vec<Vec<(usize, usize)>>,
    /// Total swap count across all transitions for the chosen subgraph.
    pub total_swaps: usize,
}

/// Candidate physical subgraphs to try, per §4.4's subgraph strategy.
fn candidate_subgraphs(device: &HardwareProfile, m: usize, config: &MapperConfig) -> Vec<Vec<usize>> {
    if !config.subgraph.is_empty() {
        return vec![config.subgraph.clone()];
    }
    let all = device.connected_subsets(m);
    if config.use_subsets {
        all
    } else {
        all.into_iter().take(1).collect()
    }
}

/// Runs the exact mapper over `layers` (each already partitioned by
/// [`crate::layering`]) for a circuit with `num_logical` logical qubits.
pub fn solve_exact(
    device: &HardwareProfile,
    layers: &[Layer],
    num_logical: usize,
    config: &MapperConfig,
) -> Result<ExactResult> {
    if num_logical > device.num_qubits {
        return Err(MapperError::DeviceTooSmall(num_logical, device.num_qubits));
    }
    let candidates = candidate_subgraphs(device, num_logical, config);
    if candidates.is_empty() {
        return Err(MapperError::DisconnectedSubgraph(format!(
            "no connected subgraph of {num_logical} physical sites"
        )));
    }

    // Independent z3 contexts per candidate subgraph (§5): each candidate is
    // solved on its own thread and the results are reduced by total swap
    // count, keeping only the cheapest feasible mapping.
    let outcomes: Vec<Result<ExactResult>> = candidates
        .into_par_iter()
        .map(|subgraph| solve_for_subgraph(device, layers, num_logical, &subgraph, config))
        .collect();

    let mut best: Option<ExactResult> = None;
    for outcome in outcomes {
        match outcome {
            Ok(result) => {
                if best.as_ref().map_or(true, |b| result.total_swaps < b.total_swaps) {
                    best = Some(result);
                }
            }
            Err(MapperError::Infeasible(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    best.ok_or_else(|| {
        MapperError::infeasible("no candidate subgraph admits a mapping within the swap budget")
    })
}

fn solve_for_subgraph(
    device: &HardwareProfile,
    layers: &[Layer],
    m: usize,
    subgraph: &[usize],
    config: &MapperConfig,
) -> Result<ExactResult> {
    let transitions = layers.len().saturating_sub(1);
    let max_possible = transitions * m.saturating_sub(1).max(1);

    let (start_bound, hard_cap, escalate) = match config.swap_reduction {
        SwapReduction::Custom => (config.swap_limit, config.swap_limit, false),
        SwapReduction::Increasing => (config.swap_limit, max_possible, true),
        SwapReduction::CouplingLimit => (subgraph_swap_limit(device, subgraph), max_possible, true),
        SwapReduction::None => (0, max_possible, true),
    };

    let mut bound = start_bound;
    loop {
        match try_bound(device, layers, m, subgraph, bound, config)? {
            Some(result) => return Ok(result),
            None => {
                if !escalate || bound >= hard_cap {
                    return Err(MapperError::infeasible(format!(
                        "UNSAT on subgraph {subgraph:?} up to swap bound {bound}"
                    )));
                }
                bound += 1;
            }
        }
    }
}

/// A rough per-subgraph swap cap: the subgraph's diameter times the number
/// of layer transitions, used by the `CouplingLimit` strategy to seed the
/// escalating search closer to the true optimum than starting from zero.
fn subgraph_swap_limit(device: &HardwareProfile, subgraph: &[usize]) -> usize {
    let dist = device.distance_table();
    let diameter = subgraph
        .iter()
        .flat_map(|&u| subgraph.iter().map(move |&v| dist[u][v]))
        .filter(|&d| d != usize::MAX)
        .max()
        .unwrap_or(1);
    diameter.max(1)
}

/// Attempts to satisfy all layers on `subgraph` with total swap cost `<=
/// bound`. Returns `None` on UNSAT, `Err(Timeout)` if the solver's
/// wall-clock budget (`config.timeout_ms`) expires first.
fn try_bound(
    device: &HardwareProfile,
    layers: &[Layer],
    m: usize,
    subgraph: &[usize],
    bound: usize,
    config: &MapperConfig,
) -> Result<Option<ExactResult>> {
    let timeout_ms = config.timeout_ms;
    let cfg = Z3Config::new();
    let ctx = Context::new(&cfg);
    let solver = Solver::new(&ctx);
    if timeout_ms > 0 {
        let mut params = z3::Params::new(&ctx);
        params.set_u32("timeout", timeout_ms.min(u32::MAX as u64) as u32);
        solver.set_params(&params);
    }

    let t_count = layers.len();
    // X[t][i][l]
    let x: Vec<Vec<Vec<Bool>>> = (0..t_count)
        .map(|t| {
            (0..m)
                .map(|i| {
                    (0..m)
                        .map(|l| Bool::new_const(&ctx, format!("x_{t}_{i}_{l}")))
                        .collect()
                })
                .collect()
        })
        .collect();

    for t in 0..t_count {
        for i in 0..m {
            qmap_core::cardinality::encode_exactly_one(
                &ctx,
                &solver,
                &x[t][i],
                config.encoding,
                config.commander_grouping,
                &format!("x_{t}_row_{i}"),
            );
        }
        for l in 0..m {
            let col: Vec<Bool> = (0..m).map(|i| x[t][i][l].clone()).collect();
            qmap_core::cardinality::encode_exactly_one(
                &ctx,
                &solver,
                &col,
                config.encoding,
                config.commander_grouping,
                &format!("x_{t}_col_{l}"),
            );
        }
    }

    // Permutation selectors and transition constraints. Permutations whose
    // individual cost already exceeds the total budget are pruned up front
    // (§4.4), but the budget itself binds the *sum* of per-transition costs
    // across the whole run, not any single transition in isolation — so each
    // transition's chosen cost is also captured as an `Int` and the total is
    // asserted `<= bound` below.
    let mut transition_costs: Vec<Int> = Vec::with_capacity(t_count.saturating_sub(1));
    for t in 1..t_count {
        let perms = permutations_within(m, bound);
        if perms.is_empty() {
            return Ok(None);
        }
        let ys: Vec<Bool> = (0..perms.len())
            .map(|pi| Bool::new_const(&ctx, format!("y_{t}_{pi}")))
            .collect();
        qmap_core::cardinality::encode_exactly_one(
            &ctx,
            &solver,
            &ys,
            config.encoding,
            config.commander_grouping,
            &format!("y_{t}"),
        );
        for (pi, perm) in perms.iter().enumerate() {
            for i in 0..m {
                let dest = perm.image[i];
                for l in 0..m {
                    let implied = x[t][dest][l].iff(&x[t - 1][i][l]);
                    solver.assert(&ys[pi].implies(&implied));
                }
            }
        }
        let cost_terms: Vec<Int> = ys
            .iter()
            .zip(perms.iter())
            .map(|(y, perm)| y.ite(&Int::from_i64(&ctx, perm.cost as i64), &Int::from_i64(&ctx, 0)))
            .collect();
        let cost_refs: Vec<&Int> = cost_terms.iter().collect();
        transition_costs.push(Int::add(&ctx, &cost_refs));
    }
    // Coupling constraints: every two-qubit gate in layer t must land on a
    // device edge within the subgraph. A placement realizable only via the
    // reverse edge (no forward edge between the chosen slots) owes a
    // direction-reversal cost (§4.4), one unit per gate per timestep so it
    // adds to the same swap-count budget as `transition_costs`.
    let mut reversal_costs: Vec<Int> = Vec::new();
    for (t, layer) in layers.iter().enumerate() {
        for gate in &layer.two_qubit_gates {
            let qs = gate.qubits();
            if qs.len() != 2 {
                continue;
            }
            let (l1, l2) = (qs[0], qs[1]);
            let mut disjuncts = Vec::new();
            let mut reversed_disjuncts = Vec::new();
            for (i, &pi) in subgraph.iter().enumerate() {
                for (j, &pj) in subgraph.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let forward = device.are_connected(pi, pj);
                    let reverse = device.are_connected(pj, pi);
                    if forward || reverse {
                        let assignment = Bool::and(&ctx, &[&x[t][i][l1], &x[t][j][l2]]);
                        disjuncts.push(assignment.clone());
                        if reverse && !forward {
                            reversed_disjuncts.push(assignment);
                        }
                    }
                }
            }
            if disjuncts.is_empty() {
                return Ok(None);
            }
            let refs: Vec<&Bool> = disjuncts.iter().collect();
            solver.assert(&Bool::or(&ctx, &refs));

            if !reversed_disjuncts.is_empty() {
                let refs: Vec<&Bool> = reversed_disjuncts.iter().collect();
                let is_reversed = Bool::or(&ctx, &refs);
                reversal_costs.push(is_reversed.ite(&Int::from_i64(&ctx, 1), &Int::from_i64(&ctx, 0)));
            }
        }
    }

    if !transition_costs.is_empty() || !reversal_costs.is_empty() {
        let mut all_terms: Vec<&Int> = transition_costs.iter().collect();
        all_terms.extend(reversal_costs.iter());
        let total_cost = Int::add(&ctx, &all_terms);
        solver.assert(&total_cost.le(&Int::from_i64(&ctx, bound as i64)));
    }

    match solver.check() {
        SatResult::Unsat => Ok(None),
        SatResult::Unknown => Err(MapperError::Timeout(timeout_ms)),
        SatResult::Sat => {
            let model = solver.get_model().ok_or_else(|| {
                MapperError::invariant("solver reported SAT but produced no model")
            })?;
            let mut placements = vec![vec![0usize; m]; t_count];
            for t in 0..t_count {
                for i in 0..m {
                    for l in 0..m {
                        let v = model
                            .eval(&x[t][i][l], true)
                            .and_then(|b| b.as_bool())
                            .unwrap_or(false);
                        if v {
                            placements[t][l] = i;
                        }
                    }
                }
            }
            let mut swaps_between = Vec::with_capacity(t_count.saturating_sub(1));
            let mut total_swaps = 0;
            for t in 1..t_count {
                let swaps = swaps_realizing(&placements[t - 1], &placements[t]);
                total_swaps += swaps.len();
                swaps_between.push(swaps);
            }
            Ok(Some(ExactResult {
                subgraph: subgraph.to_vec(),
                placements,
                swaps_between,
                total_swaps,
            }))
        }
    }
}

/// A concrete sequence of adjacent-slot transpositions that carries `from`
/// to `to` (both `placements[t][l] = slot`), used only to materialize a
/// model's abstract permutation into an emittable swap list.
fn swaps_realizing(from: &[usize], to: &[usize]) -> Vec<(usize, usize)> {
    let m = from.len();
    // cur[slot] = logical currently there, target[slot] = logical that
    // should end up there.
    let mut cur = vec![0usize; m];
    for (l, &slot) in from.iter().enumerate() {
        cur[slot] = l;
    }
    let mut target = vec![0usize; m];
    for (l, &slot) in to.iter().enumerate() {
        target[slot] = l;
    }
    let mut swaps = Vec::new();
    for slot in 0..m {
        while cur[slot] != target[slot] {
            let want = target[slot];
            let other = cur.iter().position(|&l| l == want).unwrap();
            cur.swap(slot, other);
            swaps.push((slot, other));
        }
    }
    swaps
}
