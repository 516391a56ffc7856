//! Objective dispatch and search policy for Clifford synthesis (§4.7, §4.8).
//!
//! [`synthesize`] is the single entry point: it escalates the encoder's
//! timestep count until the target tableau is first reachable, then, per
//! `config.target`, either reports that minimal-depth solution directly or
//! refines it for gate count under the configured search strategy (MaxSAT
//! via `z3::Optimize`, or an iterated upper bound lowered by binary search
//! via a plain `z3::Solver` — mirroring the `Int::add`-over-`ite` objective
//! pattern a neutral-atom mapper in this same problem family builds its
//! `Optimize.minimize` calls from).

use crate::encoder::{self, Encoding, TimestepKind};
use crate::error::{CliffordError, Result};
use crate::gate_set::{validate as validate_gate_set, SingleGateKind};
use crate::result::{self, CliffordResult};
use qmap_core::config::{CliffordConfig, TargetMetric};
use qmap_core::types::Tableau;
use rayon::prelude::*;
use z3::ast::{Ast, Bool, Int};
use z3::{Config as Z3Config, Context, Optimize, SatResult, Solver};

/// Upper bound on encoder timesteps to search before declaring a target
/// tableau infeasible. No circuit needs more than `O(n^2 / log n)` Clifford
/// gates (Aaronson-Gottesman); `4*n*n + 8` is a generous, cheaply-computed
/// multiple of that bound that keeps small-`n` runs fast while never
/// falsely declaring infeasibility (see DESIGN.md).
fn max_timesteps(n: usize) -> usize {
    4 * n * n + 8
}

fn z3_solver_with_timeout<'ctx>(ctx: &'ctx Context, timeout_ms: u64) -> Solver<'ctx> {
    let solver = Solver::new(ctx);
    if timeout_ms > 0 {
        let mut params = z3::Params::new(ctx);
        params.set_u32("timeout", timeout_ms.min(u32::MAX as u64) as u32);
        solver.set_params(&params);
    }
    solver
}

fn z3_optimize_with_timeout<'ctx>(ctx: &'ctx Context, timeout_ms: u64) -> Optimize<'ctx> {
    let opt = Optimize::new(ctx);
    if timeout_ms > 0 {
        let mut params = z3::Params::new(ctx);
        params.set_u32("timeout", timeout_ms.min(u32::MAX as u64) as u32);
        opt.set_params(&params);
    }
    opt
}

/// `kind_at` closure for the ordinary (non-`StDepth`) objectives: every
/// timestep may carry any gate category.
fn any_kind(_t: usize) -> TimestepKind {
    TimestepKind::Any
}

/// `kind_at` closure for `StDepth` (§4.7.1, §9 open question): timesteps
/// strictly alternate between a single-qubit-only slot and a
/// two-qubit-only slot, so the minimal feasible timestep count already *is*
/// the separately-counted single/two-qubit depth sum.
fn alternating_kind(t: usize) -> TimestepKind {
    if t % 2 == 0 {
        TimestepKind::SingleOnly
    } else {
        TimestepKind::TwoOnly
    }
}

/// Builds a fresh encoding for `n` qubits over `t_count` timesteps and
/// asserts its boundary and transition constraints (plus symmetry breaking
/// if configured). Returns the solver and encoding so a caller can either
/// check feasibility directly or layer an objective on top.
fn build_and_assert<'ctx>(
    ctx: &'ctx Context,
    n: usize,
    t_count: usize,
    target: &Tableau,
    config: &CliffordConfig,
    kind_at: impl Fn(usize) -> TimestepKind,
) -> (Solver<'ctx>, Encoding<'ctx>) {
    let solver = z3_solver_with_timeout(ctx, config.timeout_ms);
    let enc = encoder::build(ctx, n, t_count, config.encoding_style);
    encoder::assert_boundary(ctx, &solver, &enc, target);
    encoder::assert_all_transitions(
        ctx,
        &solver,
        &enc,
        config.encoding,
        config.commander_grouping,
        &kind_at,
    );
    if config.use_symmetry_breaking {
        encoder::assert_symmetry_breaking(ctx, &solver, &enc);
    }
    (solver, enc)
}

/// Escalates `t_count` from 0 up to [`max_timesteps`] and returns the
/// smallest value at which the target tableau is reachable (§4.7 "re-runs
/// with decreasing timestep limit `T` and reports the smallest feasible").
fn find_min_t(
    n: usize,
    target: &Tableau,
    config: &CliffordConfig,
    kind_at: impl Fn(usize) -> TimestepKind + Copy,
) -> Result<usize> {
    let cap = max_timesteps(n);
    for t in 0..=cap {
        let z3cfg = Z3Config::new();
        let ctx = Context::new(&z3cfg);
        let (solver, _enc) = build_and_assert(&ctx, n, t, target, config, kind_at);
        match solver.check() {
            SatResult::Sat => return Ok(t),
            SatResult::Unsat => continue,
            SatResult::Unknown => return Err(CliffordError::Timeout(config.timeout_ms)),
        }
    }
    Err(CliffordError::infeasible(format!(
        "no circuit realizes the target tableau within {cap} timesteps"
    )))
}

/// Counts how many of `pairs` fire as a `z3::ast::Int`, via the
/// `ite(var, 1, 0)` summed-`Int::add` idiom.
fn count_true<'ctx>(ctx: &'ctx Context, vars: &[Bool<'ctx>]) -> Int<'ctx> {
    let zero = Int::from_i64(ctx, 0);
    let one = Int::from_i64(ctx, 1);
    if vars.is_empty() {
        return zero;
    }
    let terms: Vec<Int> = vars.iter().map(|v| v.ite(&one, &zero)).collect();
    let refs: Vec<&Int> = terms.iter().collect();
    Int::add(ctx, &refs)
}

/// All gate-choice variables at `t_count` timesteps that the `Gates`
/// objective should count: every single-qubit and CX variable, excluding
/// the bookkeeping noop/none variables.
fn all_gate_vars<'ctx>(enc: &Encoding<'ctx>) -> Vec<Bool<'ctx>> {
    let mut vars: Vec<Bool> = enc.gates.single.values().cloned().collect();
    vars.extend(enc.gates.cx.values().cloned());
    vars
}

fn two_qubit_vars<'ctx>(enc: &Encoding<'ctx>) -> Vec<Bool<'ctx>> {
    enc.gates.cx.values().cloned().collect()
}

/// Minimizes the Int-valued count of `objective_vars` subject to the
/// encoding's constraints, via MaxSAT (`z3::Optimize`) or an iterated
/// upper-bound binary search over a plain `z3::Solver`, per
/// `config.use_max_sat`. Returns the winning model.
fn optimize_count<'a>(
    ctx: &'a Context,
    n: usize,
    t_count: usize,
    target: &Tableau,
    config: &CliffordConfig,
    kind_at: impl Fn(usize) -> TimestepKind + Copy,
    select_vars: impl Fn(&Encoding<'a>) -> Vec<Bool<'a>>,
) -> Result<(Encoding<'a>, z3::Model<'a>)> {
    if config.use_max_sat {
        let opt = z3_optimize_with_timeout(ctx, config.timeout_ms);
        let enc = encoder::build(ctx, n, t_count, config.encoding_style);
        encoder::assert_boundary(ctx, &opt, &enc, target);
        encoder::assert_all_transitions(
            ctx,
            &opt,
            &enc,
            config.encoding,
            config.commander_grouping,
            &kind_at,
        );
        if config.use_symmetry_breaking {
            encoder::assert_symmetry_breaking(ctx, &opt, &enc);
        }
        let objective_vars = select_vars(&enc);
        let cost = count_true(ctx, &objective_vars);
        opt.minimize(&cost);
        match opt.check(&[]) {
            SatResult::Sat => {
                let model = opt.get_model().ok_or_else(|| {
                    CliffordError::invariant("optimizer reported SAT but produced no model")
                })?;
                Ok((enc, model))
            }
            SatResult::Unsat => Err(CliffordError::infeasible(
                "objective encoding unsat at a timestep count that was already proven feasible",
            )),
            SatResult::Unknown => Err(CliffordError::Timeout(config.timeout_ms)),
        }
    } else {
        let (solver, enc) = build_and_assert(ctx, n, t_count, target, config, kind_at);
        let objective_vars = select_vars(&enc);
        if objective_vars.is_empty() {
            return match solver.check() {
                SatResult::Sat => {
                    let model = solver.get_model().ok_or_else(|| {
                        CliffordError::invariant("solver reported SAT but produced no model")
                    })?;
                    Ok((enc, model))
                }
                SatResult::Unsat => Err(CliffordError::infeasible("unsat with no objective vars")),
                SatResult::Unknown => Err(CliffordError::Timeout(config.timeout_ms)),
            };
        }
        let cost = count_true(ctx, &objective_vars);

        // Baseline: the encoding is already known SAT at this t_count, so a
        // plain check gives an upper bound to binary-search down from.
        if solver.check() != SatResult::Sat {
            return Err(CliffordError::invariant(
                "objective encoding unsat at a timestep count already proven feasible",
            ));
        }
        let baseline = solver
            .get_model()
            .ok_or_else(|| CliffordError::invariant("solver reported SAT but produced no model"))?;
        let mut best_model = baseline;
        let mut lo = 0i64;
        let mut hi = objective_vars.len() as i64;

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            solver.push();
            solver.assert(&cost.le(&Int::from_i64(ctx, mid)));
            match solver.check() {
                SatResult::Sat => {
                    best_model = solver.get_model().ok_or_else(|| {
                        CliffordError::invariant("solver reported SAT but produced no model")
                    })?;
                    hi = mid;
                    solver.pop(1);
                }
                SatResult::Unsat => {
                    solver.pop(1);
                    lo = mid + 1;
                }
                SatResult::Unknown => {
                    solver.pop(1);
                    return Err(CliffordError::Timeout(config.timeout_ms));
                }
            }
        }
        Ok((enc, best_model))
    }
}

/// Synthesizes a Clifford circuit over `gate_set` realizing `target`, per
/// `config`'s objective and search strategy (§4.6, §4.7, §4.8).
pub fn synthesize(
    target: &Tableau,
    gate_set: &[SingleGateKind],
    config: &CliffordConfig,
) -> Result<CliffordResult> {
    validate_gate_set(gate_set)?;
    if !target.is_valid() {
        return Err(CliffordError::TableauSizeMismatch(format!(
            "target tableau for {} qubits has malformed shape",
            target.num_qubits
        )));
    }
    let n = target.num_qubits;

    match config.target {
        TargetMetric::Depth => {
            let t_min = find_min_t(n, target, config, any_kind)?;
            let z3cfg = Z3Config::new();
            let ctx = Context::new(&z3cfg);
            if config.refine_gates_after_depth {
                let (enc, model) =
                    optimize_count(&ctx, n, t_min, target, config, any_kind, all_gate_vars)?;
                result::extract(&model, &enc)
            } else {
                let (solver, enc) = build_and_assert(&ctx, n, t_min, target, config, any_kind);
                if solver.check() != SatResult::Sat {
                    return Err(CliffordError::invariant(
                        "timestep count proven feasible by find_min_t became unsat on rebuild",
                    ));
                }
                let model = solver.get_model().ok_or_else(|| {
                    CliffordError::invariant("solver reported SAT but produced no model")
                })?;
                result::extract(&model, &enc)
            }
        }
        TargetMetric::StDepth => {
            let t_min = find_min_t(n, target, config, alternating_kind)?;
            let z3cfg = Z3Config::new();
            let ctx = Context::new(&z3cfg);
            let (solver, enc) = build_and_assert(&ctx, n, t_min, target, config, alternating_kind);
            if solver.check() != SatResult::Sat {
                return Err(CliffordError::invariant(
                    "timestep count proven feasible by find_min_t became unsat on rebuild",
                ));
            }
            let model = solver
                .get_model()
                .ok_or_else(|| CliffordError::invariant("solver reported SAT but produced no model"))?;
            result::extract(&model, &enc)
        }
        TargetMetric::Gates => {
            let t_min = find_min_t(n, target, config, any_kind)?;
            let z3cfg = Z3Config::new();
            let ctx = Context::new(&z3cfg);
            let (enc, model) =
                optimize_count(&ctx, n, t_min, target, config, any_kind, all_gate_vars)?;
            result::extract(&model, &enc)
        }
        TargetMetric::TwoQubitGates => {
            let t_min = find_min_t(n, target, config, any_kind)?;
            let z3cfg = Z3Config::new();
            let ctx = Context::new(&z3cfg);
            let (enc, model) =
                optimize_count(&ctx, n, t_min, target, config, any_kind, two_qubit_vars)?;
            let mut best = result::extract(&model, &enc)?;

            if config.widen_budget_after_two_qubit {
                let wider_ctx = Context::new(&Z3Config::new());
                if let Ok((wider_enc, wider_model)) = optimize_count(
                    &wider_ctx,
                    n,
                    t_min + 1,
                    target,
                    config,
                    any_kind,
                    two_qubit_vars,
                ) {
                    let candidate = result::extract(&wider_model, &wider_enc)?;
                    if candidate.two_qubit_gates < best.two_qubit_gates
                        || (candidate.two_qubit_gates == best.two_qubit_gates
                            && candidate.gates < best.gates)
                    {
                        best = candidate;
                    }
                }
            }
            Ok(best)
        }
    }
}

/// Parallel-attempt synthesis (§5): runs up to `config.n_threads_heuristic`
/// independent attempts — each a complete, self-contained [`synthesize`]
/// call sharing no mutable state — and reduces to the cheapest by
/// `(gates, depth)`. Symmetry breaking is toggled on alternating workers so
/// that a worker stuck behind a hard symmetry-breaking clause doesn't stall
/// the whole race; every worker solves the same problem to completion
/// independently; none communicate mid-search.
pub fn synthesize_parallel(
    target: &Tableau,
    gate_set: &[SingleGateKind],
    config: &CliffordConfig,
) -> Result<CliffordResult> {
    let workers = config.n_threads_heuristic.max(1);
    if workers == 1 {
        return synthesize(target, gate_set, config);
    }

    let attempts: Vec<Result<CliffordResult>> = (0..workers)
        .into_par_iter()
        .map(|i| {
            let mut worker_config = config.clone();
            if i % 2 == 1 {
                worker_config.use_symmetry_breaking = !worker_config.use_symmetry_breaking;
            }
            synthesize(target, gate_set, &worker_config)
        })
        .collect();

    let mut best: Option<CliffordResult> = None;
    let mut last_err: Option<CliffordError> = None;
    for attempt in attempts {
        match attempt {
            Ok(r) => {
                let better = best.as_ref().map_or(true, |b| {
                    (r.gates, r.depth) < (b.gates, b.depth)
                });
                if better {
                    best = Some(r);
                }
            }
            Err(e) => last_err = Some(e),
        }
    }
    best.ok_or_else(|| last_err.unwrap_or_else(|| CliffordError::infeasible("no worker succeeded")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmap_core::config::{EncodingStyle, TargetMetric};

    fn gate_set() -> Vec<SingleGateKind> {
        crate::gate_set::ENCODER_GENERATORS.to_vec()
    }

    #[test]
    fn test_synthesize_h_gates_objective() {
        let mut target = Tableau::identity(1);
        target.h(0).unwrap();
        let config = CliffordConfig {
            target: TargetMetric::Gates,
            ..CliffordConfig::default()
        };
        let result = synthesize(&target, &gate_set(), &config).unwrap();
        assert_eq!(result.gates, 1);
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn test_synthesize_cnot_multigate_two_qubit_objective() {
        let mut target = Tableau::identity(2);
        target.cx(0, 1).unwrap();
        let config = CliffordConfig {
            target: TargetMetric::TwoQubitGates,
            encoding_style: EncodingStyle::MultiGate,
            ..CliffordConfig::default()
        };
        let result = synthesize(&target, &gate_set(), &config).unwrap();
        assert_eq!(result.two_qubit_gates, 1);
        assert_eq!(result.gates, 1);
    }

    #[test]
    fn test_synthesize_depth_objective_identity_is_zero_depth() {
        let target = Tableau::identity(2);
        let config = CliffordConfig {
            target: TargetMetric::Depth,
            ..CliffordConfig::default()
        };
        let result = synthesize(&target, &gate_set(), &config).unwrap();
        assert_eq!(result.depth, 0);
        assert_eq!(result.gates, 0);
    }

    #[test]
    fn test_synthesize_max_sat_matches_binary_search() {
        let mut target = Tableau::identity(2);
        target.h(0).unwrap();
        target.cx(0, 1).unwrap();

        let mut bs_config = CliffordConfig {
            target: TargetMetric::Gates,
            use_max_sat: false,
            ..CliffordConfig::default()
        };
        bs_config.use_symmetry_breaking = false;
        let bs_result = synthesize(&target, &gate_set(), &bs_config).unwrap();

        let mut ms_config = bs_config.clone();
        ms_config.use_max_sat = true;
        let ms_result = synthesize(&target, &gate_set(), &ms_config).unwrap();

        assert_eq!(bs_result.gates, ms_result.gates);
    }

    #[test]
    fn test_synthesize_stdepth_alternates_categories() {
        let mut target = Tableau::identity(2);
        target.h(0).unwrap();
        target.cx(0, 1).unwrap();
        let config = CliffordConfig {
            target: TargetMetric::StDepth,
            ..CliffordConfig::default()
        };
        let result = synthesize(&target, &gate_set(), &config).unwrap();
        assert!(result.depth >= 2);
    }

    #[test]
    fn test_synthesize_parallel_matches_single_threaded() {
        let mut target = Tableau::identity(1);
        target.h(0).unwrap();
        let mut config = CliffordConfig {
            target: TargetMetric::Gates,
            ..CliffordConfig::default()
        };
        config.n_threads_heuristic = 4;
        let result = synthesize_parallel(&target, &gate_set(), &config).unwrap();
        assert_eq!(result.gates, 1);
    }

    #[test]
    fn test_synthesize_rejects_incomplete_gate_set() {
        let target = Tableau::identity(1);
        let config = CliffordConfig::default();
        let incomplete = [SingleGateKind::X];
        assert!(synthesize(&target, &incomplete, &config).is_err());
    }
}
