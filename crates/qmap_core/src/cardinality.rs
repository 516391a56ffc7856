//! Cardinality-constraint encodings shared by the exact mapper's
//! assignment-matrix constraints and the Clifford encoder's exactly-one
//! constraints.
//!
//! Three encodings are supported, selected via
//! [`crate::config::CardinalityEncoding`]:
//!
//! - `Naive`: pairwise at-most-one, O(n^2) clauses, fine for small n.
//! - `Commander`: recursively groups literals under a "commander" variable
//!   that summarizes the group, cutting clause count to roughly O(n).
//! - `Bimander`: commander-style groups plus a binary group selector,
//!   trading a few extra variables for fewer clauses at large n.
//!
//! Group sizes for `Commander`/`Bimander` are controlled by
//! [`crate::config::CommanderGrouping`].

use crate::config::{CardinalityEncoding, CommanderGrouping};
use z3::ast::{Ast, Bool};
use z3::Context;

/// A minimal assertion sink abstracting over `z3::Solver` and
/// `z3::Optimize`, so these cardinality encodings serve both plain
/// feasibility solving (the exact mapper) and MaxSAT-style optimization
/// (the Clifford encoder's gate-count objective).
pub trait Asserter<'ctx> {
    fn assert_bool(&self, b: &Bool<'ctx>);
}

impl<'ctx> Asserter<'ctx> for z3::Solver<'ctx> {
    fn assert_bool(&self, b: &Bool<'ctx>) {
        self.assert(b);
    }
}

impl<'ctx> Asserter<'ctx> for z3::Optimize<'ctx> {
    fn assert_bool(&self, b: &Bool<'ctx>) {
        self.assert(b);
    }
}

/// Partitions `n` indices into groups according to `grouping`.
///
/// `Halves` always yields exactly two groups (`floor(n/2)` then the
/// remainder); callers that want geometric shrinkage across many literals
/// get it "for free" because [`at_most_one`] recurses into each group.
fn partition(n: usize, grouping: CommanderGrouping) -> Vec<std::ops::Range<usize>> {
    if n == 0 {
        return Vec::new();
    }
    let chunk = match grouping {
        CommanderGrouping::Fixed2 => 2,
        CommanderGrouping::Fixed3 => 3,
        CommanderGrouping::Logarithm => {
            let bits = (usize::BITS - n.leading_zeros()) as usize;
            bits.max(2)
        }
        CommanderGrouping::Halves => {
            let first = n / 2;
            if first == 0 {
                return vec![0..n];
            }
            return vec![0..first, first..n];
        }
    };
    let mut groups = Vec::new();
    let mut start = 0;
    while start < n {
        let end = (start + chunk).min(n);
        groups.push(start..end);
        start = end;
    }
    groups
}

/// Asserts that at most one of `lits` is true, using the naive pairwise
/// encoding.
fn assert_naive_amo<'ctx>(ctx: &'ctx Context, solver: &impl Asserter<'ctx>, lits: &[Bool<'ctx>]) {
    for i in 0..lits.len() {
        for j in (i + 1)..lits.len() {
            let not_both = Bool::or(ctx, &[&lits[i].not(), &lits[j].not()]);
            solver.assert(&not_both);
        }
    }
}

/// Asserts that at least one of `lits` is true.
pub fn assert_at_least_one<'ctx>(ctx: &'ctx Context, solver: &impl Asserter<'ctx>, lits: &[Bool<'ctx>]) {
    if lits.is_empty() {
        // An empty disjunction is unsatisfiable; this only happens if a
        // caller passes zero candidates, which is itself a modeling bug.
        solver.assert(&Bool::from_bool(ctx, false));
        return;
    }
    let refs: Vec<&Bool> = lits.iter().collect();
    solver.assert(&Bool::or(ctx, &refs));
}

/// Encodes at-most-one over `lits` with the configured encoding and group
/// size policy, returning the fresh commander/selector variables it
/// introduced (for callers that want to inspect or reuse them; most callers
/// can ignore the return value).
pub fn encode_at_most_one<'ctx>(
    ctx: &'ctx Context,
    solver: &impl Asserter<'ctx>,
    lits: &[Bool<'ctx>],
    encoding: CardinalityEncoding,
    grouping: CommanderGrouping,
    name_hint: &str,
) {
    match encoding {
        CardinalityEncoding::Naive => assert_naive_amo(ctx, solver, lits),
        CardinalityEncoding::Commander => {
            commander_amo(ctx, solver, lits, grouping, name_hint, 0);
        }
        CardinalityEncoding::Bimander => bimander_amo(ctx, solver, lits, grouping, name_hint),
    }
}

/// Encodes exactly-one over `lits`: at-most-one (per `encoding`) plus
/// at-least-one.
pub fn encode_exactly_one<'ctx>(
    ctx: &'ctx Context,
    solver: &impl Asserter<'ctx>,
    lits: &[Bool<'ctx>],
    encoding: CardinalityEncoding,
    grouping: CommanderGrouping,
    name_hint: &str,
) {
    encode_at_most_one(ctx, solver, lits, encoding, grouping, name_hint);
    assert_at_least_one(ctx, solver, lits);
}

/// Recursive commander at-most-one: groups `lits`, recurses inside each
/// group, introduces one commander boolean per group that is equivalent to
/// "some literal in this group is true" under the group's at-most-one
/// constraint, then recurses over the commander variables themselves.
fn commander_amo<'ctx>(
    ctx: &'ctx Context,
    solver: &impl Asserter<'ctx>,
    lits: &[Bool<'ctx>],
    grouping: CommanderGrouping,
    name_hint: &str,
    level: usize,
) {
    if lits.len() <= 1 {
        return;
    }
    if lits.len() <= 3 {
        assert_naive_amo(ctx, solver, lits);
        return;
    }

    let groups = partition(lits.len(), grouping);
    let mut commanders = Vec::with_capacity(groups.len());

    for (gi, range) in groups.iter().enumerate() {
        let group = &lits[range.clone()];
        if group.len() == 1 {
            commanders.push(group[0].clone());
            continue;
        }

        // At most one literal is true within the group itself.
        commander_amo(ctx, solver, group, grouping, name_hint, level + 1);

        let commander = Bool::new_const(ctx, format!("{name_hint}_cmd_L{level}_G{gi}"));
        // commander -> at least one literal in the group.
        let group_refs: Vec<&Bool> = group.iter().collect();
        let group_or = Bool::or(ctx, &group_refs);
        solver.assert(&commander.implies(&group_or));
        // each literal in the group -> commander.
        for lit in group {
            solver.assert(&lit.implies(&commander));
        }
        commanders.push(commander);
    }

    // At most one group can have its commander set.
    commander_amo(ctx, solver, &commanders, grouping, name_hint, level + 1);
}

/// Bimander at-most-one: commander-style groups (at-most-one enforced
/// naively within each small group) plus a binary group-selector so that at
/// most one group may contain a true literal.
fn bimander_amo<'ctx>(
    ctx: &'ctx Context,
    solver: &impl Asserter<'ctx>,
    lits: &[Bool<'ctx>],
    grouping: CommanderGrouping,
    name_hint: &str,
) {
    if lits.len() <= 1 {
        return;
    }
    let groups = partition(lits.len(), grouping);
    let num_groups = groups.len();
    if num_groups <= 1 {
        assert_naive_amo(ctx, solver, lits);
        return;
    }
    let num_bits = (usize::BITS - (num_groups - 1).leading_zeros()) as usize;
    let bits: Vec<Bool> = (0..num_bits)
        .map(|b| Bool::new_const(ctx, format!("{name_hint}_bimander_b{b}")))
        .collect();

    for (gi, range) in groups.iter().enumerate() {
        let group = &lits[range.clone()];
        assert_naive_amo(ctx, solver, group);
        for lit in group {
            for (b, bit) in bits.iter().enumerate() {
                let bit_set = (gi >> b) & 1 == 1;
                let target = if bit_set { bit.clone() } else { bit.not() };
                solver.assert(&lit.implies(&target));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use z3::{Config, SatResult};

    fn fresh_ctx() -> Context {
        Context::new(&Config::new())
    }

    fn bools<'ctx>(ctx: &'ctx Context, n: usize, prefix: &str) -> Vec<Bool<'ctx>> {
        (0..n)
            .map(|i| Bool::new_const(ctx, format!("{prefix}{i}")))
            .collect()
    }

    #[test]
    fn test_naive_exactly_one_has_unique_models() {
        let ctx = fresh_ctx();
        let solver = z3::Solver::new(&ctx);
        let lits = bools(&ctx, 4, "x");
        encode_exactly_one(
            &ctx,
            &solver,
            &lits,
            CardinalityEncoding::Naive,
            CommanderGrouping::Fixed3,
            "test",
        );
        assert_eq!(solver.check(), SatResult::Sat);
        let model = solver.get_model().unwrap();
        let true_count = lits
            .iter()
            .filter(|l| model.eval(*l, true).unwrap().as_bool().unwrap())
            .count();
        assert_eq!(true_count, 1);
    }

    #[test]
    fn test_commander_exactly_one_large() {
        let ctx = fresh_ctx();
        let solver = z3::Solver::new(&ctx);
        let lits = bools(&ctx, 12, "y");
        encode_exactly_one(
            &ctx,
            &solver,
            &lits,
            CardinalityEncoding::Commander,
            CommanderGrouping::Fixed3,
            "test",
        );
        assert_eq!(solver.check(), SatResult::Sat);
        let model = solver.get_model().unwrap();
        let true_count = lits
            .iter()
            .filter(|l| model.eval(*l, true).unwrap().as_bool().unwrap())
            .count();
        assert_eq!(true_count, 1);
    }

    #[test]
    fn test_commander_at_most_one_rejects_two_true() {
        let ctx = fresh_ctx();
        let solver = z3::Solver::new(&ctx);
        let lits = bools(&ctx, 8, "z");
        encode_at_most_one(
            &ctx,
            &solver,
            &lits,
            CardinalityEncoding::Commander,
            CommanderGrouping::Halves,
            "test",
        );
        solver.assert(&lits[0]);
        solver.assert(&lits[1]);
        assert_eq!(solver.check(), SatResult::Unsat);
    }

    #[test]
    fn test_bimander_exactly_one() {
        let ctx = fresh_ctx();
        let solver = z3::Solver::new(&ctx);
        let lits = bools(&ctx, 10, "w");
        encode_exactly_one(
            &ctx,
            &solver,
            &lits,
            CardinalityEncoding::Bimander,
            CommanderGrouping::Fixed2,
            "test",
        );
        assert_eq!(solver.check(), SatResult::Sat);
        let model = solver.get_model().unwrap();
        let true_count = lits
            .iter()
            .filter(|l| model.eval(*l, true).unwrap().as_bool().unwrap())
            .count();
        assert_eq!(true_count, 1);
    }

    #[test]
    fn test_halves_partition_absorbs_remainder_in_second_half() {
        let groups = partition(5, CommanderGrouping::Halves);
        assert_eq!(groups, vec![0..2, 2..5]);
    }

    #[test]
    fn test_fixed3_partition_chunks() {
        let groups = partition(7, CommanderGrouping::Fixed3);
        assert_eq!(groups, vec![0..3, 3..6, 6..7]);
    }
}
