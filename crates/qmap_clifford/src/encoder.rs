//! Boolean-constraint encoder for Clifford circuit synthesis (Core B, §4.6).
//!
//! Builds, for a fixed number of qubits `n` and a fixed number of timesteps
//! `t_count`, a tableau-valued trace `X[0..=t_count][q]`, `Z[0..=t_count][q]`,
//! `R[0..=t_count]` (§3 "Encoder variables") plus gate-choice Booleans
//! `gS[t][kind][q]`/`gC[t][c][r]`, and asserts that the trace from `t=0`
//! (fixed to the identity tableau) to `t=t_count` (fixed to the target)
//! follows the §4.5 update rules under whichever gate fires at each step.

use crate::gate_set::{SingleGateKind, ENCODER_GENERATORS};
use qmap_core::cardinality::{self, Asserter};
use qmap_core::config::{CardinalityEncoding, CommanderGrouping, EncodingStyle};
use qmap_core::types::Tableau;
use std::collections::HashMap;
use z3::ast::{Ast, Bool};
use z3::{Context, Solver};

/// Whether a timestep may carry a single-qubit gate, a two-qubit (CNOT)
/// gate, or either — used by the `StDepth` objective's doubled timestep
/// axis (§4.7.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestepKind {
    Any,
    SingleOnly,
    TwoOnly,
}

/// Per-timestep tableau columns: `x[t][q]`/`z[t][q]` are length-`s`
/// bit-vectors, `r[t]` is the length-`s` phase column.
pub struct TableauVars<'ctx> {
    pub x: Vec<Vec<Vec<Bool<'ctx>>>>,
    pub z: Vec<Vec<Vec<Bool<'ctx>>>>,
    pub r: Vec<Vec<Bool<'ctx>>>,
}

/// Gate-choice Booleans for every timestep.
pub struct GateVars<'ctx> {
    /// `(t, kind, q) -> gS[t][kind][q]`.
    pub single: HashMap<(usize, SingleGateKind, usize), Bool<'ctx>>,
    /// `(t, control, target) -> gC[t][control][target]`.
    pub cx: HashMap<(usize, usize, usize), Bool<'ctx>>,
    /// Multi-gate style only: `(t, q) -> "no gate touches q at t"`.
    pub none: HashMap<(usize, usize), Bool<'ctx>>,
    /// Single-gate style only: `t -> "no gate fires at all at t"`.
    pub noop: HashMap<usize, Bool<'ctx>>,
}

/// Bundles the variables and structural parameters an objective module
/// needs to read back a solved model.
pub struct Encoding<'ctx> {
    pub n: usize,
    pub s: usize,
    pub t_count: usize,
    pub style: EncodingStyle,
    pub tableau: TableauVars<'ctx>,
    pub gates: GateVars<'ctx>,
}

fn tableau_vars<'ctx>(ctx: &'ctx Context, n: usize, s: usize, t_count: usize) -> TableauVars<'ctx> {
    let x = (0..=t_count)
        .map(|t| {
            (0..n)
                .map(|q| {
                    (0..s)
                        .map(|i| Bool::new_const(ctx, format!("x_{t}_{q}_{i}")))
                        .collect()
                })
                .collect()
        })
        .collect();
    let z = (0..=t_count)
        .map(|t| {
            (0..n)
                .map(|q| {
                    (0..s)
                        .map(|i| Bool::new_const(ctx, format!("z_{t}_{q}_{i}")))
                        .collect()
                })
                .collect()
        })
        .collect();
    let r = (0..=t_count)
        .map(|t| {
            (0..s)
                .map(|i| Bool::new_const(ctx, format!("r_{t}_{i}")))
                .collect()
        })
        .collect();
    TableauVars { x, z, r }
}

fn gate_vars<'ctx>(
    ctx: &'ctx Context,
    n: usize,
    t_count: usize,
    style: EncodingStyle,
) -> GateVars<'ctx> {
    let mut single = HashMap::new();
    let mut cx = HashMap::new();
    let mut none = HashMap::new();
    let mut noop = HashMap::new();

    for t in 0..t_count {
        for &kind in ENCODER_GENERATORS.iter() {
            for q in 0..n {
                single.insert(
                    (t, kind, q),
                    Bool::new_const(ctx, format!("gs_{t}_{kind:?}_{q}")),
                );
            }
        }
        for c in 0..n {
            for r in 0..n {
                if c == r {
                    continue;
                }
                cx.insert((t, c, r), Bool::new_const(ctx, format!("gc_{t}_{c}_{r}")));
            }
        }
        match style {
            EncodingStyle::MultiGate => {
                for q in 0..n {
                    none.insert((t, q), Bool::new_const(ctx, format!("gnone_{t}_{q}")));
                }
            }
            EncodingStyle::SingleGate => {
                noop.insert(t, Bool::new_const(ctx, format!("gnoop_{t}")));
            }
        }
    }
    GateVars {
        single,
        cx,
        none,
        noop,
    }
}

/// Builds the full set of encoder variables for `n` qubits over `t_count`
/// timesteps (`t_count + 1` tableau snapshots).
pub fn build<'ctx>(
    ctx: &'ctx Context,
    n: usize,
    t_count: usize,
    style: EncodingStyle,
) -> Encoding<'ctx> {
    let s = 2 * n;
    Encoding {
        n,
        s,
        t_count,
        style,
        tableau: tableau_vars(ctx, n, s, t_count),
        gates: gate_vars(ctx, n, t_count, style),
    }
}

/// Pins `tableau[0]` to the identity tableau and `tableau[t_count]` to
/// `target`.
pub fn assert_boundary<'ctx>(
    ctx: &'ctx Context,
    solver: &impl Asserter<'ctx>,
    enc: &Encoding<'ctx>,
    target: &Tableau,
) {
    let identity = Tableau::identity(enc.n);
    assert_pinned(ctx, solver, enc, 0, &identity);
    assert_pinned(ctx, solver, enc, enc.t_count, target);
}

fn assert_pinned<'ctx>(
    ctx: &'ctx Context,
    solver: &impl Asserter<'ctx>,
    enc: &Encoding<'ctx>,
    t: usize,
    tableau: &Tableau,
) {
    let n = enc.n;
    for q in 0..n {
        for i in 0..enc.s {
            let xb = tableau.rows[i][q];
            let zb = tableau.rows[i][n + q];
            solver.assert_bool(&enc.tableau.x[t][q][i]._eq(&Bool::from_bool(ctx, xb)));
            solver.assert_bool(&enc.tableau.z[t][q][i]._eq(&Bool::from_bool(ctx, zb)));
        }
    }
    for i in 0..enc.s {
        let rb = tableau.rows[i][2 * n];
        solver.assert_bool(&enc.tableau.r[t][i]._eq(&Bool::from_bool(ctx, rb)));
    }
}

/// The new `(x, z, phase-flip)` triple a single-qubit gate produces for one
/// tableau row, mirroring §4.5's update table.
fn single_gate_effect<'ctx>(
    ctx: &'ctx Context,
    kind: SingleGateKind,
    x: &Bool<'ctx>,
    z: &Bool<'ctx>,
) -> (Bool<'ctx>, Bool<'ctx>, Bool<'ctx>) {
    match kind {
        SingleGateKind::H => (z.clone(), x.clone(), Bool::and(ctx, &[x, z])),
        SingleGateKind::S => (x.clone(), x.xor(z), Bool::and(ctx, &[x, z])),
        SingleGateKind::Sdg => (x.clone(), x.xor(z), Bool::and(ctx, &[x, &z.not()])),
        SingleGateKind::X => (x.clone(), z.clone(), z.clone()),
        SingleGateKind::Y => (x.clone(), z.clone(), x.xor(z)),
        SingleGateKind::Z => (x.clone(), z.clone(), x.clone()),
        SingleGateKind::I | SingleGateKind::Sx | SingleGateKind::SxDg => {
            unreachable!("not an encoder generator")
        }
    }
}

/// The new `(xc, zc, xt, zt, phase-flip)` quintuple a `CNOT(c,t)` produces
/// for one tableau row, per §4.5.
#[allow(clippy::type_complexity)]
fn cx_effect<'ctx>(
    ctx: &'ctx Context,
    xc: &Bool<'ctx>,
    zc: &Bool<'ctx>,
    xt: &Bool<'ctx>,
    zt: &Bool<'ctx>,
) -> (Bool<'ctx>, Bool<'ctx>, Bool<'ctx>, Bool<'ctx>, Bool<'ctx>) {
    let new_xc = xc.clone();
    let new_zc = zc.xor(zt);
    let new_xt = xc.xor(xt);
    let new_zt = zt.clone();
    let same = zc.iff(xt);
    let flip = Bool::and(ctx, &[xc, zt, &same]);
    (new_xc, new_zc, new_xt, new_zt, flip)
}

/// One candidate gate event at a timestep: which tableau columns it
/// rewrites, and the gate-choice variable guarding it.
enum GateEvent<'ctx> {
    Single(SingleGateKind, usize, Bool<'ctx>),
    Cx(usize, usize, Bool<'ctx>),
}

fn events_at<'ctx>(enc: &Encoding<'ctx>, t: usize) -> Vec<GateEvent<'ctx>> {
    let mut events = Vec::new();
    for &kind in ENCODER_GENERATORS.iter() {
        for q in 0..enc.n {
            let var = enc.gates.single[&(t, kind, q)].clone();
            events.push(GateEvent::Single(kind, q, var));
        }
    }
    for c in 0..enc.n {
        for r in 0..enc.n {
            if c == r {
                continue;
            }
            let var = enc.gates.cx[&(t, c, r)].clone();
            events.push(GateEvent::Cx(c, r, var));
        }
    }
    events
}

/// Asserts the exactly-one gate-choice constraint(s) for timestep `t`,
/// restricted to `kind` (§4.7.1's `StDepth` parity restriction disallows
/// whichever category doesn't match the timestep's parity).
fn assert_gate_choice<'ctx>(
    ctx: &'ctx Context,
    solver: &impl Asserter<'ctx>,
    enc: &Encoding<'ctx>,
    t: usize,
    kind: TimestepKind,
    encoding: CardinalityEncoding,
    grouping: CommanderGrouping,
) {
    match enc.style {
        EncodingStyle::SingleGate => {
            let mut group: Vec<Bool> = Vec::new();
            for &k in ENCODER_GENERATORS.iter() {
                if kind == TimestepKind::TwoOnly {
                    continue;
                }
                for q in 0..enc.n {
                    group.push(enc.gates.single[&(t, k, q)].clone());
                }
            }
            for c in 0..enc.n {
                for r in 0..enc.n {
                    if c == r {
                        continue;
                    }
                    if kind == TimestepKind::SingleOnly {
                        continue;
                    }
                    group.push(enc.gates.cx[&(t, c, r)].clone());
                }
            }
            group.push(enc.gates.noop[&t].clone());
            cardinality::encode_exactly_one(
                ctx,
                solver,
                &group,
                encoding,
                grouping,
                &format!("clifford_t{t}"),
            );
        }
        EncodingStyle::MultiGate => {
            for q in 0..enc.n {
                let mut group: Vec<Bool> = Vec::new();
                if kind != TimestepKind::TwoOnly {
                    for &k in ENCODER_GENERATORS.iter() {
                        group.push(enc.gates.single[&(t, k, q)].clone());
                    }
                }
                group.push(enc.gates.none[&(t, q)].clone());
                if kind != TimestepKind::SingleOnly {
                    for r in 0..enc.n {
                        if r != q {
                            group.push(enc.gates.cx[&(t, q, r)].clone());
                            group.push(enc.gates.cx[&(t, r, q)].clone());
                        }
                    }
                }
                cardinality::encode_exactly_one(
                    ctx,
                    solver,
                    &group,
                    encoding,
                    grouping,
                    &format!("clifford_t{t}_q{q}"),
                );
            }
        }
    }

    // Outside the permitted category for this timestep, force every
    // variable of the excluded kind false (StDepth parity restriction).
    if kind == TimestepKind::SingleOnly {
        for c in 0..enc.n {
            for r in 0..enc.n {
                if c != r {
                    solver.assert_bool(&enc.gates.cx[&(t, c, r)].not());
                }
            }
        }
    }
    if kind == TimestepKind::TwoOnly {
        for &k in ENCODER_GENERATORS.iter() {
            for q in 0..enc.n {
                solver.assert_bool(&enc.gates.single[&(t, k, q)].not());
            }
        }
    }
}

/// Asserts the column-update and phase-XOR-chain transition constraints
/// carrying `tableau[t]` to `tableau[t+1]` under whichever gate event(s)
/// fire at `t`.
fn assert_transition<'ctx>(ctx: &'ctx Context, solver: &impl Asserter<'ctx>, enc: &Encoding<'ctx>, t: usize) {
    let n = enc.n;
    let s = enc.s;

    // Per-qubit "untouched" fallback: if nothing touching q fires, its
    // columns carry over unchanged.
    for q in 0..n {
        let mut touches: Vec<Bool> = Vec::new();
        for &kind in ENCODER_GENERATORS.iter() {
            touches.push(enc.gates.single[&(t, kind, q)].clone());
        }
        for other in 0..n {
            if other == q {
                continue;
            }
            touches.push(enc.gates.cx[&(t, q, other)].clone());
            touches.push(enc.gates.cx[&(t, other, q)].clone());
        }
        let refs: Vec<&Bool> = touches.iter().collect();
        let touched = Bool::or(ctx, &refs);
        let untouched = touched.not();
        for i in 0..s {
            let same_x = enc.tableau.x[t + 1][q][i].iff(&enc.tableau.x[t][q][i]);
            let same_z = enc.tableau.z[t + 1][q][i].iff(&enc.tableau.z[t][q][i]);
            solver.assert_bool(&untouched.implies(&Bool::and(ctx, &[&same_x, &same_z])));
        }
    }

    // Per-gate column updates.
    for &kind in ENCODER_GENERATORS.iter() {
        for q in 0..n {
            let var = enc.gates.single[&(t, kind, q)].clone();
            for i in 0..s {
                let (nx, nz, _flip) =
                    single_gate_effect(ctx, kind, &enc.tableau.x[t][q][i], &enc.tableau.z[t][q][i]);
                let new_x_eq = enc.tableau.x[t + 1][q][i].iff(&nx);
                let new_z_eq = enc.tableau.z[t + 1][q][i].iff(&nz);
                solver.assert_bool(&var.implies(&Bool::and(ctx, &[&new_x_eq, &new_z_eq])));
            }
        }
    }
    for c in 0..n {
        for r in 0..n {
            if c == r {
                continue;
            }
            let var = enc.gates.cx[&(t, c, r)].clone();
            for i in 0..s {
                let (nxc, nzc, nxt, nzt, _flip) = cx_effect(
                    ctx,
                    &enc.tableau.x[t][c][i],
                    &enc.tableau.z[t][c][i],
                    &enc.tableau.x[t][r][i],
                    &enc.tableau.z[t][r][i],
                );
                let eqs = [
                    enc.tableau.x[t + 1][c][i].iff(&nxc),
                    enc.tableau.z[t + 1][c][i].iff(&nzc),
                    enc.tableau.x[t + 1][r][i].iff(&nxt),
                    enc.tableau.z[t + 1][r][i].iff(&nzt),
                ];
                let eq_refs: Vec<&Bool> = eqs.iter().collect();
                solver.assert_bool(&var.implies(&Bool::and(ctx, &eq_refs)));
            }
        }
    }

    // Phase column: several gates may fire in parallel (multi-gate style),
    // so the phase flip is a running XOR over every gate event's
    // contribution, linearized through an auxiliary helper chain (§4.6).
    let events = events_at(enc, t);
    for i in 0..s {
        let mut acc = enc.tableau.r[t][i].clone();
        for (k, event) in events.iter().enumerate() {
            let (flip, var) = match event {
                GateEvent::Single(kind, q, var) => {
                    let (_, _, flip) = single_gate_effect(
                        ctx,
                        *kind,
                        &enc.tableau.x[t][*q][i],
                        &enc.tableau.z[t][*q][i],
                    );
                    (flip, var.clone())
                }
                GateEvent::Cx(c, r, var) => {
                    let (_, _, _, _, flip) = cx_effect(
                        ctx,
                        &enc.tableau.x[t][*c][i],
                        &enc.tableau.z[t][*c][i],
                        &enc.tableau.x[t][*r][i],
                        &enc.tableau.z[t][*r][i],
                    );
                    (flip, var.clone())
                }
            };
            let guarded_flip = Bool::and(ctx, &[&var, &flip]);
            let next = Bool::new_const(ctx, format!("racc_{t}_{i}_{k}"));
            solver.assert_bool(&next._eq(&acc.xor(&guarded_flip)));
            acc = next;
        }
        solver.assert_bool(&enc.tableau.r[t + 1][i]._eq(&acc));
    }
}

/// Asserts the full encoding: gate-choice constraints and transition
/// constraints for every timestep `0..t_count`, with `kind_at` controlling
/// each timestep's allowed gate category (pass `|_| TimestepKind::Any` for
/// the ordinary, non-`StDepth` objectives).
#[allow(clippy::too_many_arguments)]
pub fn assert_all_transitions<'ctx>(
    ctx: &'ctx Context,
    solver: &impl Asserter<'ctx>,
    enc: &Encoding<'ctx>,
    encoding: CardinalityEncoding,
    grouping: CommanderGrouping,
    kind_at: impl Fn(usize) -> TimestepKind,
) {
    for t in 0..enc.t_count {
        assert_gate_choice(ctx, solver, enc, t, kind_at(t), encoding, grouping);
        assert_transition(ctx, solver, enc, t);
    }
}

/// Symmetry-breaking clauses (§4.6, optional): forbids two consecutive
/// identical CNOTs and single-qubit gate pairs across adjacent timesteps
/// that compose to the identity (`H.H`, `S.Sdg`/`Sdg.S`, and any Pauli
/// squared).
pub fn assert_symmetry_breaking<'ctx>(ctx: &'ctx Context, solver: &impl Asserter<'ctx>, enc: &Encoding<'ctx>) {
    for t in 0..enc.t_count.saturating_sub(1) {
        for c in 0..enc.n {
            for r in 0..enc.n {
                if c == r {
                    continue;
                }
                let a = &enc.gates.cx[&(t, c, r)];
                let b = &enc.gates.cx[&(t + 1, c, r)];
                solver.assert_bool(&Bool::and(ctx, &[a, b]).not());
            }
        }
        for q in 0..enc.n {
            for &(kind, inverse) in IDENTITY_PAIRS.iter() {
                let a = &enc.gates.single[&(t, kind, q)];
                let b = &enc.gates.single[&(t + 1, inverse, q)];
                solver.assert_bool(&Bool::and(ctx, &[a, b]).not());
            }
        }
    }
}

const IDENTITY_PAIRS: [(SingleGateKind, SingleGateKind); 6] = [
    (SingleGateKind::H, SingleGateKind::H),
    (SingleGateKind::X, SingleGateKind::X),
    (SingleGateKind::Y, SingleGateKind::Y),
    (SingleGateKind::Z, SingleGateKind::Z),
    (SingleGateKind::S, SingleGateKind::Sdg),
    (SingleGateKind::Sdg, SingleGateKind::S),
];
