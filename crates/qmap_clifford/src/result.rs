//! Result assembly for a Clifford synthesis run (§4.8): walks a solved
//! model's gate-choice variables timestep by timestep and emits the
//! corresponding gates into a [`CircuitGenome`].

use crate::encoder::Encoding;
use crate::error::{CliffordError, Result};
use crate::gate_set::SingleGateKind;
use qmap_core::config::EncodingStyle;
use qmap_core::types::{CircuitGenome, Gate};
use serde::{Deserialize, Serialize};
use z3::Model;

/// Outcome of a successful Clifford synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliffordResult {
    /// The synthesized circuit, one gate per fired gate-choice variable, in
    /// timestep order.
    pub circuit: CircuitGenome,
    /// Total gate count (single- plus two-qubit).
    pub gates: usize,
    /// Two-qubit (`CX`) gate count only.
    pub two_qubit_gates: usize,
    /// Number of timesteps that fired at least one gate.
    pub depth: usize,
    /// Number of encoder timesteps searched to reach this result (may
    /// exceed `depth` when padding no-op timesteps were available).
    pub t_count: usize,
}

fn single_kind_to_gate(kind: SingleGateKind, q: usize) -> Gate {
    match kind {
        SingleGateKind::H => Gate::H(q),
        SingleGateKind::X => Gate::X(q),
        SingleGateKind::Y => Gate::Y(q),
        SingleGateKind::Z => Gate::Z(q),
        SingleGateKind::S => Gate::S(q),
        SingleGateKind::Sdg => Gate::Sdg(q),
        SingleGateKind::I | SingleGateKind::Sx | SingleGateKind::SxDg => {
            unreachable!("not an encoder generator")
        }
    }
}

/// Reads back every fired gate-choice variable from `model` and assembles
/// a [`CliffordResult`]. `enc` must be the encoding the model was solved
/// against (boundary + transition constraints already asserted on its
/// solver).
pub fn extract(model: &Model, enc: &Encoding) -> Result<CliffordResult> {
    let mut circuit = CircuitGenome::new(enc.n);
    let mut gates = 0usize;
    let mut two_qubit_gates = 0usize;
    let mut depth = 0usize;

    let eval_true = |b: &z3::ast::Bool| -> bool {
        model.eval(b, true).and_then(|v| v.as_bool()).unwrap_or(false)
    };

    for t in 0..enc.t_count {
        let mut fired_at_t = false;

        // Single-qubit gates, lowest qubit index first for determinism.
        for q in 0..enc.n {
            for &kind in crate::gate_set::ENCODER_GENERATORS.iter() {
                if let Some(var) = enc.gates.single.get(&(t, kind, q)) {
                    if eval_true(var) {
                        circuit.add_gate(single_kind_to_gate(kind, q))?;
                        gates += 1;
                        fired_at_t = true;
                    }
                }
            }
        }

        // Two-qubit CNOTs, control-major order.
        for c in 0..enc.n {
            for r in 0..enc.n {
                if c == r {
                    continue;
                }
                if let Some(var) = enc.gates.cx.get(&(t, c, r)) {
                    if eval_true(var) {
                        circuit.add_gate(Gate::CX(c, r))?;
                        gates += 1;
                        two_qubit_gates += 1;
                        fired_at_t = true;
                    }
                }
            }
        }

        if fired_at_t {
            depth += 1;
        } else if matches!(enc.style, EncodingStyle::SingleGate) {
            let noop = enc
                .gates
                .noop
                .get(&t)
                .map(eval_true)
                .unwrap_or(false);
            if !noop {
                return Err(CliffordError::invariant(format!(
                    "timestep {t} fired no gate and no noop variable"
                )));
            }
        }
    }

    Ok(CliffordResult {
        circuit,
        gates,
        two_qubit_gates,
        depth,
        t_count: enc.t_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder;
    use qmap_core::config::CardinalityEncoding;
    use qmap_core::config::CommanderGrouping;
    use qmap_core::types::Tableau;
    use z3::{Config, Context, SatResult, Solver};

    #[test]
    fn test_extract_single_h() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let solver = Solver::new(&ctx);
        let mut target = Tableau::identity(1);
        target.h(0).unwrap();
        let enc = encoder::build(&ctx, 1, 1, EncodingStyle::SingleGate);
        encoder::assert_boundary(&ctx, &solver, &enc, &target);
        encoder::assert_all_transitions(
            &ctx,
            &solver,
            &enc,
            CardinalityEncoding::Naive,
            CommanderGrouping::Fixed3,
            |_| encoder::TimestepKind::Any,
        );
        assert_eq!(solver.check(), SatResult::Sat);
        let model = solver.get_model().unwrap();
        let result = extract(&model, &enc).unwrap();
        assert_eq!(result.gates, 1);
        assert_eq!(result.depth, 1);
        assert_eq!(result.circuit.gate_count(), 1);
    }
}
