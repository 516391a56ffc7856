use criterion::{criterion_group, criterion_main, Criterion};
use qmap_clifford::gate_set::ENCODER_GENERATORS;
use qmap_clifford::synthesize;
use qmap_core::config::{CliffordConfig, EncodingStyle, TargetMetric};
use qmap_core::types::Tableau;

fn random_clifford_target(n: usize) -> Tableau {
    let mut t = Tableau::identity(n);
    for q in 0..n {
        t.h(q).unwrap();
        if q + 1 < n {
            t.cx(q, q + 1).unwrap();
        }
        t.s(q).unwrap();
    }
    t
}

fn bench_single_gate_gates_objective(c: &mut Criterion) {
    let target = random_clifford_target(3);
    let config = CliffordConfig {
        target: TargetMetric::Gates,
        encoding_style: EncodingStyle::SingleGate,
        ..CliffordConfig::default()
    };

    c.bench_function("synthesize_single_gate_3q_gates", |b| {
        b.iter(|| synthesize(&target, &ENCODER_GENERATORS, &config).unwrap())
    });
}

fn bench_multi_gate_depth_objective(c: &mut Criterion) {
    let target = random_clifford_target(3);
    let config = CliffordConfig {
        target: TargetMetric::Depth,
        encoding_style: EncodingStyle::MultiGate,
        ..CliffordConfig::default()
    };

    c.bench_function("synthesize_multi_gate_3q_depth", |b| {
        b.iter(|| synthesize(&target, &ENCODER_GENERATORS, &config).unwrap())
    });
}

criterion_group!(
    benches,
    bench_single_gate_gates_objective,
    bench_multi_gate_depth_objective
);
criterion_main!(benches);
