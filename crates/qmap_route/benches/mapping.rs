use criterion::{criterion_group, criterion_main, Criterion};
use qmap_core::config::MapperConfig;
use qmap_core::types::{CircuitGenome, Gate, HardwareProfile};
use qmap_route::map_circuit;

fn line_circuit(n: usize) -> CircuitGenome {
    let mut circuit = CircuitGenome::new(n);
    for i in 0..(n - 1) {
        circuit.add_gate(Gate::CX(i, n - 1 - i)).unwrap();
    }
    circuit
}

fn bench_heuristic_mapper(c: &mut Criterion) {
    let device = HardwareProfile::linear("bench-line", 12);
    let circuit = line_circuit(12);
    let config = MapperConfig::default();

    c.bench_function("heuristic_map_line12", |b| {
        b.iter(|| map_circuit(&circuit, &device, &config).unwrap())
    });
}

fn bench_heuristic_mapper_ring(c: &mut Criterion) {
    let device = HardwareProfile::new("bench-ring", 10, qmap_core::types::Topology::Ring);
    let circuit = line_circuit(10);
    let config = MapperConfig::default();

    c.bench_function("heuristic_map_ring10", |b| {
        b.iter(|| map_circuit(&circuit, &device, &config).unwrap())
    });
}

criterion_group!(benches, bench_heuristic_mapper, bench_heuristic_mapper_ring);
criterion_main!(benches);
