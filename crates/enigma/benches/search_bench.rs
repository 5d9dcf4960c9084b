//! Criterion benchmarks for the keyspace scan.
//! Focus: one rotor order with every start position (17 576 keys), crib pruning
//! on and off, and thread counts {1, 4}.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use enigma::api::{
    run_search, Crib, CribOffset, Machine, MachineSettings, RotorModel, ScorerFlags,
    SearchBounds, SearchContext,
};

const PLAIN: &str = "WEATHERREPORTFORTHENORTHSEAXSTORMWARNINGFORALLUNITSINSECTORSEVEN";

fn bench_search(c: &mut Criterion) {
    let key = MachineSettings {
        rotors: vec![RotorModel::II, RotorModel::IV, RotorModel::I],
        positions: vec![7, 19, 3],
        ..MachineSettings::default()
    };
    let ciphertext = Machine::from_settings(&key).unwrap().encode(PLAIN).unwrap();
    let bounds = SearchBounds::new(key.rotors.clone(), 3)
        .with_slot_rotors(0, vec![RotorModel::II])
        .with_slot_rotors(1, vec![RotorModel::IV])
        .with_fixed_rings(&[0, 0, 0]);
    let crib = Crib::new("WEATHERREPORT", CribOffset::At(0)).unwrap();

    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    for &threads in &[1usize, 4] {
        group.bench_with_input(BenchmarkId::new("ioc_only", threads), &threads, |b, &t| {
            let ctx = SearchContext {
                threads: Some(t),
                ..SearchContext::default()
            };
            b.iter(|| run_search(&ciphertext, &bounds, ScorerFlags::NONE, 10, &ctx).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("crib_pruned", threads), &threads, |b, &t| {
            let ctx = SearchContext {
                crib: Some(&crib),
                threads: Some(t),
                ..SearchContext::default()
            };
            b.iter(|| {
                run_search(&ciphertext, &bounds, ScorerFlags::KNOWN_PLAINTEXT, 10, &ctx).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
