#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use lipowalk_core::config::RunConfig;
use lipowalk_core::engine::Engine;

/// Walker-step throughput of the sequential and sharded engines.
fn benchmark_engine_throughput(c: &mut Criterion) {
    // Fixed seed for reproducibility.
    let config = RunConfig::new(10_000, 100, 1_000, 42).expect("valid benchmark config");
    let engine = Engine::new(config);

    c.bench_function("engine_sequential", |b| {
        b.iter(|| black_box(engine.run()))
    });

    let shards = num_cpus::get();
    c.bench_function("engine_sharded", |b| {
        b.iter(|| black_box(engine.run_sharded(shards).expect("sharded run")))
    });
}

criterion_group!(benches, benchmark_engine_throughput);
criterion_main!(benches);
