//! Criterion benchmarks for whole executor runs.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use sluice_bench::{glider_field, hot_spot, reference_profile, stress_profile, HeatDiffusion};
use sluice_engine::MonotileExecutor;
use sluice_test_utils::Life;

/// Benchmark: 16 generations of heat diffusion on the 64x64 reference tile.
fn bench_heat_reference(c: &mut Criterion) {
    let input = hot_spot(64, 64, 1000.0);

    c.bench_function("heat_reference_16gen", |b| {
        b.iter_batched(
            || {
                let mut e = MonotileExecutor::with_default_halo(
                    reference_profile(),
                    HeatDiffusion { alpha: 0.2 },
                )
                .unwrap();
                e.set_input(&input).unwrap();
                e
            },
            |mut e| {
                e.run(16).unwrap();
                black_box(e.i_generation());
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: one full pass of Life on the 256x256 stress tile.
fn bench_life_stress(c: &mut Criterion) {
    let input = glider_field(256, 256, 42);
    let mut executor = MonotileExecutor::with_default_halo(stress_profile(), Life).unwrap();
    executor.set_input(&input).unwrap();

    let mut group = c.benchmark_group("life_stress");
    group.sample_size(10);
    group.bench_function("one_pass_8gen", |b| {
        b.iter(|| {
            executor.run(8).unwrap();
            black_box(executor.i_generation());
        });
    });
    group.finish();
}

/// Benchmark: chunk overhead, one generation per pass versus four.
fn bench_pipeline_depth(c: &mut Criterion) {
    let input = hot_spot(64, 64, 1000.0);
    let mut group = c.benchmark_group("pipeline_depth");
    for depth in [1usize, 4] {
        let config = reference_profile().with_pipeline_length(depth);
        let mut executor =
            MonotileExecutor::with_default_halo(config, HeatDiffusion { alpha: 0.2 }).unwrap();
        executor.set_input(&input).unwrap();
        group.bench_function(format!("depth_{depth}"), |b| {
            b.iter(|| executor.run(4).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_heat_reference,
    bench_life_stress,
    bench_pipeline_depth
);
criterion_main!(benches);
