//! Fixed-size end-to-end benchmarks for the L4 search engines. Capped
//! tightly (weight caps, node budget) so a benchmark run stays within a
//! reasonable wall-clock budget rather than chasing full, unbounded search.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use neoalzette_autosearch::engine::{search_differential, search_linear};
use neoalzette_autosearch::types::SearchConfig;

fn bounded_config(round_count: u32) -> SearchConfig {
    let mut cfg = SearchConfig::new(round_count)
        .with_addition_weight_cap(6)
        .with_subtraction_weight_cap(6)
        .with_max_nodes(200_000);
    cfg.max_subtraction_candidates = 32;
    cfg.max_injection_outputs = 32;
    cfg
}

fn bench_differential_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("differential_search");
    for rounds in [1u32, 2, 3] {
        let config = bounded_config(rounds);
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(rounds),
            &config,
            |b, config| b.iter(|| black_box(search_differential(black_box(0x1), black_box(0x0), config))),
        );
    }
    group.finish();
}

fn bench_linear_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_search");
    for rounds in [1u32, 2, 3] {
        let mut config = bounded_config(rounds);
        config.linear_candidate_k = 32;
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(rounds),
            &config,
            |b, config| b.iter(|| black_box(search_linear(black_box(0x1), black_box(0x0), config))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_differential_search, bench_linear_search);
criterion_main!(benches);
