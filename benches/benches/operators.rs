//! Microbenchmarks for the L1/L2 leaf operators: the hot path every search
//! node calls into.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::prelude::*;

use neoalzette_autosearch::operators::bv_weight::bv_weight;
use neoalzette_autosearch::operators::linear_const::corr_add_varvar;
use neoalzette_autosearch::operators::linear_wallen::linear_weight_add_varvar;
use neoalzette_autosearch::operators::optimal_gamma::find_optimal_gamma;
use neoalzette_autosearch::operators::xdp_add::{enumerate_gammas, xdp_add32};

fn random_triples(count: usize) -> Vec<(u32, u32, u32)> {
    let mut rng = rand::rng();
    (0..count).map(|_| (rng.random(), rng.random(), rng.random())).collect()
}

fn bench_xdp_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("xdp_add");
    let triples = random_triples(256);

    group.bench_function("xdp_add32", |b| {
        b.iter(|| {
            for &(alpha, beta, gamma) in &triples {
                black_box(xdp_add32(black_box(alpha), black_box(beta), black_box(gamma)));
            }
        });
    });

    group.bench_function("find_optimal_gamma", |b| {
        b.iter(|| {
            for &(alpha, beta, _) in &triples {
                black_box(find_optimal_gamma(black_box(alpha), black_box(beta), 32));
            }
        });
    });

    group.bench_function("enumerate_gammas_capped", |b| {
        b.iter(|| {
            for &(alpha, beta, _) in &triples {
                black_box(enumerate_gammas(black_box(alpha), black_box(beta), 32, Some(6), 32, 0));
            }
        });
    });

    group.finish();
}

fn bench_bv_weight(c: &mut Criterion) {
    let triples = random_triples(256);
    c.bench_function("bv_weight", |b| {
        b.iter(|| {
            for &(u, v, a) in &triples {
                black_box(bv_weight(black_box(u), black_box(v), black_box(a)));
            }
        });
    });
}

fn bench_linear(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear");
    let triples = random_triples(256);

    group.bench_function("linear_weight_add_varvar", |b| {
        b.iter(|| {
            for &(u, v, w) in &triples {
                black_box(linear_weight_add_varvar(black_box(u), black_box(v), black_box(w)));
            }
        });
    });

    group.bench_function("corr_add_varvar", |b| {
        b.iter(|| {
            for &(alpha, gamma, beta) in &triples {
                black_box(corr_add_varvar(black_box(alpha), black_box(gamma), black_box(beta), 32));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_xdp_add, bench_bv_weight, bench_linear);
criterion_main!(benches);
