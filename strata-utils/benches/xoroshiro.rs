#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use strata_utils::random::{PositionalRandom, Random, xoroshiro::Xoroshiro};

fn bench_draws(c: &mut Criterion) {
    let mut random = Xoroshiro::from_seed(12345);
    c.bench_function("xoroshiro_next_i64", |b| {
        b.iter(|| black_box(random.next_i64()));
    });
    c.bench_function("xoroshiro_next_i32_bounded", |b| {
        b.iter(|| black_box(random.next_i32_bounded(black_box(100))));
    });
    c.bench_function("xoroshiro_next_f64", |b| {
        b.iter(|| black_box(random.next_f64()));
    });
}

fn bench_splitting(c: &mut Criterion) {
    let splitter = Xoroshiro::from_seed(12345).next_positional();
    c.bench_function("xoroshiro_split_at", |b| {
        b.iter(|| black_box(splitter.at(black_box(17), black_box(64), black_box(-9))));
    });
    c.bench_function("xoroshiro_split_with_hash_of", |b| {
        b.iter(|| black_box(splitter.with_hash_of(black_box("minecraft:overworld/continents"))));
    });
}

criterion_group!(benches, bench_draws, bench_splitting);
criterion_main!(benches);
