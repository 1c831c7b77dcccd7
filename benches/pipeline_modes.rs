// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Sequential vs parallel pipeline evaluation
//!
//! Runs the same cache-map-filter-sort-load pipeline in both modes, next to
//! a hand-written rayon baseline without a cache.

use std::time::Duration;

use cachestream::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rayon::prelude::*;

/// Generate words of varying length
fn generate_words(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let len = 1 + (i * 7) % 13;
            (0..len)
                .map(|j| (b'a' + ((i + j) % 26) as u8) as char)
                .collect()
        })
        .collect()
}

fn expensive_score(word: &str) -> u64 {
    word.bytes()
        .fold(0u64, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u64))
        % 1_000
}

fn cached_pipeline(sequence: UnpairedSequence<'_, String>) -> usize {
    sequence
        .begin_caching()
        .map(|word| expensive_score(&word))
        .filter(|score| *score > 250)
        .sorted()
        .swap_to_cache()
        .count()
        .unwrap_or(0)
}

fn rayon_baseline(words: Vec<String>) -> usize {
    let mut scored: Vec<(u64, String)> = words
        .into_par_iter()
        .map(|word| (expensive_score(&word), word))
        .filter(|(score, _)| *score > 250)
        .collect();
    scored.par_sort_by_key(|(score, _)| *score);
    scored.len()
}

fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_modes");
    group.measurement_time(Duration::from_secs(5));

    for size in [1_000usize, 10_000, 100_000] {
        let words = generate_words(size);

        group.bench_with_input(BenchmarkId::new("sequential", size), &words, |b, words| {
            b.iter(|| {
                black_box(cached_pipeline(UnpairedSequence::from_collection(
                    words.clone(),
                )))
            })
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &words, |b, words| {
            b.iter(|| black_box(cached_pipeline(UnpairedSequence::from_parallel(words.clone()))))
        });

        group.bench_with_input(BenchmarkId::new("rayon_baseline", size), &words, |b, words| {
            b.iter(|| black_box(rayon_baseline(words.clone())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_modes);
criterion_main!(benches);
