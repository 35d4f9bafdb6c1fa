//! Benchmark for composition overhead across the four wrappers.
//!
//! # Benchmark Categories
//!
//! 1. **Synchronous chains**: `map`/`flat_map` chains on `Maybe`, `Try` and `Call`
//! 2. **Settled promises**: chains applied to a promise born resolved
//! 3. **Pending promises**: spawn, chain and wait on the worker runtime
//! 4. **Combinators**: `Promise::of_all` over pending constituents

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use monadic::Error;
use monadic::control::{Call, Maybe, Try};
use monadic::effect::{Promise, runtime};
use std::hint::black_box;

const CHAIN_LENGTHS: [usize; 3] = [1, 10, 100];

// =============================================================================
// Synchronous Chains
// =============================================================================

fn benchmark_synchronous_chains(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("synchronous_chain");

    for length in CHAIN_LENGTHS {
        group.bench_with_input(BenchmarkId::new("maybe", length), &length, |bencher, &length| {
            bencher.iter(|| {
                let mut maybe = Maybe::some(black_box(0_u64));
                for _ in 0..length {
                    maybe = maybe.map(|n| n + 1);
                }
                black_box(maybe)
            });
        });

        group.bench_with_input(BenchmarkId::new("try", length), &length, |bencher, &length| {
            bencher.iter(|| {
                let mut attempt = Try::success(black_box(0_u64));
                for _ in 0..length {
                    attempt = attempt.map(|n| n + 1);
                }
                black_box(attempt)
            });
        });

        let mut call = Call::pure(0_u64);
        for _ in 0..length {
            call = call.map(|n| n + 1);
        }
        group.bench_with_input(BenchmarkId::new("call_evaluate", length), &call, |bencher, call| {
            bencher.iter(|| black_box(call.or_fail()));
        });
    }

    group.finish();
}

// =============================================================================
// Promise Chains
// =============================================================================

fn benchmark_settled_promise(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("settled_promise_chain");

    for length in CHAIN_LENGTHS {
        group.bench_with_input(BenchmarkId::new("map", length), &length, |bencher, &length| {
            bencher.iter(|| {
                let mut promise = Promise::of(black_box(0_u64));
                for _ in 0..length {
                    promise = promise.map(|n| n + 1);
                }
                black_box(promise.or_fail())
            });
        });
    }

    group.finish();
}

fn benchmark_pending_promise(criterion: &mut Criterion) {
    let _ = runtime::global();
    let mut group = criterion.benchmark_group("pending_promise_chain");

    for length in CHAIN_LENGTHS {
        group.bench_with_input(BenchmarkId::new("map", length), &length, |bencher, &length| {
            bencher.iter(|| {
                let mut promise = Promise::spawn(|| Ok::<_, Error>(black_box(0_u64)));
                for _ in 0..length {
                    promise = promise.map(|n| n + 1);
                }
                black_box(promise.or_fail())
            });
        });
    }

    group.finish();
}

fn benchmark_of_all(criterion: &mut Criterion) {
    let _ = runtime::global();
    let mut group = criterion.benchmark_group("promise_of_all");

    for size in [10_u64, 100] {
        group.bench_with_input(BenchmarkId::new("spawned", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let promises = (0..size).map(|n| Promise::spawn(move || Ok::<_, Error>(n)));
                black_box(Promise::of_all(promises).or_fail())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_synchronous_chains,
    benchmark_settled_promise,
    benchmark_pending_promise,
    benchmark_of_all
);
criterion_main!(benches);
