// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Overhead microbenchmarks for the measurement machinery itself.
//!
//! The accumulator and the timing loop run inside every sample, so their own
//! cost bounds how fast an operation ipsbench can still resolve.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ipsbench_core::{Report, TimingRoutine, MAX_UNROLLED_SLOTS};
use std::time::Duration;

/// Input counts on either side of the unrolling threshold.
const SLOT_COUNTS: &[usize] = &[1, 4, MAX_UNROLLED_SLOTS, MAX_UNROLLED_SLOTS + 1, 32];

/// Benchmark folding one throughput observation into a report.
fn bench_report_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_accumulate");
    group.measurement_time(Duration::from_secs(3));

    group.bench_function("add_throughput", |b| {
        let mut report = Report::new("accumulate", 1);
        let mut x = 1.0f64;
        b.iter(|| {
            x += 1.0;
            report.add_throughput(black_box(x)).ok();
        });
    });

    group.bench_function("stddev_after_sample", |b| {
        let mut report = Report::new("stddev", 1);
        b.iter(|| {
            report.add_throughput(black_box(1_000.0)).ok();
            black_box(report.stddev());
        });
    });

    group.finish();
}

/// Benchmark the identity pass through the timing routine, per layout.
fn bench_routine_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("routine_overhead");
    group.measurement_time(Duration::from_secs(3));

    for &slots in SLOT_COUNTS {
        group.throughput(Throughput::Elements(slots as u64 * 1_000));

        group.bench_with_input(BenchmarkId::new("in_place", slots), &slots, |b, &slots| {
            let routine = TimingRoutine::build(slots, false);
            let mut inputs = vec![0u64; slots];
            b.iter(|| {
                routine.time(&mut inputs, 1_000, &mut |v: &mut u64| {
                    black_box(v);
                })
            });
        });

        group.bench_with_input(BenchmarkId::new("duplicate", slots), &slots, |b, &slots| {
            let routine = TimingRoutine::build(slots, true);
            let mut inputs = vec![vec![0u8; 64]; slots];
            b.iter(|| {
                routine.time(&mut inputs, 1_000, &mut |v: &mut Vec<u8>| {
                    black_box(v);
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_report_accumulate, bench_routine_overhead);

criterion_main!(benches);
