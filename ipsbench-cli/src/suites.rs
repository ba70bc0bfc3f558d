// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Built-in comparison suites.
//!
//! Each suite pits a handful of standard-library idioms against each other on
//! the same inputs, which doubles as a smoke test of the harness on a new
//! machine.

use std::hint::black_box;
use std::io::Write;

use clap::ValueEnum;
use ipsbench_core::{BenchResult, Job, JobConfig, SuiteSummary};

/// Sizes of the generated numeric inputs.
const INPUT_LENGTHS: &[usize] = &[16, 256, 4096];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Suite {
    /// Summing a slice of integers
    Sum,
    /// Building a string from words
    Concat,
    /// Sorting integer vectors (always duplicates inputs)
    Sort,
}

impl Suite {
    pub const ALL: [Suite; 3] = [Suite::Sum, Suite::Concat, Suite::Sort];

    pub fn name(&self) -> &'static str {
        match self {
            Suite::Sum => "sum",
            Suite::Concat => "concat",
            Suite::Sort => "sort",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Suite::Sum => "iter().sum() vs fold vs index loop vs chunked sum",
            Suite::Concat => "push_str vs concat vs join vs collect",
            Suite::Sort => "sort vs sort_unstable vs sort_by_key",
        }
    }

    /// Run the suite, ranking its operations, and return the session summary.
    pub fn run<W: Write>(&self, config: JobConfig, writer: W) -> BenchResult<SuiteSummary> {
        tracing::info!(suite = self.name(), "Running suite");
        match self {
            Suite::Sum => run_sum(config, writer),
            Suite::Concat => run_concat(config, writer),
            Suite::Sort => run_sort(config, writer),
        }
    }
}

/// Deterministic pseudo-random values (64-bit LCG), so runs are comparable.
fn scrambled(len: usize, seed: u64) -> Vec<u32> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as u32
        })
        .collect()
}

fn run_sum<W: Write>(config: JobConfig, writer: W) -> BenchResult<SuiteSummary> {
    let inputs: Vec<Vec<u64>> = INPUT_LENGTHS
        .iter()
        .map(|&len| (0..len as u64).collect())
        .collect();
    let mut job = Job::with_writer(inputs, config, writer)?;

    job.report("iter().sum()", |v: &mut Vec<u64>| {
        black_box(v.iter().sum::<u64>());
    })?;
    job.report("iter().fold()", |v: &mut Vec<u64>| {
        black_box(v.iter().fold(0u64, |acc, x| acc.wrapping_add(*x)));
    })?;
    job.report("index loop", |v: &mut Vec<u64>| {
        let mut total = 0u64;
        for i in 0..v.len() {
            total = total.wrapping_add(v[i]);
        }
        black_box(total);
    })?;
    job.report("chunks_exact(4)", |v: &mut Vec<u64>| {
        let chunks = v.chunks_exact(4);
        let tail: u64 = chunks.remainder().iter().sum();
        let body: u64 = chunks.map(|c| c[0] + c[1] + c[2] + c[3]).sum();
        black_box(body + tail);
    })?;

    job.compare()?;
    Ok(job.summary(Suite::Sum.name()))
}

fn run_concat<W: Write>(config: JobConfig, writer: W) -> BenchResult<SuiteSummary> {
    const WORDS: &[&str] = &[
        "throughput", "repetition", "baseline", "sample", "variance", "ranking",
    ];
    let inputs: Vec<Vec<&'static str>> = [2usize, 6, 24]
        .iter()
        .map(|&n| WORDS.iter().copied().cycle().take(n).collect())
        .collect();
    let mut job = Job::with_writer(inputs, config, writer)?;

    job.report("String::push_str", |words: &mut Vec<&'static str>| {
        let mut out = String::new();
        for word in words.iter() {
            out.push_str(word);
        }
        black_box(out);
    })?;
    job.report("with_capacity + push_str", |words: &mut Vec<&'static str>| {
        let mut out = String::with_capacity(words.iter().map(|w| w.len()).sum());
        for word in words.iter() {
            out.push_str(word);
        }
        black_box(out);
    })?;
    job.report("concat()", |words: &mut Vec<&'static str>| {
        black_box(words.concat());
    })?;
    job.report("join(\" \")", |words: &mut Vec<&'static str>| {
        black_box(words.join(" "));
    })?;
    job.report("collect::<String>()", |words: &mut Vec<&'static str>| {
        black_box(words.iter().copied().collect::<String>());
    })?;

    job.compare()?;
    Ok(job.summary(Suite::Concat.name()))
}

fn run_sort<W: Write>(config: JobConfig, writer: W) -> BenchResult<SuiteSummary> {
    let inputs: Vec<Vec<u32>> = INPUT_LENGTHS
        .iter()
        .enumerate()
        .map(|(i, &len)| scrambled(len, i as u64 + 1))
        .collect();

    // Sorting in place would hand every later invocation a sorted vector
    if !config.dup_inputs {
        tracing::info!(suite = "sort", "Enabling input duplication for destructive operations");
    }
    let mut job = Job::with_writer(inputs, config.dup_inputs(true), writer)?;

    job.report("sort()", |v: &mut Vec<u32>| {
        v.sort();
        black_box(v);
    })?;
    job.report("sort_unstable()", |v: &mut Vec<u32>| {
        v.sort_unstable();
        black_box(v);
    })?;
    job.report("sort_by_key(Reverse)", |v: &mut Vec<u32>| {
        v.sort_by_key(|x| std::cmp::Reverse(*x));
        black_box(v);
    })?;

    job.compare()?;
    Ok(job.summary(Suite::Sort.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_config() -> JobConfig {
        JobConfig::default()
            .sample_count(2)
            .unwrap()
            .sample_duration_ns(200_000)
            .unwrap()
    }

    #[test]
    fn test_scrambled_is_deterministic() {
        assert_eq!(scrambled(32, 7), scrambled(32, 7));
        assert_ne!(scrambled(32, 7), scrambled(32, 8));
        assert_eq!(scrambled(5, 1).len(), 5);
    }

    #[test]
    fn test_every_suite_ranks_its_operations() {
        for suite in Suite::ALL {
            let mut out = Vec::new();
            let summary = suite.run(tiny_config(), &mut out).unwrap();

            assert_eq!(summary.suite, suite.name());
            assert!(summary.reports.len() >= 3);
            assert!(summary.reports.iter().all(|r| r.ips > 0.0));
            for pair in summary.reports.windows(2) {
                assert!(pair[0].ips >= pair[1].ips);
            }

            let text = String::from_utf8(out).unwrap();
            assert!(text.contains("Comparison:"), "{} printed no comparison", suite.name());
        }
    }

    #[test]
    fn test_sort_forces_duplication() {
        let summary = Suite::Sort.run(tiny_config(), Vec::new()).unwrap();
        assert!(summary.config.dup_inputs);
    }
}
