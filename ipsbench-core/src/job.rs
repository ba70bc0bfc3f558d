// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmarking session over a fixed set of inputs.
//!
//! A [`Job`] owns the inputs, the timing routine specialized for them, and one
//! [`Report`] per registered operation. Measurement is strictly sequential:
//! operations are timed one after another on the calling thread.

use std::hint::black_box;
use std::io::{self, Stdout, Write};
use std::time::Duration;

use crate::collector::{Collector, NoCollection};
use crate::config::JobConfig;
use crate::error::{BenchError, BenchResult, ConfigError};
use crate::export::SuiteSummary;
use crate::report::Report;
use crate::routine::TimingRoutine;
use crate::types::DegeneratePolicy;

fn io_error(context: &'static str) -> impl FnOnce(io::Error) -> BenchError {
    move |source| BenchError::Io { context, source }
}

/// What to do with one pair of operation and identity timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SampleStep {
    /// Baseline-subtracted time in nanoseconds.
    Record(u64),
    /// Degenerate pair under `Clamp`: the unsubtracted operation time.
    Clamp(u64),
    /// Degenerate pair with retries left.
    Retry,
    /// Degenerate pair and nothing left to try.
    Fail,
}

fn saturating_nanos(nanos: u128) -> u64 {
    u64::try_from(nanos).unwrap_or(u64::MAX)
}

/// Decide a sample from its operation and identity timings.
///
/// A pair is degenerate when the identity run took at least as long as the
/// operation run. `retries` counts re-measurements already made.
fn resolve_degenerate(
    measured: u128,
    baseline: u128,
    policy: DegeneratePolicy,
    retries: u32,
) -> SampleStep {
    if measured > baseline {
        return SampleStep::Record(saturating_nanos(measured - baseline));
    }

    match policy {
        DegeneratePolicy::Clamp => SampleStep::Clamp(saturating_nanos(measured).max(1)),
        DegeneratePolicy::Retry { attempts } if retries < attempts.get() => SampleStep::Retry,
        DegeneratePolicy::Retry { .. } | DegeneratePolicy::Fail => SampleStep::Fail,
    }
}

/// One benchmarking session.
///
/// `T` is the input type handed to every operation; `W` receives the
/// human-readable status lines (stdout unless injected).
pub struct Job<T, W = Stdout> {
    inputs: Vec<T>,
    config: JobConfig,
    routine: TimingRoutine,
    reports: Vec<Report>,
    writer: W,
    collector: Box<dyn Collector>,
}

impl<T: Clone> Job<T, Stdout> {
    /// Create a job with default settings, printing to stdout.
    pub fn new(inputs: Vec<T>) -> BenchResult<Self> {
        Self::with_config(inputs, JobConfig::default())
    }

    /// Create a job with explicit settings, printing to stdout.
    pub fn with_config(inputs: Vec<T>, config: JobConfig) -> BenchResult<Self> {
        Job::with_writer(inputs, config, io::stdout())
    }
}

impl<T: Clone, W: Write> Job<T, W> {
    /// Create a job that writes its status lines to `writer`.
    ///
    /// Fails with [`ConfigError::EmptyInputs`] if `inputs` is empty.
    pub fn with_writer(inputs: Vec<T>, config: JobConfig, writer: W) -> BenchResult<Self> {
        if inputs.is_empty() {
            return Err(ConfigError::EmptyInputs.into());
        }

        let routine = TimingRoutine::build(inputs.len(), config.dup_inputs);
        Ok(Self {
            inputs,
            config,
            routine,
            reports: Vec::new(),
            writer,
            collector: Box::new(NoCollection),
        })
    }

    /// Install the hook invoked once before each operation's samples.
    pub fn with_collector(mut self, collector: impl Collector + 'static) -> Self {
        self.collector = Box::new(collector);
        self
    }

    /// Toggle input duplication. The timing routine is rebuilt before returning.
    pub fn set_dup_inputs(&mut self, dup: bool) {
        self.config.dup_inputs = dup;
        self.routine = TimingRoutine::build(self.inputs.len(), dup);
    }

    pub fn dup_inputs(&self) -> bool {
        self.config.dup_inputs
    }

    pub fn inputs(&self) -> &[T] {
        &self.inputs
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    pub fn routine(&self) -> &TimingRoutine {
        &self.routine
    }

    /// Reports in registration order, or ranked order after [`Job::compare`].
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Time `repetitions` passes of `op` over every input.
    pub fn time<F>(&mut self, repetitions: u64, op: &mut F) -> Duration
    where
        F: FnMut(&mut T),
    {
        self.routine.time(&mut self.inputs, repetitions, op)
    }

    /// Find the repetition count whose timed run lasts about one sample span.
    ///
    /// Doubles from one until a trial reaches the target, then scales the last
    /// count by `target / elapsed` (rounded up, at least one). This is the
    /// inverse of multiplying by `elapsed / target`, which would grow the count
    /// on overshoot and push the expected sample time away from the target.
    pub fn estimate_repetitions<F>(&mut self, label: &str, op: &mut F) -> BenchResult<u64>
    where
        F: FnMut(&mut T),
    {
        let target = u128::from(self.config.sample_duration.as_nanos());
        let mut repetitions: u64 = 1;

        loop {
            let elapsed = self.time(repetitions, op).as_nanos();
            tracing::debug!(
                label = %label,
                repetitions = repetitions,
                elapsed_ns = %elapsed,
                "Estimation trial"
            );

            if elapsed >= target {
                let scaled = (u128::from(repetitions) * target).div_ceil(elapsed);
                return Ok(u64::try_from(scaled).unwrap_or(repetitions).max(1));
            }

            repetitions = repetitions.checked_mul(2).ok_or_else(|| {
                BenchError::measurement(label, "repetition count overflowed while estimating")
            })?;
        }
    }

    /// Measure `op` and record it under `label`.
    ///
    /// Emits the label and the resulting throughput to the writer and returns
    /// the new report. On error no report is recorded.
    pub fn report<F>(&mut self, label: impl Into<String>, mut op: F) -> BenchResult<&Report>
    where
        F: FnMut(&mut T),
    {
        let label = label.into();
        let repetitions = self.estimate_repetitions(&label, &mut op)?;
        let invocations = repetitions
            .checked_mul(self.inputs.len() as u64)
            .ok_or_else(|| BenchError::measurement(&label, "invocation count overflow"))?;

        tracing::debug!(
            label = %label,
            repetitions = repetitions,
            invocations_per_sample = invocations,
            "Sampling"
        );

        let mut report = Report::new(label, invocations);
        self.collector.collect();

        for _ in 0..self.config.sample_count.value() {
            let elapsed = self.measure_sample(report.label(), repetitions, &mut op)?;
            report.add_sample(elapsed)?;
        }

        tracing::info!(
            label = %report.label(),
            ips = report.ips(),
            stddev = report.stddev(),
            samples = report.samples(),
            "Report complete"
        );

        writeln!(self.writer, "{}", report.label()).map_err(io_error("writing report"))?;
        writeln!(
            self.writer,
            "  {:.1} i/s (±{:.2}%)",
            report.ips(),
            report.relative_stddev()
        )
        .map_err(io_error("writing report"))?;
        self.writer.flush().map_err(io_error("flushing report"))?;

        let index = self.reports.len();
        self.reports.push(report);
        Ok(&self.reports[index])
    }

    /// One baseline-subtracted sample in nanoseconds, after the degenerate policy.
    fn measure_sample<F>(&mut self, label: &str, repetitions: u64, op: &mut F) -> BenchResult<u64>
    where
        F: FnMut(&mut T),
    {
        let mut identity = |value: &mut T| {
            black_box(value);
        };
        let mut retries = 0;

        loop {
            let measured = self.time(repetitions, op).as_nanos();
            let baseline = self.time(repetitions, &mut identity).as_nanos();

            match resolve_degenerate(measured, baseline, self.config.degenerate, retries) {
                SampleStep::Record(elapsed) => return Ok(elapsed),
                SampleStep::Clamp(elapsed) => {
                    tracing::warn!(
                        label = %label,
                        measured_ns = %measured,
                        baseline_ns = %baseline,
                        "Baseline exceeded operation time, keeping unsubtracted sample"
                    );
                    return Ok(elapsed);
                }
                SampleStep::Retry => {
                    retries += 1;
                    tracing::warn!(
                        label = %label,
                        attempt = retries,
                        "Baseline exceeded operation time, re-measuring sample"
                    );
                }
                SampleStep::Fail => {
                    return Err(BenchError::measurement(
                        label,
                        format!(
                            "baseline ({}ns) was not faster than the operation ({}ns)",
                            baseline, measured
                        ),
                    ));
                }
            }
        }
    }

    /// Rank the reports, fastest first, and print the comparison table.
    ///
    /// The reordering of [`Job::reports`] is permanent.
    pub fn compare(&mut self) -> BenchResult<()> {
        if self.reports.is_empty() {
            writeln!(self.writer, "Nothing to compare!").map_err(io_error("writing comparison"))?;
            return Ok(());
        }

        self.reports.sort_by(|a, b| b.ips().total_cmp(&a.ips()));
        if let Some((fastest, rest)) = self.reports.split_first_mut() {
            fastest.clear_ratio();
            for report in rest.iter_mut() {
                report.slower_than(fastest);
            }
            tracing::info!(
                fastest = %fastest.label(),
                reports = rest.len() + 1,
                "Comparison complete"
            );
        }

        let table = self.comparison_table();
        self.writer
            .write_all(table.as_bytes())
            .map_err(io_error("writing comparison"))?;
        self.writer.flush().map_err(io_error("flushing comparison"))
    }

    fn comparison_table(&self) -> String {
        let label_width = self
            .reports
            .iter()
            .map(|r| r.label().chars().count())
            .max()
            .unwrap_or(0);
        let rates: Vec<String> = self
            .reports
            .iter()
            .map(|r| format!("{:.1}", r.ips()))
            .collect();
        let rate_width = rates.iter().map(String::len).max().unwrap_or(0);

        let mut table = String::from("\nComparison:\n");
        for (index, (report, rate)) in self.reports.iter().zip(&rates).enumerate() {
            table.push_str(&format!(
                "{:>lw$}: {:>rw$} i/s",
                report.label(),
                rate,
                lw = label_width,
                rw = rate_width
            ));
            match report.ratio() {
                Some(ratio) => table.push_str(&format!(" - {:.2}x slower", ratio)),
                None if index > 0 => table.push_str(" - same-ish: difference falls within error"),
                None => {}
            }
            table.push('\n');
        }
        table
    }

    /// Serializable snapshot of the session for export.
    pub fn summary(&self, suite: impl Into<String>) -> SuiteSummary {
        SuiteSummary::new(
            suite,
            self.inputs.len(),
            self.config,
            self.reports.iter().map(Report::summary).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn quick_config() -> JobConfig {
        JobConfig::default()
            .sample_count(3)
            .unwrap()
            .sample_duration_ns(500_000)
            .unwrap()
    }

    fn busy(value: &mut u64) {
        for i in 0..64u64 {
            *value = black_box(value.wrapping_mul(31).wrapping_add(i));
        }
    }

    fn output(job: Job<u64, Vec<u8>>) -> String {
        String::from_utf8(job.into_writer()).unwrap()
    }

    #[test]
    fn test_empty_inputs_rejected() {
        for config in [JobConfig::default(), quick_config().dup_inputs(true)] {
            let result = Job::<u64, _>::with_writer(Vec::new(), config, Vec::new());
            assert!(matches!(
                result,
                Err(BenchError::InvalidConfiguration(ConfigError::EmptyInputs))
            ));
        }
    }

    #[test]
    fn test_report_measures_throughput() {
        let mut job = Job::with_writer(vec![1u64, 2, 3], quick_config(), Vec::new()).unwrap();

        let report = job.report("busy", busy).unwrap();
        assert!(report.ips() > 0.0);
        assert!(report.ips().is_finite());
        assert_eq!(report.samples(), 3);
        assert_eq!(report.invocations_per_sample() % 3, 0);
        assert!(report.ratio().is_none());
        assert_eq!(job.reports().len(), 1);
    }

    #[test]
    fn test_report_output_format() {
        let mut job = Job::with_writer(vec![7u64], quick_config(), Vec::new()).unwrap();
        job.report("wrapping_mul", busy).unwrap();

        let text = output(job);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("wrapping_mul"));
        let stats = lines.next().unwrap();
        assert!(stats.starts_with("  "));
        assert!(stats.contains(" i/s (±"));
        assert!(stats.ends_with("%)"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_identity_operation_stays_finite() {
        let mut job = Job::with_writer(vec![0u64], quick_config(), Vec::new()).unwrap();

        let report = job
            .report("identity", |v: &mut u64| {
                black_box(v);
            })
            .unwrap();
        assert!(report.ips().is_finite());
        assert!(report.ips() > 0.0);
    }

    fn retry(attempts: u32) -> DegeneratePolicy {
        DegeneratePolicy::Retry {
            attempts: std::num::NonZeroU32::new(attempts).unwrap(),
        }
    }

    #[test]
    fn test_resolve_positive_difference() {
        for policy in [DegeneratePolicy::Clamp, retry(2), DegeneratePolicy::Fail] {
            assert_eq!(resolve_degenerate(1_500, 500, policy, 0), SampleStep::Record(1_000));
            assert_eq!(resolve_degenerate(1, 0, policy, 9), SampleStep::Record(1));
        }
        assert_eq!(
            resolve_degenerate(u128::MAX, 0, DegeneratePolicy::Fail, 0),
            SampleStep::Record(u64::MAX)
        );
    }

    #[test]
    fn test_resolve_clamp_keeps_operation_time() {
        let clamp = DegeneratePolicy::Clamp;
        assert_eq!(resolve_degenerate(800, 800, clamp, 0), SampleStep::Clamp(800));
        assert_eq!(resolve_degenerate(800, 5_000, clamp, 0), SampleStep::Clamp(800));
        assert_eq!(resolve_degenerate(0, 0, clamp, 0), SampleStep::Clamp(1));
    }

    #[test]
    fn test_resolve_retry_until_attempts_spent() {
        let policy = retry(2);
        assert_eq!(resolve_degenerate(700, 700, policy, 0), SampleStep::Retry);
        assert_eq!(resolve_degenerate(700, 900, policy, 1), SampleStep::Retry);
        assert_eq!(resolve_degenerate(700, 900, policy, 2), SampleStep::Fail);
    }

    #[test]
    fn test_resolve_fail_on_equal_times() {
        let fail = DegeneratePolicy::Fail;
        assert_eq!(resolve_degenerate(700, 700, fail, 0), SampleStep::Fail);
        assert_eq!(resolve_degenerate(700, 701, fail, 0), SampleStep::Fail);
        assert_eq!(resolve_degenerate(701, 700, fail, 0), SampleStep::Record(1));
    }

    #[test]
    fn test_estimate_scales_to_target() {
        let config = quick_config().sample_duration_ns(4_000_000).unwrap();
        let mut job = Job::with_writer(vec![()], config, Vec::new()).unwrap();

        let repetitions = job
            .estimate_repetitions("sleep", &mut |_: &mut ()| {
                std::thread::sleep(Duration::from_millis(1));
            })
            .unwrap();
        assert!((1..=4).contains(&repetitions), "got {}", repetitions);
    }

    #[test]
    fn test_set_dup_inputs_rebuilds_routine() {
        let mut job = Job::with_writer(vec![vec![0u8]], quick_config(), Vec::new()).unwrap();
        assert_eq!(job.routine().delivery(), crate::routine::Delivery::InPlace);

        job.set_dup_inputs(true);
        assert!(job.dup_inputs());
        assert_eq!(job.routine().delivery(), crate::routine::Delivery::Duplicate);

        job.report("push", |v: &mut Vec<u8>| v.push(1)).unwrap();
        assert_eq!(job.inputs(), &[vec![0u8]]);
    }

    #[test]
    fn test_collector_runs_once_per_report() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut job = Job::with_writer(vec![1u64], quick_config(), Vec::new())
            .unwrap()
            .with_collector(move || counter.set(counter.get() + 1));

        job.report("a", busy).unwrap();
        job.report("b", busy).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_compare_without_reports() {
        let mut job = Job::with_writer(vec![1u64], quick_config(), Vec::new()).unwrap();
        job.compare().unwrap();

        assert!(job.reports().is_empty());
        assert_eq!(output(job), "Nothing to compare!\n");
    }

    #[test]
    fn test_compare_ranks_and_formats() {
        let mut job = Job::with_writer(vec![1u64], quick_config(), Vec::new()).unwrap();
        for (label, samples) in [
            ("slow", [100.0, 100.0]),
            ("fastest", [400.0, 400.0]),
            ("close", [390.0, 410.0]),
        ] {
            let mut report = Report::new(label, 1);
            for ips in samples {
                report.add_throughput(ips).unwrap();
            }
            job.reports.push(report);
        }

        job.compare().unwrap();

        let labels: Vec<&str> = job.reports().iter().map(Report::label).collect();
        assert_eq!(labels, ["fastest", "close", "slow"]);
        assert_eq!(job.reports()[0].ratio(), None);
        assert_eq!(job.reports()[1].ratio(), None);
        assert!((job.reports()[2].ratio().unwrap() - 4.0).abs() < 1e-9);

        assert_eq!(
            output(job),
            "\nComparison:\n\
             fastest: 400.0 i/s\n  \
             close: 400.0 i/s - same-ish: difference falls within error\n   \
             slow: 100.0 i/s - 4.00x slower\n"
        );
    }

    #[test]
    fn test_compare_is_stable_for_ties() {
        let mut job = Job::with_writer(vec![1u64], quick_config(), Vec::new()).unwrap();
        for label in ["first", "second", "third"] {
            let mut report = Report::new(label, 1);
            report.add_throughput(50.0).unwrap();
            job.reports.push(report);
        }

        job.compare().unwrap();
        let labels: Vec<&str> = job.reports().iter().map(Report::label).collect();
        assert_eq!(labels, ["first", "second", "third"]);
        assert!(job.reports().iter().all(|r| r.ratio().is_none()));
    }
}
