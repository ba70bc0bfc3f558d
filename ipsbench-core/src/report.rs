// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Streaming throughput statistics for one measured operation.
//!
//! A [`Report`] never stores raw samples. Each sample is reduced to an
//! invocations-per-second figure and folded into a running mean and sum of
//! squared deviations (Welford's online algorithm).

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Accumulated throughput statistics and ranking state for one operation.
#[derive(Debug, Clone)]
pub struct Report {
    label: String,
    invocations_per_sample: u64,
    n: u64,
    mean: f64,
    m2: f64,
    /// Lazily computed standard deviation, cleared by every new sample.
    stddev: Cell<Option<f64>>,
    ratio: Option<f64>,
}

impl Report {
    /// Create an empty report for `invocations_per_sample` invocations per timed sample.
    pub fn new(label: impl Into<String>, invocations_per_sample: u64) -> Self {
        Self {
            label: label.into(),
            invocations_per_sample,
            n: 0,
            mean: 0.0,
            m2: 0.0,
            stddev: Cell::new(None),
            ratio: None,
        }
    }

    /// Fold one timed sample into the statistics.
    ///
    /// Returns the throughput derived from the sample. A zero elapsed time
    /// would mean infinite throughput and is rejected without touching the
    /// accumulated state.
    pub fn add_sample(&mut self, elapsed_ns: u64) -> BenchResult<f64> {
        if elapsed_ns == 0 {
            return Err(BenchError::measurement(
                &self.label,
                "sample elapsed time is zero",
            ));
        }
        let sample_ips = self.invocations_per_sample as f64 * NANOS_PER_SEC / elapsed_ns as f64;
        self.add_throughput(sample_ips)?;
        Ok(sample_ips)
    }

    /// Fold one throughput observation (invocations per second) into the statistics.
    pub fn add_throughput(&mut self, sample_ips: f64) -> BenchResult<()> {
        if !sample_ips.is_finite() || sample_ips <= 0.0 {
            return Err(BenchError::measurement(
                &self.label,
                format!("throughput {} is not a positive finite value", sample_ips),
            ));
        }

        self.n += 1;
        let delta = sample_ips - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (sample_ips - self.mean);
        self.stddev.set(None);
        Ok(())
    }

    /// Label the operation was registered under.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Invocations represented by one timed sample.
    pub fn invocations_per_sample(&self) -> u64 {
        self.invocations_per_sample
    }

    /// Number of samples folded in so far.
    pub fn samples(&self) -> u64 {
        self.n
    }

    /// Mean throughput in invocations per second.
    pub fn ips(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation of the throughput (Bessel-corrected).
    ///
    /// Exactly zero with fewer than two samples.
    pub fn stddev(&self) -> f64 {
        if let Some(cached) = self.stddev.get() {
            return cached;
        }
        let value = if self.n < 2 {
            0.0
        } else {
            (self.m2 / (self.n - 1) as f64).sqrt()
        };
        self.stddev.set(Some(value));
        value
    }

    /// Standard deviation as a percentage of the mean.
    pub fn relative_stddev(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.stddev() / self.mean * 100.0
        }
    }

    /// How many times slower than the fastest report, if significantly so.
    pub fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    /// Whether the one-sigma intervals of `fastest` and this report intersect.
    pub fn overlaps(&self, fastest: &Report) -> bool {
        fastest.ips() - fastest.stddev() <= self.ips() + self.stddev()
    }

    /// Rank this report against the fastest one.
    pub fn slower_than(&mut self, fastest: &Report) {
        self.ratio = if self.overlaps(fastest) {
            None
        } else {
            Some(fastest.ips() / self.ips())
        };
    }

    pub(crate) fn clear_ratio(&mut self) {
        self.ratio = None;
    }

    /// Serializable snapshot of the current statistics.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            label: self.label.clone(),
            invocations_per_sample: self.invocations_per_sample,
            samples: self.n,
            ips: self.ips(),
            stddev: self.stddev(),
            relative_stddev_pct: self.relative_stddev(),
            ratio: self.ratio,
        }
    }
}

/// Point-in-time view of a [`Report`], suitable for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub label: String,
    pub invocations_per_sample: u64,
    pub samples: u64,
    pub ips: f64,
    pub stddev: f64,
    pub relative_stddev_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}
