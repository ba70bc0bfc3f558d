//! ipsbench Core Library
//!
//! Measures how many times per second each candidate operation can run over a
//! fixed set of inputs, then ranks the candidates. Provides the specialized
//! timing loop, repetition estimation, streaming statistics, comparison with a
//! one-sigma tie-break, configuration loading and JSON export.
//!
//! ```no_run
//! use ipsbench_core::Job;
//!
//! let mut job = Job::new(vec![10u64, 20, 30])?;
//! job.report("checked_add", |v: &mut u64| {
//!     std::hint::black_box(v.checked_add(1));
//! })?;
//! job.report("saturating_add", |v: &mut u64| {
//!     std::hint::black_box(v.saturating_add(1));
//! })?;
//! job.compare()?;
//! # Ok::<(), ipsbench_core::BenchError>(())
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod job;
pub mod report;
pub mod routine;
pub mod types;

// Re-export commonly used types
pub use collector::{Collector, NoCollection};
pub use config::{ConfigLoader, JobConfig};
pub use error::{BenchError, BenchResult, ConfigError};
pub use export::{JsonExporter, SuiteSummary, SystemInfo};
pub use job::Job;
pub use report::{Report, ReportSummary};
pub use routine::{Delivery, SlotLayout, TimingRoutine, MAX_UNROLLED_SLOTS};
pub use types::{DegeneratePolicy, SampleCount, SampleDuration};
