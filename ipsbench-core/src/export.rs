// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! JSON export of finished benchmarking sessions.
//!
//! Results are written to timestamped files so runs on different machines or
//! commits can be compared later.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use crate::config::JobConfig;
use crate::error::{BenchError, BenchResult};
use crate::report::ReportSummary;

/// Machine the session ran on. Throughput figures are only comparable
/// between runs with matching CPU details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// OS name and release, e.g. "Linux 22.04 Ubuntu".
    pub os: String,
    pub kernel_version: Option<String>,
    /// Target architecture the harness was compiled for.
    pub arch: String,
    pub cpu_model: String,
    pub cpu_cores: usize,
    /// Reported frequency of the first core; 0 when unknown.
    pub cpu_frequency_mhz: u64,
    pub memory_bytes: u64,
}

impl SystemInfo {
    /// Collect CPU and memory details, skipping process and disk scans.
    pub fn collect() -> Self {
        let sys = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );
        let first_cpu = sys.cpus().first();

        Self {
            os: System::long_os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            arch: std::env::consts::ARCH.to_string(),
            cpu_model: first_cpu
                .map(|cpu| cpu.brand().trim().to_string())
                .filter(|brand| !brand.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            cpu_frequency_mhz: first_cpu.map(|cpu| cpu.frequency()).unwrap_or(0),
            memory_bytes: sys.total_memory(),
        }
    }
}

/// Everything measured in one session, in ranked order if compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub suite: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    pub inputs: usize,
    pub config: JobConfig,
    pub reports: Vec<ReportSummary>,
}

impl SuiteSummary {
    pub fn new(
        suite: impl Into<String>,
        inputs: usize,
        config: JobConfig,
        reports: Vec<ReportSummary>,
    ) -> Self {
        Self {
            suite: suite.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            inputs,
            config,
            reports,
        }
    }

    /// The fastest report, if the session was ranked.
    pub fn fastest(&self) -> Option<&ReportSummary> {
        self.reports.first()
    }
}

/// Writes session summaries as pretty-printed JSON files.
pub struct JsonExporter {
    output_dir: PathBuf,
}

impl JsonExporter {
    /// Create an exporter rooted at `output_dir`, creating it if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> BenchResult<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).map_err(|e| BenchError::Io {
            context: "creating output directory",
            source: e,
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save a summary as `<suite>_<timestamp>.json` and return its path.
    pub fn save(&self, summary: &SuiteSummary) -> BenchResult<PathBuf> {
        let timestamp = summary.timestamp.format("%Y-%m-%dT%H-%M-%S%.3fZ");
        let suite: String = summary
            .suite
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let filepath = self.output_dir.join(format!("{}_{}.json", suite, timestamp));

        let file = File::create(&filepath).map_err(|e| BenchError::Io {
            context: "creating results file",
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), summary)?;

        tracing::info!(path = %filepath.display(), "Saved results");
        Ok(filepath)
    }

    /// List every JSON file in the output directory, sorted by name.
    pub fn list(&self) -> BenchResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.output_dir).map_err(|e| BenchError::Io {
            context: "listing output directory",
            source: e,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| BenchError::Io {
                    context: "listing output directory",
                    source: e,
                })?
                .path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Load a previously saved summary.
    pub fn load(path: impl AsRef<Path>) -> BenchResult<SuiteSummary> {
        let file = File::open(path).map_err(|e| BenchError::Io {
            context: "opening results file",
            source: e,
        })?;
        Ok(serde_json::from_reader(file)?)
    }
}
