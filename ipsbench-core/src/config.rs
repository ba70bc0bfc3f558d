// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Job configuration with strict validation.
//!
//! Settings can be built in code or loaded from YAML. Any invalid field
//! results in a `ConfigError` before a single measurement is taken.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult, ConfigError};
use crate::types::{
    DegeneratePolicy, SampleCount, SampleDuration, DEFAULT_RETRY_ATTEMPTS, DEFAULT_SAMPLE_COUNT,
    DEFAULT_SAMPLE_DURATION_NS,
};

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawJobConfig {
    #[serde(default)]
    dup_inputs: bool,
    #[serde(default = "default_sample_count")]
    sample_count: u32,
    #[serde(default = "default_sample_duration_ns")]
    sample_duration_ns: u64,
    #[serde(default = "default_policy")]
    degenerate_samples: String,
    #[serde(default = "default_retry_attempts")]
    retry_attempts: u32,
}

/// Longest sample span accepted from configuration files: one minute.
const MAX_CONFIG_SAMPLE_DURATION_NS: u64 = 60_000_000_000;

fn default_sample_count() -> u32 {
    DEFAULT_SAMPLE_COUNT
}

fn default_sample_duration_ns() -> u64 {
    DEFAULT_SAMPLE_DURATION_NS
}

fn default_policy() -> String {
    "clamp".to_string()
}

fn default_retry_attempts() -> u32 {
    DEFAULT_RETRY_ATTEMPTS
}

/// Validated settings for one benchmarking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobConfig {
    /// Clone every input right before each invocation.
    pub dup_inputs: bool,
    /// Timed samples per registered operation.
    pub sample_count: SampleCount,
    /// Target wall-time span of one sample.
    pub sample_duration: SampleDuration,
    /// Recovery for samples whose baseline-subtracted time is not positive.
    pub degenerate: DegeneratePolicy,
}

impl JobConfig {
    /// Set whether inputs are duplicated before every invocation.
    pub fn dup_inputs(mut self, dup: bool) -> Self {
        self.dup_inputs = dup;
        self
    }

    /// Set the number of samples per operation.
    pub fn sample_count(mut self, count: u32) -> Result<Self, ConfigError> {
        self.sample_count = SampleCount::new(count)?;
        Ok(self)
    }

    /// Set the target span of one sample in nanoseconds.
    pub fn sample_duration_ns(mut self, nanos: u64) -> Result<Self, ConfigError> {
        self.sample_duration = SampleDuration::from_nanos(nanos)?;
        Ok(self)
    }

    /// Set the degenerate sample policy.
    pub fn degenerate(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate = policy;
        self
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> BenchResult<JobConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BenchError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> BenchResult<JobConfig> {
        let raw: RawJobConfig =
            serde_yaml::from_str(content).map_err(|e| BenchError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Ok(Self::validate(raw)?)
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawJobConfig) -> Result<JobConfig, ConfigError> {
        let sample_count = SampleCount::new(raw.sample_count)?;
        if raw.sample_duration_ns > MAX_CONFIG_SAMPLE_DURATION_NS {
            return Err(ConfigError::InvalidFieldValue {
                field: "sample_duration_ns",
                value: raw.sample_duration_ns.to_string(),
                reason: format!(
                    "Sample duration must not exceed {}ns (one minute)",
                    MAX_CONFIG_SAMPLE_DURATION_NS
                ),
            });
        }
        let sample_duration = SampleDuration::from_nanos(raw.sample_duration_ns)?;
        let degenerate = DegeneratePolicy::parse(&raw.degenerate_samples, raw.retry_attempts)?;

        Ok(JobConfig {
            dup_inputs: raw.dup_inputs,
            sample_count,
            sample_duration,
            degenerate,
        })
    }
}
