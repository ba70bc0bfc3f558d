// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated session settings.
//!
//! Every type checks its invariant at creation time, so a `JobConfig` built
//! from them can never describe an impossible measurement.

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of timed samples per operation.
pub const DEFAULT_SAMPLE_COUNT: u32 = 10;
/// Default wall-time span of a single sample: 200 ms.
pub const DEFAULT_SAMPLE_DURATION_NS: u64 = 200_000_000;
/// Default number of re-measurements under [`DegeneratePolicy::Retry`].
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Number of timed samples collected per registered operation.
/// Must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SampleCount(u32);

impl SampleCount {
    /// Create a new SampleCount with validation.
    pub fn new(count: u32) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::InvalidFieldValue {
                field: "sample_count",
                value: "0".to_string(),
                reason: "At least one sample is required".to_string(),
            });
        }
        Ok(Self(count))
    }

    /// Get the inner count.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for SampleCount {
    fn default() -> Self {
        Self(DEFAULT_SAMPLE_COUNT)
    }
}

impl fmt::Display for SampleCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for SampleCount {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SampleCount> for u32 {
    fn from(count: SampleCount) -> Self {
        count.0
    }
}

/// Desired wall-time span of one timed sample, in nanoseconds.
/// Must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SampleDuration(u64);

impl SampleDuration {
    /// Create a new SampleDuration from nanoseconds.
    pub fn from_nanos(nanos: u64) -> Result<Self, ConfigError> {
        if nanos == 0 {
            return Err(ConfigError::InvalidFieldValue {
                field: "sample_duration_ns",
                value: "0".to_string(),
                reason: "Sample duration must be greater than 0".to_string(),
            });
        }
        Ok(Self(nanos))
    }

    /// Create from milliseconds for convenience.
    pub fn from_millis(millis: u64) -> Result<Self, ConfigError> {
        Self::from_nanos(millis.saturating_mul(1_000_000))
    }

    /// Get the span in nanoseconds.
    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Get the span as a `Duration`.
    pub fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.0)
    }
}

impl Default for SampleDuration {
    fn default() -> Self {
        Self(DEFAULT_SAMPLE_DURATION_NS)
    }
}

impl fmt::Display for SampleDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1_000_000 == 0 {
            write!(f, "{}ms", self.0 / 1_000_000)
        } else {
            write!(f, "{}ns", self.0)
        }
    }
}

impl TryFrom<u64> for SampleDuration {
    type Error = ConfigError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_nanos(value)
    }
}

impl From<SampleDuration> for u64 {
    fn from(duration: SampleDuration) -> Self {
        duration.0
    }
}

/// What to do when baseline subtraction leaves a sample with no positive time.
///
/// The operation and identity runs are timed separately, so scheduler jitter
/// can push the identity run past the operation run for very cheap operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Record the operation's own time for that sample, without subtraction.
    ///
    /// The sample then under-reports throughput slightly instead of
    /// collapsing towards zero elapsed time and dominating the mean.
    Clamp,
    /// Re-measure up to `attempts` times, then fail the report.
    Retry { attempts: NonZeroU32 },
    /// Fail the report immediately.
    Fail,
}

impl DegeneratePolicy {
    /// Parse a policy name as it appears in configuration files.
    pub fn parse(name: &str, attempts: u32) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "fail" => Ok(Self::Fail),
            "retry" => {
                let attempts =
                    NonZeroU32::new(attempts).ok_or_else(|| ConfigError::InvalidFieldValue {
                        field: "retry_attempts",
                        value: "0".to_string(),
                        reason: "Retry policy needs at least one attempt".to_string(),
                    })?;
                Ok(Self::Retry { attempts })
            }
            _ => Err(ConfigError::UnknownPolicy {
                value: name.to_string(),
            }),
        }
    }
}

impl Default for DegeneratePolicy {
    fn default() -> Self {
        Self::Clamp
    }
}

impl fmt::Display for DegeneratePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegeneratePolicy::Clamp => write!(f, "clamp"),
            DegeneratePolicy::Retry { attempts } => write!(f, "retry({})", attempts),
            DegeneratePolicy::Fail => write!(f, "fail"),
        }
    }
}
