// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for ipsbench.
//!
//! Explicit enum error types only. No `Box<dyn Error>`, no `anyhow::Result`
//! inside the library - every failure a caller can observe is a variant here.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a benchmarking session.
#[derive(Debug, Error)]
pub enum BenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast, No Partial State
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Measurement Errors - Scoped to a Single `report` Call
    // =========================================================================
    #[error("Measurement failed for '{label}': {reason}")]
    Measurement { label: String, reason: String },

    // =========================================================================
    // Output Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Export(#[from] serde_json::Error),
}

impl BenchError {
    /// Shorthand for a measurement failure attributed to one report label.
    pub fn measurement(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Measurement {
            label: label.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration errors are raised synchronously at construction or load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Input sequence is empty - at least one input value is required")]
    EmptyInputs,

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown degenerate sample policy: {value} (expected clamp, retry or fail)")]
    UnknownPolicy { value: String },
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidFieldValue {
            field: "sample_count",
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        };
        assert!(err.to_string().contains("sample_count"));
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_error_chain() {
        let bench_err: BenchError = ConfigError::EmptyInputs.into();
        assert!(matches!(
            bench_err,
            BenchError::InvalidConfiguration(ConfigError::EmptyInputs)
        ));
    }

    #[test]
    fn test_measurement_display() {
        let err = BenchError::measurement("Vec::push", "repetition count overflow");
        assert_eq!(
            err.to_string(),
            "Measurement failed for 'Vec::push': repetition count overflow"
        );
    }
}
