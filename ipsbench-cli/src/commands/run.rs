// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `ipsbench run` command - Run comparison suites.

use std::io;

use ipsbench_core::{ConfigLoader, JobConfig, JsonExporter};

use crate::suites::Suite;
use crate::RunArgs;

/// Resolve the job settings: configuration file first, then flag overrides.
pub fn resolve_config(args: &RunArgs) -> anyhow::Result<JobConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_file(path)?,
        None => JobConfig::default(),
    };

    if let Some(samples) = args.samples {
        config = config.sample_count(samples)?;
    }
    if let Some(millis) = args.duration_ms {
        config = config.sample_duration_ns(millis.saturating_mul(1_000_000))?;
    }
    if args.dup {
        config = config.dup_inputs(true);
    }

    Ok(config)
}

pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let suites = if args.suite.is_empty() {
        Suite::ALL.to_vec()
    } else {
        args.suite.clone()
    };
    let exporter = args.json.as_ref().map(JsonExporter::new).transpose()?;

    println!("ipsbench");
    println!("========");
    println!(
        "Samples: {}, sample duration: {}, duplicate inputs: {}",
        config.sample_count, config.sample_duration, config.dup_inputs
    );

    for suite in suites {
        println!();
        println!("== {} ==", suite.name());
        let summary = suite.run(config, io::stdout())?;

        if let Some(exporter) = &exporter {
            let path = exporter.save(&summary)?;
            println!();
            println!("Results saved to: {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_without_flags() {
        let config = resolve_config(&RunArgs::default()).unwrap();
        assert_eq!(config, JobConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("job.yaml");
        std::fs::write(&path, "sample_count: 7\nsample_duration_ns: 3000000\n").unwrap();

        let args = RunArgs {
            config: Some(path),
            samples: Some(2),
            dup: true,
            ..RunArgs::default()
        };
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.sample_count.value(), 2);
        assert_eq!(config.sample_duration.as_nanos(), 3_000_000);
        assert!(config.dup_inputs);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = RunArgs {
            samples: Some(0),
            ..RunArgs::default()
        };
        assert!(resolve_config(&args).is_err());

        let args = RunArgs {
            config: Some(PathBuf::from("/nonexistent/job.yaml")),
            ..RunArgs::default()
        };
        assert!(resolve_config(&args).is_err());
    }
}
