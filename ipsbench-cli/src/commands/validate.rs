// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `ipsbench validate` command - Validate a job configuration file.

use std::path::Path;

use ipsbench_core::ConfigLoader;

pub fn execute(file: &Path) -> anyhow::Result<()> {
    tracing::info!(file = %file.display(), "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Job Settings:");
            println!("  Duplicate Inputs:   {}", config.dup_inputs);
            println!("  Samples:            {}", config.sample_count);
            println!("  Sample Duration:    {}", config.sample_duration);
            println!("  Degenerate Samples: {}", config.degenerate);
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
