// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! ipsbench CLI
//!
//! Runs the built-in comparison suites and validates job configuration files.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;
mod suites;

use suites::Suite;

/// ipsbench - iterations-per-second microbenchmark harness
#[derive(Parser)]
#[command(name = "ipsbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run comparison suites
    Run(RunArgs),

    /// List the built-in suites
    List,

    /// Validate a job configuration file
    Validate {
        /// Path to the YAML configuration file
        file: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Suites to run (all if not specified)
    #[arg(short, long, value_enum)]
    pub suite: Vec<Suite>,

    /// Job configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Samples per operation (overrides the configuration file)
    #[arg(long)]
    pub samples: Option<u32>,

    /// Target span of one sample in milliseconds (overrides the configuration file)
    #[arg(long)]
    pub duration_ms: Option<u64>,

    /// Duplicate inputs before every invocation
    #[arg(long)]
    pub dup: bool,

    /// Directory to write JSON results into
    #[arg(long)]
    pub json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report lines
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::List => commands::list::execute(),
        Commands::Validate { file } => commands::validate::execute(&file),
    }
}
