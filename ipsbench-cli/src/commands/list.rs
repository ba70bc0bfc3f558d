// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `ipsbench list` command - List the built-in suites.

use crate::suites::Suite;

pub fn execute() -> anyhow::Result<()> {
    println!("╔══════════════╦═══════════════════════════════════════════════════════╗");
    println!("║ Suite        ║ Compares                                              ║");
    println!("╠══════════════╬═══════════════════════════════════════════════════════╣");

    for suite in Suite::ALL {
        println!("║ {:<12} ║ {:<53} ║", suite.name(), suite.description());
    }

    println!("╚══════════════╩═══════════════════════════════════════════════════════╝");
    println!();
    println!("Total: {} suite(s)", Suite::ALL.len());

    Ok(())
}
