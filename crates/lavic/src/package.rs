// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lavic package` command implementation.
//!
//! Reads the model spreadsheet, runs every known row through the package
//! pipeline, and prints a per-package summary.

use std::io::IsTerminal;
use std::path::PathBuf;

use colored::Colorize;
use lavic_config::LavicConfig;
use lavic_packager::{BatchReport, Pipeline, SheetColumns, read_rows};
use tracing::info;

use crate::error::CliError;

pub async fn run_package(
    config: &LavicConfig,
    sheet: Option<PathBuf>,
    only: Option<String>,
) -> Result<(), CliError> {
    let sheet = sheet.unwrap_or_else(|| PathBuf::from(&config.packager.sheet_path));
    let rows = read_rows(&sheet, &SheetColumns::from(&config.packager))?;
    info!(sheet = %sheet.display(), rows = rows.len(), "spreadsheet loaded");

    let mut pipeline = Pipeline::from_config(config)?;
    if let Some(key) = only {
        pipeline = pipeline.only(key);
    }
    let report = pipeline.run(&rows).await;

    print_report(&report, std::io::stdout().is_terminal());
    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::BatchFailures {
            failed: report.failed.len(),
            attempted: report.failed.len() + report.packaged.len(),
        })
    }
}

fn print_report(report: &BatchReport, use_color: bool) {
    println!();
    println!("  lavic package");
    println!("  {}", "-".repeat(50));

    for (key, archive) in &report.packaged {
        let mark = if use_color { "ok".green().to_string() } else { "ok".to_string() };
        println!("  [{mark}]   {key:<12} {}", archive.display());
    }
    for (key, error) in &report.failed {
        let mark = if use_color { "FAIL".red().to_string() } else { "FAIL".to_string() };
        println!("  [{mark}] {key:<12} {error}");
    }

    println!("  {}", "-".repeat(50));
    println!(
        "  {} packaged, {} failed, {} skipped",
        report.packaged.len(),
        report.failed.len(),
        report.skipped.len()
    );
    println!();
}
