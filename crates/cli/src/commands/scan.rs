//! The scan command: resolve the toolchain, run the pipeline, render the
//! report.

use std::path::Path;

use anyhow::{Context, Result};

use archscan_core::model::ScanResult;
use archscan_core::services::{ScanRunner, Toolchain};

use crate::progress::TermReporter;

const RULE: &str = "----------------------------------------";

/// Scan `path` and render per-file architecture reports to stdout.
///
/// Directory scans are framed with a banner and a summary footer; a single
/// named file gets just its report block.
pub fn scan_command(path: &Path) -> Result<()> {
    let tools = Toolchain::resolve().context("Failed to resolve the CUDA binary toolchain")?;

    let scanning_directory = path.is_dir();
    if scanning_directory {
        println!("Scanning for CUDA device code in {}", path.display());
        println!("{RULE}");
    }

    let runner = ScanRunner::new(&tools);
    let mut reporter = TermReporter::new();
    let outcome = runner.run(path, &mut reporter);
    reporter.clear_progress();
    let result = outcome.with_context(|| format!("Failed to scan {}", path.display()))?;

    if result.total == 0 {
        println!("No matching binaries to check.");
    } else if result.reports.is_empty() {
        println!("No CUDA architectures found.");
    }

    if scanning_directory {
        print_summary(&result);
    }

    Ok(())
}

fn print_summary(result: &ScanResult) {
    println!("{RULE}");
    println!(
        "Checked {} file(s); found CUDA device code in {}.",
        result.total,
        result.found()
    );
}
