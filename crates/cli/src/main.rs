use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cuda_arch_scan::commands::scan_command;

/// CUDA architecture inventory CLI.
///
/// This CLI is a thin wrapper around `archscan-core` (exposed in code as
/// `archscan_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "cuda-arch-scan",
    version,
    about = "Inventory the CUDA SM architectures embedded in compiled binaries",
    long_about = None
)]
struct Cli {
    /// Binary file to inspect, or directory tree to scan.
    path: PathBuf,

    /// Enable debug logging to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("archscan_core=debug,cuda_arch_scan=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    scan_command(&cli.path)
}
