//! Resolution of the external CUDA introspection tools.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::ScanError;

/// Install directory checked when a tool is absent from `PATH`.
pub const DEFAULT_CUDA_BIN_DIR: &str = "/usr/local/cuda/bin";

/// Resolved locations of the tools the scanner shells out to.
///
/// `cuobjdump` produces the section listings; `nvdisasm` is its companion
/// disassembler, present in every usable toolkit install. Both are probed
/// up front; a broken install is fatal before any scanning starts.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub cuobjdump: PathBuf,
    pub nvdisasm: PathBuf,
}

impl Toolchain {
    /// Locates `cuobjdump` and `nvdisasm`, preferring `PATH` over the fixed
    /// CUDA install directory, and verifies both answer a `--version` probe.
    /// Any failure here is fatal for the run.
    pub fn resolve() -> Result<Self, ScanError> {
        let cuobjdump = locate_tool("cuobjdump")?;
        let nvdisasm = locate_tool("nvdisasm")?;

        let version = probe_version("cuobjdump", &cuobjdump)?;
        debug!("using cuobjdump at {} ({version})", cuobjdump.display());
        let version = probe_version("nvdisasm", &nvdisasm)?;
        debug!("using nvdisasm at {} ({version})", nvdisasm.display());

        Ok(Self { cuobjdump, nvdisasm })
    }

    /// Builds a toolchain from explicit paths, skipping discovery and the
    /// version probes.
    pub fn with_paths(cuobjdump: impl Into<PathBuf>, nvdisasm: impl Into<PathBuf>) -> Self {
        Self { cuobjdump: cuobjdump.into(), nvdisasm: nvdisasm.into() }
    }
}

fn locate_tool(name: &'static str) -> Result<PathBuf, ScanError> {
    if let Some(found) = find_in_path(name) {
        return Ok(found);
    }
    let fallback = Path::new(DEFAULT_CUDA_BIN_DIR).join(name);
    if fallback.is_file() {
        return Ok(fallback);
    }
    Err(ScanError::DependencyMissing {
        tool: name,
        detail: format!("not found on PATH or in {DEFAULT_CUDA_BIN_DIR}"),
    })
}

fn find_in_path(executable: &str) -> Option<PathBuf> {
    env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths).find_map(|p| {
            let candidate = p.join(executable);
            if candidate.is_file() {
                Some(candidate)
            } else {
                None
            }
        })
    })
}

/// Runs `<tool> --version` and returns the first line of its output.
fn probe_version(name: &'static str, path: &Path) -> Result<String, ScanError> {
    let output = Command::new(path).arg("--version").output().map_err(|e| {
        ScanError::DependencyMissing {
            tool: name,
            detail: format!("failed to execute {}: {e}", path.display()),
        }
    })?;
    if !output.status.success() {
        return Err(ScanError::DependencyMissing {
            tool: name,
            detail: format!("version probe exited with {}", output.status),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next().unwrap_or("").trim().to_string();
    if first.is_empty() {
        return Err(ScanError::DependencyMissing {
            tool: name,
            detail: "version probe produced no output".to_string(),
        });
    }
    Ok(first)
}
