//! Services implementing the scan pipeline: toolchain resolution, candidate
//! discovery and classification, introspection, listing parsing, and the
//! orchestrating runner.

pub mod classify;
pub mod inspect;
pub mod parse;
pub mod runner;
pub mod scan;
pub mod tools;

pub use classify::FileClassifier;
pub use inspect::{BenignPatterns, Introspector, ListingMode};
pub use parse::parse_listing;
pub use runner::{ScanObserver, ScanRunner, SilentObserver};
pub use scan::discover_candidates;
pub use tools::{Toolchain, DEFAULT_CUDA_BIN_DIR};

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the scan pipeline.
///
/// `DependencyMissing`, `InvalidInput`, and `DirectoryNotFound` are fatal to
/// a run. `ToolInvocation` is recoverable: the runner reports it and moves on
/// to the next file.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A required external tool could not be located or failed its probe.
    #[error("{tool} not usable: {detail}")]
    DependencyMissing { tool: &'static str, detail: String },

    /// The input path is neither an existing file nor an existing directory.
    #[error("Input path {0} is neither a file nor a directory")]
    InvalidInput(PathBuf),

    /// The scan root stopped being a directory before traversal started.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// An introspection invocation failed with output that is not benign.
    #[error("{tool} failed on {path}: {detail}")]
    ToolInvocation {
        tool: &'static str,
        path: PathBuf,
        detail: String,
    },
}
