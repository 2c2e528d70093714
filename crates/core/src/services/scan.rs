//! Candidate discovery across a directory tree.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::classify::FileClassifier;
use super::ScanError;

/// Walks `root` and returns the classifier-approved files in a deterministic
/// order (entries sorted by name at every level).
///
/// Directory symlinks are treated as leaves rather than followed, so link
/// cycles cannot trap the walk. Unreadable entries are skipped.
pub fn discover_candidates(
    root: &Path,
    classifier: &FileClassifier,
) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if classifier.is_candidate(entry.path()) {
            candidates.push(entry.into_path());
        }
    }

    debug!("{} candidate file(s) under {}", candidates.len(), root.display());
    Ok(candidates)
}
