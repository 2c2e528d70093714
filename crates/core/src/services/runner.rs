//! The scan orchestrator: validates the input path, drives discovery and
//! introspection, and streams progress through an observer.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::{FileReport, ScanResult};

use super::classify::FileClassifier;
use super::inspect::Introspector;
use super::scan::discover_candidates;
use super::tools::Toolchain;
use super::ScanError;

/// Notifications emitted while a scan runs.
///
/// Every method defaults to a no-op so callers implement only what they
/// render. Calls arrive strictly in processing order from a single thread.
pub trait ScanObserver {
    /// Announced before each file is inspected. `index` is 1-based.
    fn progress(&mut self, index: usize, total: usize, path: &Path) {
        let _ = (index, total, path);
    }

    /// A file produced at least one architecture entry.
    fn report(&mut self, report: &FileReport) {
        let _ = report;
    }

    /// A recoverable per-file failure; the run continues without the file.
    fn file_error(&mut self, path: &Path, error: &ScanError) {
        let _ = (path, error);
    }
}

/// Observer that ignores every notification.
pub struct SilentObserver;

impl ScanObserver for SilentObserver {}

/// Sequential scan driver. Candidates are processed one at a time in
/// discovery order; results for a given run are reproducible on an
/// unchanged tree.
pub struct ScanRunner<'a> {
    introspector: Introspector<'a>,
    classifier: FileClassifier,
}

impl<'a> ScanRunner<'a> {
    pub fn new(tools: &'a Toolchain) -> Self {
        Self { introspector: Introspector::new(tools), classifier: FileClassifier::default() }
    }

    /// Assembles a runner from preconfigured parts.
    pub fn with_parts(introspector: Introspector<'a>, classifier: FileClassifier) -> Self {
        Self { introspector, classifier }
    }

    /// Scans a single file or a directory tree.
    ///
    /// A file input is inspected directly, bypassing classification. A
    /// directory input is walked for candidates first. Anything else is
    /// `InvalidInput`.
    ///
    /// Per-file introspection failures are surfaced through the observer and
    /// skipped; they never abort the run.
    pub fn run(
        &self,
        input: &Path,
        observer: &mut dyn ScanObserver,
    ) -> Result<ScanResult, ScanError> {
        if input.is_file() {
            return Ok(self.process(vec![input.to_path_buf()], observer));
        }
        if !input.is_dir() {
            return Err(ScanError::InvalidInput(input.to_path_buf()));
        }

        let candidates = discover_candidates(input, &self.classifier)?;
        Ok(self.process(candidates, observer))
    }

    fn process(&self, candidates: Vec<PathBuf>, observer: &mut dyn ScanObserver) -> ScanResult {
        let total = candidates.len();
        let mut reports = Vec::new();

        for (index, path) in candidates.iter().enumerate() {
            observer.progress(index + 1, total, path);
            match self.introspector.inspect(path) {
                Ok(Some(report)) => {
                    observer.report(&report);
                    reports.push(report);
                }
                Ok(None) => debug!("no device code in {}", path.display()),
                Err(error) => observer.file_error(path, &error),
            }
        }

        ScanResult { total, reports }
    }
}
