//! Introspection of a single file: invoke cuobjdump in both listing modes,
//! classify the outcome, and assemble the per-file report.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::model::FileReport;

use super::parse::parse_listing;
use super::tools::Toolchain;
use super::ScanError;

/// The two listing views taken per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    /// Embedded compiled (ELF) device code.
    Elf,
    /// Embedded PTX intermediate representation.
    Ptx,
}

impl ListingMode {
    pub fn flag(self) -> &'static str {
        match self {
            ListingMode::Elf => "-lelf",
            ListingMode::Ptx => "-lptx",
        }
    }
}

/// Line patterns that make a nonzero cuobjdump exit benign.
///
/// cuobjdump walks static archives member by member and exits nonzero when a
/// member carries no device code, even though the rest of the listing is
/// valid. A nonzero run whose output consists only of blank lines, member
/// headers, and no-device-code notices is treated as informative and still
/// parsed. The patterns are plain data; cuobjdump's wording has shifted
/// across toolkit releases.
#[derive(Debug, Clone)]
pub struct BenignPatterns {
    /// Substrings that mark a diagnostic line as a benign notice.
    pub notices: Vec<String>,
    /// Prefix of archive-member header lines.
    pub member_prefix: String,
}

impl Default for BenignPatterns {
    fn default() -> Self {
        Self {
            notices: vec!["does not contain device code".to_string()],
            member_prefix: "member".to_string(),
        }
    }
}

impl BenignPatterns {
    /// A line is benign when, after trimming, it is empty, an archive-member
    /// header, or a known notice.
    fn line_is_benign(&self, line: &str) -> bool {
        let line = line.trim();
        line.is_empty()
            || line.starts_with(&self.member_prefix)
            || self.notices.iter().any(|marker| line.contains(marker.as_str()))
    }

    fn all_benign(&self, text: &str) -> bool {
        text.lines().all(|line| self.line_is_benign(line))
    }
}

/// Classified result of one cuobjdump invocation.
#[derive(Debug)]
enum ToolOutcome {
    /// Zero exit; the output is a regular listing.
    Success(String),
    /// Nonzero exit, but every output line is benign. The text is still
    /// parsed; it may list valid sections for other archive members.
    Benign(String),
    /// Nonzero exit with output that is not benign.
    Failure(String),
}

/// Runs the two listing views against one file and assembles its report.
pub struct Introspector<'a> {
    tools: &'a Toolchain,
    benign: BenignPatterns,
}

impl<'a> Introspector<'a> {
    pub fn new(tools: &'a Toolchain) -> Self {
        Self { tools, benign: BenignPatterns::default() }
    }

    pub fn with_benign_patterns(tools: &'a Toolchain, benign: BenignPatterns) -> Self {
        Self { tools, benign }
    }

    /// Inspects one file.
    ///
    /// `Ok(None)` means neither listing carried a token, the normal outcome
    /// for an ordinary host binary. `Err` means an invocation failed for
    /// real; the caller decides whether that aborts the run.
    pub fn inspect(&self, path: &Path) -> Result<Option<FileReport>, ScanError> {
        let ptx = self.listing(path, ListingMode::Ptx)?;
        let elf = self.listing(path, ListingMode::Elf)?;

        let mut entries = parse_listing(&elf);
        let mut ir_entries = parse_listing(&ptx);
        for entry in &mut ir_entries {
            entry.ir = true;
        }
        entries.extend(ir_entries);

        Ok(FileReport::new(path, entries))
    }

    /// One cuobjdump invocation; returns the captured text unless the run
    /// failed with non-benign output.
    fn listing(&self, path: &Path, mode: ListingMode) -> Result<String, ScanError> {
        let output = Command::new(&self.tools.cuobjdump)
            .arg(mode.flag())
            .arg(path)
            .output()
            .map_err(|e| ScanError::ToolInvocation {
                tool: "cuobjdump",
                path: path.to_path_buf(),
                detail: format!("failed to spawn {}: {e}", self.tools.cuobjdump.display()),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut combined = stdout.into_owned();
        if !stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&stderr);
        }

        match self.classify(output.status.success(), combined) {
            ToolOutcome::Success(text) => Ok(text),
            ToolOutcome::Benign(text) => {
                debug!(
                    "cuobjdump {} on {} exited nonzero with benign output",
                    mode.flag(),
                    path.display()
                );
                Ok(text)
            }
            ToolOutcome::Failure(text) => Err(ScanError::ToolInvocation {
                tool: "cuobjdump",
                path: path.to_path_buf(),
                detail: text.trim().to_string(),
            }),
        }
    }

    fn classify(&self, success: bool, text: String) -> ToolOutcome {
        if success {
            ToolOutcome::Success(text)
        } else if self.benign.all_benign(&text) {
            ToolOutcome::Benign(text)
        } else {
            ToolOutcome::Failure(text)
        }
    }
}
