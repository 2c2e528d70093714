//! Core data model for architecture-inventory reports.
//!
//! Everything here is a plain value created fresh per scan. Nothing is
//! persisted across runs.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A normalized GPU architecture token as the CUDA toolchain spells it,
/// e.g. `sm_80` or `sm_90a`.
///
/// Ordering is natural rather than lexicographic: the numeric component
/// compares first and the full token string breaks ties, so
/// `sm_9` < `sm_80` < `sm_90` < `sm_90a` < `sm_100`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SmArch(String);

impl SmArch {
    /// Wraps a token already known to have the `sm_<digits><suffix>` shape.
    /// The listing parser is the only producer of these.
    pub(crate) fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        debug_assert!(token.starts_with("sm_") && token.len() > 3);
        Self(token)
    }

    /// The full token string (`sm_90a`).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the digit run after `sm_` (`90` for `sm_90a`).
    pub fn number(&self) -> u64 {
        self.0[3..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .fold(0u64, |n, c| n.saturating_mul(10).saturating_add(u64::from(c as u8 - b'0')))
    }
}

impl Ord for SmArch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number().cmp(&other.number()).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SmArch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SmArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One architecture paired with its occurrence count within a listing.
///
/// `ir` records that the entry came from the PTX (intermediate
/// representation) listing. It only affects display; entries from the two
/// listing modes are never merged with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchCount {
    pub arch: SmArch,
    pub count: usize,
    pub ir: bool,
}

impl fmt::Display for ArchCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.count, self.arch)?;
        if self.ir {
            write!(f, " (IR)")?;
        }
        Ok(())
    }
}

/// Per-file inventory of embedded architectures: compiled-code entries
/// first, IR entries last.
///
/// Only produced when at least one entry exists; a file without device code
/// yields no report at all rather than an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub entries: Vec<ArchCount>,
}

impl FileReport {
    /// Builds a report, or `None` when there are no entries.
    pub fn new(path: impl Into<PathBuf>, entries: Vec<ArchCount>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { path: path.into(), entries })
        }
    }
}

/// Aggregate outcome of one scan run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Number of candidate files processed.
    pub total: usize,
    /// Reports for the files that carried device code, in discovery order.
    pub reports: Vec<FileReport>,
}

impl ScanResult {
    /// Number of files that yielded at least one architecture entry.
    pub fn found(&self) -> usize {
        self.reports.len()
    }
}
