//! Parsing of captured listing output into counted architecture records.
//!
//! The listings name embedded sections after their target architecture
//! (`kernel.1.sm_86.cubin`, `kernel.2.sm_90.ptx`), so the parser only has to
//! pull the `sm_` token out of each line and tally the results. It never
//! inspects binaries itself.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{ArchCount, SmArch};

/// Architecture token: `sm_`, a digit run, and an optional variant letter.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"sm_[0-9]+[a-z]?").expect("token pattern is valid"))
}

/// Extracts at most one token per line.
///
/// The last match on a line wins: section names put the architecture
/// component at the end (`gpu.2.sm_90a.cubin`), and anything before it is
/// tooling noise. Lines without a match contribute nothing.
fn extract_tokens(raw: &str) -> Vec<SmArch> {
    raw.lines()
        .filter_map(|line| token_pattern().find_iter(line).last())
        .map(|m| SmArch::new(m.as_str()))
        .collect()
}

/// Sorts tokens into natural order and collapses adjacent duplicates.
fn tally(mut tokens: Vec<SmArch>) -> Vec<ArchCount> {
    tokens.sort();
    let mut counts: Vec<ArchCount> = Vec::new();
    for token in tokens {
        match counts.last_mut() {
            Some(last) if last.arch == token => last.count += 1,
            _ => counts.push(ArchCount { arch: token, count: 1, ir: false }),
        }
    }
    counts
}

/// Parses one captured listing into ordered, counted architecture records.
///
/// An empty result is the normal outcome for a file without device code,
/// not an error. Entries come back with `ir` unset; the caller flags them
/// when the listing was taken in IR mode.
pub fn parse_listing(raw: &str) -> Vec<ArchCount> {
    tally(extract_tokens(raw))
}
