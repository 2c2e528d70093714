//! Terminal rendering of scan notifications: a transient progress line,
//! per-file report blocks, and per-file errors.

use std::io::{self, Write};
use std::path::Path;

use archscan_core::model::FileReport;
use archscan_core::services::{ScanError, ScanObserver};

/// Renders scan progress and results to the terminal.
///
/// The progress line is redrawn in place with a carriage return and padded
/// with spaces to cover whatever the previous draw left behind. It is always
/// cleared before a report block or an error line, so finished output never
/// interleaves with transient text.
pub struct TermReporter {
    progress_len: usize,
}

impl TermReporter {
    pub fn new() -> Self {
        Self { progress_len: 0 }
    }

    /// Blanks out any pending progress line.
    pub fn clear_progress(&mut self) {
        if self.progress_len > 0 {
            print!("\r{}\r", " ".repeat(self.progress_len));
            io::stdout().flush().ok();
            self.progress_len = 0;
        }
    }

    fn show_progress(&mut self, text: &str) {
        let width = text.chars().count();
        let pad = self.progress_len.saturating_sub(width);
        print!("\r{text}{}", " ".repeat(pad));
        io::stdout().flush().ok();
        self.progress_len = width;
    }
}

impl Default for TermReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanObserver for TermReporter {
    fn progress(&mut self, index: usize, total: usize, path: &Path) {
        self.show_progress(&format!("[{index}/{total}] Processing {}", path.display()));
    }

    fn report(&mut self, report: &FileReport) {
        self.clear_progress();
        println!("File: {}", report.path.display());
        for entry in &report.entries {
            println!("  {entry}");
        }
    }

    fn file_error(&mut self, _path: &Path, error: &ScanError) {
        self.clear_progress();
        eprintln!("{error}");
    }
}
