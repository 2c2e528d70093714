//! cuda-arch-scan
//!
//! Terminal frontend for `archscan-core`. All substantive scanning logic
//! lives in the library; this crate parses arguments, wires up logging, and
//! renders reports and progress to the terminal.

pub mod commands;
pub mod progress;
