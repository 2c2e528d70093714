//! archscan-core
//!
//! Core library for inventorying the CUDA SM architectures embedded in
//! compiled binaries (shared libraries, static archives, executables).
//!
//! This crate defines the report model, candidate discovery and
//! classification, the cuobjdump invocation layer, and the listing parser.
//! The actual device-code introspection is delegated to the CUDA toolkit's
//! own tools; nothing here parses binaries directly.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends.

pub mod model;
pub mod services;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
