//! Developer tooling: read-only inspection of a universe.
//!
//! # Invariants
//! - Inspection never mutates the universe or drains its event log.

pub mod inspector;

pub use inspector::{BodyInfo, UniverseInspector, UniverseSummary};

pub fn crate_info() -> &'static str {
    "farspace-tools v0.1.0"
}
