//! Shared types for the farspace floating-origin core.
//!
//! # Invariants
//! - Types here carry no behaviour that depends on world state.
//! - Every persisted value is plain data (`serde`), loaded and saved by the scene crate.

mod config;
mod length;
mod types;

pub use config::SpaceConfig;
pub use length::{Length, LengthUnit, ParseLengthUnitError};
pub use types::BodyId;

pub fn crate_info() -> &'static str {
    "farspace-common v0.1.0"
}
