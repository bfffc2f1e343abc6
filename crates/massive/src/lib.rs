//! Massive bodies: distance compression toward a render horizon.
//!
//! # Invariants
//! - Distances below half the horizon are untouched.
//! - Every finite distance compresses to strictly less than the horizon.
//! - Position and size shrink by the same factor, so apparent angular size
//!   is preserved.
//! - Compression changes only render output, never truth-space positions.

mod compressor;
mod scale;

pub use compressor::{Compression, DistanceCompressor, compress_distance};
pub use scale::{MassiveRender, MassiveScale, MassiveState};

pub fn crate_info() -> &'static str {
    "farspace-massive v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("massive"));
    }
}
