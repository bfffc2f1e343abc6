//! Floating-origin positions.
//!
//! A position is an integer sector plus a small double-precision local
//! offset. Arithmetic works on the sector difference and local difference
//! separately so nothing ever holds a large absolute coordinate in a single
//! float.
//!
//! # Invariants
//! - After `snap_local`, every local axis is within one sector edge.
//! - Snapping never changes the represented location beyond rounding.
//! - Single precision appears only in render vectors, and only for differences.

mod absolute;
mod sector;

pub use absolute::AbsolutePosition;
pub use sector::SectorCoord;

pub fn crate_info() -> &'static str {
    "farspace-position v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("position"));
    }
}
