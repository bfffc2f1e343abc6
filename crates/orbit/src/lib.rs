//! Orbit kinematics.
//!
//! # Invariants
//! - A child position is a pure function of the parent frame and the orbit
//!   parameters; nothing else is cached between recomputes.
//! - `angle` stays within `[0, 360)` once advanced.
//! - A detached orbit yields the default position instead of failing.

mod frame;
mod kinematics;
mod params;

pub use frame::{Frame, ParentFrame};
pub use kinematics::{OrbitAttachment, OrbitKinematics, wrap_degrees};
pub use params::{OrbitParams, calculate_position, tilt_rotation};

pub fn crate_info() -> &'static str {
    "farspace-orbit v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("orbit"));
    }
}
