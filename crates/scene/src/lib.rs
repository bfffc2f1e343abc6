//! Scene persistence: the plain configuration values behind a universe.
//!
//! # Invariants
//! - Only configuration is stored (orbit parameters, massive sizes, space
//!   settings, starting positions). Render state is never persisted.
//! - Orbit parents are referenced by body name, so files stay readable.
//! - A schema version mismatch fails closed.

mod description;
mod store;

pub use description::{
    BodyDesc, ObserverDesc, OrbitDesc, PositionDesc, SCENE_SCHEMA_VERSION, SceneDescription,
};
pub use store::{SceneError, SceneFormat};

pub fn crate_info() -> &'static str {
    "farspace-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
