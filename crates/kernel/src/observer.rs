use farspace_common::SpaceConfig;
use farspace_position::AbsolutePosition;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The reference point bodies are rendered against, usually a camera.
///
/// Owned and moved by whoever drives the camera; bodies only read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub position: AbsolutePosition,
    /// Where the observer itself sits in render space.
    pub render_position: Vec3,
    /// Horizon for massive-body compression.
    pub massive_distance: f64,
}

impl Observer {
    pub fn new(position: AbsolutePosition) -> Self {
        Self {
            position,
            render_position: Vec3::ZERO,
            massive_distance: SpaceConfig::DEFAULT_MASSIVE_DISTANCE,
        }
    }

    pub fn with_massive_distance(mut self, massive_distance: f64) -> Self {
        self.massive_distance = massive_distance;
        self
    }

    pub fn with_render_position(mut self, render_position: Vec3) -> Self {
        self.render_position = render_position;
        self
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new(AbsolutePosition::default())
    }
}
