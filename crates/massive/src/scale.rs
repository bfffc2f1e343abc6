use farspace_common::Length;
use farspace_position::AbsolutePosition;
use glam::{DVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::compressor::DistanceCompressor;

/// Size settings of a massive body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassiveScale {
    /// Per-axis multiplier on top of `size`.
    pub axis_scale: DVec3,
    /// Base size of the body. Also added to the observer distance, so large
    /// bodies start compressing earlier.
    pub size: Length,
}

impl Default for MassiveScale {
    fn default() -> Self {
        Self {
            axis_scale: DVec3::ONE,
            size: Length::meters(1.0),
        }
    }
}

/// Distances behind the last compression of a massive body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassiveState {
    /// Observer to body centre.
    pub true_distance: f64,
    /// `true_distance + size`, the value fed to the compressor.
    pub effective_distance: f64,
    pub scale_factor: f64,
}

/// Render output for a massive body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassiveRender {
    pub position: Vec3,
    pub scale: Vec3,
    pub state: MassiveState,
}

impl MassiveScale {
    pub fn new(axis_scale: DVec3, size: impl Into<Length>) -> Self {
        Self {
            axis_scale,
            size: size.into(),
        }
    }

    /// Compression factor for a body `true_distance` from the observer.
    pub fn state_for(&self, true_distance: f64, horizon: f64) -> MassiveState {
        let effective_distance = true_distance + self.size.to_meters();
        let compression = DistanceCompressor::new(horizon).compute(effective_distance);
        MassiveState {
            true_distance,
            effective_distance,
            scale_factor: compression.scale_factor,
        }
    }

    /// Per-axis render scale for a given compression factor.
    pub fn render_scale(&self, scale_factor: f64) -> Vec3 {
        (self.axis_scale * (self.size.to_meters() * scale_factor)).as_vec3()
    }

    /// Pull `body` toward the observer and shrink it by the same factor.
    pub fn evaluate(
        &self,
        observer: &AbsolutePosition,
        observer_render: Vec3,
        body: &AbsolutePosition,
        horizon: f64,
    ) -> MassiveRender {
        let true_distance = AbsolutePosition::distance(observer, body);
        let state = self.state_for(true_distance, horizon);
        MassiveRender {
            position: body.render_position(observer, observer_render, state.scale_factor),
            scale: self.render_scale(state.scale_factor),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compressor::compress_distance;
    use farspace_position::SectorCoord;

    #[test]
    fn size_is_added_before_compression() {
        let massive = MassiveScale::new(DVec3::new(1.0, 2.0, 0.5), 10.0);
        let observer = AbsolutePosition::new(DVec3::new(7.0, 0.0, 0.0), SectorCoord::new(12, 0, -3));
        let body = observer.offset_by(DVec3::new(0.0, 0.0, 2000.0));

        let render = massive.evaluate(&observer, Vec3::ZERO, &body, 1000.0);
        assert!((render.state.true_distance - 2000.0).abs() < 1e-9);
        assert!((render.state.effective_distance - 2010.0).abs() < 1e-9);

        let expected = compress_distance(2010.0, 1000.0) / 2010.0;
        assert!((render.state.scale_factor - expected).abs() < 1e-12);
        assert!(render.state.scale_factor < 1.0);

        let scale = DVec3::new(1.0, 2.0, 0.5) * 10.0 * expected;
        assert!((render.scale.as_dvec3() - scale).length() < 1e-5);
    }

    #[test]
    fn position_and_size_share_the_factor() {
        let massive = MassiveScale::new(DVec3::ONE, 50.0);
        let observer = AbsolutePosition::default();
        let body = observer.offset_by(DVec3::new(3.0e5, 0.0, 4.0e5));
        let render = massive.evaluate(&observer, Vec3::new(0.0, 1.0, 0.0), &body, 1.0e4);

        let f = render.state.scale_factor;
        let expected = Vec3::new(0.0, 1.0, 0.0) + (DVec3::new(3.0e5, 0.0, 4.0e5) * f).as_vec3();
        assert!((render.position - expected).length() < 1e-3);
        // Apparent size over distance is unchanged by compression.
        let apparent_true = 50.0 / 5.0e5;
        let apparent_render = render.scale.x as f64 / (render.position - Vec3::Y).length() as f64;
        assert!((apparent_true - apparent_render).abs() < 1e-6);
    }

    #[test]
    fn near_bodies_render_at_true_scale() {
        let massive = MassiveScale::new(DVec3::ONE, 2.0);
        let body = AbsolutePosition::default().offset_by(DVec3::new(10.0, 0.0, 0.0));
        let render = massive.evaluate(&AbsolutePosition::default(), Vec3::ZERO, &body, 1000.0);
        assert_eq!(render.state.scale_factor, 1.0);
        assert_eq!(render.scale, Vec3::splat(2.0));
        assert!((render.position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn compression_never_moves_truth() {
        let massive = MassiveScale::default();
        let body = AbsolutePosition::default().offset_by(DVec3::new(0.0, 9.0e5, 0.0));
        let copy = body;
        massive.evaluate(&AbsolutePosition::default(), Vec3::ZERO, &body, 100.0);
        assert_eq!(body, copy);
    }
}
