use farspace_common::Length;
use farspace_position::AbsolutePosition;
use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Orbital parameters of one body around its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitParams {
    /// Semi-major axis.
    pub radius: Length,
    /// How squashed the orbit is: 0 is circular, 1 collapses the forward axis.
    pub oblateness: f64,
    /// Rotation of the orbit plane relative to the parent, Euler degrees.
    pub tilt: DVec3,
    /// Offset of the orbit centre in the tilted parent frame, metres.
    pub offset: DVec3,
    /// Current phase in degrees, clockwise from the forward (+Z) axis.
    pub angle: f64,
    pub degrees_per_second: f64,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            radius: Length::meters(1.0),
            oblateness: 0.0,
            tilt: DVec3::ZERO,
            offset: DVec3::ZERO,
            angle: 0.0,
            degrees_per_second: 10.0,
        }
    }
}

impl OrbitParams {
    pub fn circular(radius: impl Into<Length>) -> Self {
        Self {
            radius: radius.into(),
            ..Self::default()
        }
    }

    pub fn with_oblateness(mut self, oblateness: f64) -> Self {
        self.oblateness = clamp_unit(oblateness);
        self
    }

    pub fn with_tilt(mut self, tilt: DVec3) -> Self {
        self.tilt = tilt;
        self
    }

    pub fn with_offset(mut self, offset: DVec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_speed(mut self, degrees_per_second: f64) -> Self {
        self.degrees_per_second = degrees_per_second;
        self
    }

    /// Oblateness clamped into the unit interval.
    pub fn effective_oblateness(&self) -> f64 {
        clamp_unit(self.oblateness)
    }

    /// Point on the untilted ellipse at `angle_degrees`, offset applied.
    ///
    /// Only the forward axis is shortened by oblateness.
    pub fn plane_point(&self, angle_degrees: f64) -> DVec3 {
        let r1 = self.radius.to_meters();
        let r2 = r1 * (1.0 - self.effective_oblateness());
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        DVec3::new(self.offset.x + sin * r1, self.offset.y, self.offset.z + cos * r2)
    }

    /// Parent-relative displacement of the orbiting body at its current angle.
    pub fn displacement(&self, parent_rotation: DQuat) -> DVec3 {
        (parent_rotation * tilt_rotation(self.tilt)) * self.plane_point(self.angle)
    }

    /// `points` parent-relative samples around the whole ellipse, for drawing
    /// the orbit path. Fewer than three points can't describe a ring, so the
    /// result is empty then.
    pub fn ring_points(&self, parent_rotation: DQuat, points: usize) -> Vec<DVec3> {
        if points <= 2 {
            return Vec::new();
        }
        let rotation = parent_rotation * tilt_rotation(self.tilt);
        let step = 360.0 / points as f64;
        (0..points)
            .map(|i| rotation * self.plane_point(-(i as f64 * step)))
            .collect()
    }
}

/// Tilt in Euler degrees to a rotation. Z is applied first, then X, then Y.
pub fn tilt_rotation(tilt: DVec3) -> DQuat {
    DQuat::from_euler(
        EulerRot::YXZ,
        tilt.y.to_radians(),
        tilt.x.to_radians(),
        tilt.z.to_radians(),
    )
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Place an orbiting body around `parent`.
///
/// A missing parent is not an error: the orbit is waiting to be attached, and
/// the result is the default position.
pub fn calculate_position<F: Frame + ?Sized>(
    parent: Option<&F>,
    params: &OrbitParams,
) -> AbsolutePosition {
    let Some(parent) = parent else {
        return AbsolutePosition::default();
    };
    let mut position = *parent.position();
    position += params.displacement(parent.rotation());
    position.snap_local();
    position
}
