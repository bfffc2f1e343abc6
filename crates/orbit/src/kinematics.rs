use farspace_common::BodyId;
use farspace_position::AbsolutePosition;
use serde::{Deserialize, Serialize};

use crate::frame::Frame;
use crate::params::{OrbitParams, calculate_position};

/// Whether an orbit is bound to a parent.
///
/// `Detached` is a valid resting state: a template waiting to be attached
/// when it is spawned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitAttachment {
    #[default]
    Detached,
    Attached { parent: BodyId },
}

/// Orbit driver for one body.
///
/// Holds the parameters and the attachment state. Subscribing to the parent's
/// position changes is the owner's job; `bind`/`unbind` hand back the parent
/// that must be subscribed or released.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitKinematics {
    pub params: OrbitParams,
    attachment: OrbitAttachment,
}

impl OrbitKinematics {
    pub fn new(params: OrbitParams) -> Self {
        Self {
            params,
            attachment: OrbitAttachment::Detached,
        }
    }

    pub fn attachment(&self) -> OrbitAttachment {
        self.attachment
    }

    pub fn parent(&self) -> Option<BodyId> {
        match self.attachment {
            OrbitAttachment::Detached => None,
            OrbitAttachment::Attached { parent } => Some(parent),
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.attachment, OrbitAttachment::Attached { .. })
    }

    /// Bind to `parent`. Returns the previous parent, if any, which the
    /// caller must unsubscribe from.
    pub fn bind(&mut self, parent: BodyId) -> Option<BodyId> {
        let previous = self.parent();
        self.attachment = OrbitAttachment::Attached { parent };
        previous
    }

    /// Return to `Detached`, handing back the parent that was bound.
    pub fn unbind(&mut self) -> Option<BodyId> {
        let previous = self.parent();
        self.attachment = OrbitAttachment::Detached;
        previous
    }

    /// Advance the phase by `dt` seconds. Only an attached orbit moves.
    /// Returns whether the angle changed.
    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.is_attached() {
            return false;
        }
        let before = self.params.angle;
        self.params.angle = wrap_degrees(before + self.params.degrees_per_second * dt);
        self.params.angle != before
    }

    /// Child position for the current phase around `parent`.
    pub fn recompute<F: Frame + ?Sized>(&self, parent: Option<&F>) -> AbsolutePosition {
        calculate_position(parent, &self.params)
    }
}

/// Wrap an angle into `[0, 360)`.
///
/// Rounding can push the remainder onto 360 itself (or a hair below 0); both
/// land on exactly 0. Non-finite input resets to 0.
pub fn wrap_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        tracing::warn!(angle, "non-finite orbit angle reset to 0");
        return 0.0;
    }
    let wrapped = angle - (angle / 360.0).floor() * 360.0;
    if (0.0..360.0).contains(&wrapped) { wrapped } else { 0.0 }
}
