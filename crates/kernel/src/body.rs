use std::collections::BTreeSet;

use farspace_common::BodyId;
use farspace_massive::{MassiveScale, MassiveState};
use farspace_orbit::{Frame, OrbitKinematics};
use farspace_position::AbsolutePosition;
use glam::{DQuat, Vec3};
use serde::{Deserialize, Serialize};

/// What the render sink receives for one body each pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    /// Observer-relative position in render space.
    pub position: Vec3,
    pub scale: Vec3,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// A body in floating-origin space.
///
/// Position and orbit are written through [`Universe`](crate::Universe) only,
/// so every change reaches the body's subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingBody {
    id: BodyId,
    pub name: Option<String>,
    position: AbsolutePosition,
    pub(crate) rotation: DQuat,
    pub(crate) orbit: Option<OrbitKinematics>,
    pub massive: Option<MassiveScale>,
    pub(crate) massive_state: Option<MassiveState>,
    pub(crate) render: Option<RenderState>,
    /// Bodies orbiting this one, notified when its frame changes.
    pub(crate) subscribers: BTreeSet<BodyId>,
}

impl FloatingBody {
    pub(crate) fn new(id: BodyId, position: AbsolutePosition) -> Self {
        Self {
            id,
            name: None,
            position,
            rotation: DQuat::IDENTITY,
            orbit: None,
            massive: None,
            massive_state: None,
            render: None,
            subscribers: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn position(&self) -> &AbsolutePosition {
        &self.position
    }

    pub(crate) fn replace_position(&mut self, position: AbsolutePosition) -> AbsolutePosition {
        std::mem::replace(&mut self.position, position)
    }

    pub fn rotation(&self) -> DQuat {
        self.rotation
    }

    pub fn orbit(&self) -> Option<&OrbitKinematics> {
        self.orbit.as_ref()
    }

    /// Last compression result; `None` for non-massive bodies or before the
    /// first pass with an observer.
    pub fn massive_state(&self) -> Option<&MassiveState> {
        self.massive_state.as_ref()
    }

    pub fn render(&self) -> Option<&RenderState> {
        self.render.as_ref()
    }

    pub fn subscribers(&self) -> &BTreeSet<BodyId> {
        &self.subscribers
    }

    /// Display label: the name if set, otherwise the short id.
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.short())
    }
}

impl Frame for FloatingBody {
    fn position(&self) -> &AbsolutePosition {
        &self.position
    }

    fn rotation(&self) -> DQuat {
        self.rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_body_is_plain() {
        let id = BodyId::new();
        let body = FloatingBody::new(id, AbsolutePosition::default());
        assert_eq!(body.id(), id);
        assert!(body.orbit().is_none());
        assert!(body.massive.is_none());
        assert!(body.render().is_none());
        assert!(body.subscribers().is_empty());
        assert_eq!(body.rotation(), DQuat::IDENTITY);
    }

    #[test]
    fn label_prefers_name() {
        let mut body = FloatingBody::new(BodyId::new(), AbsolutePosition::default());
        assert_eq!(body.label().len(), 8);
        body.name = Some("Earth".into());
        assert_eq!(body.label(), "Earth");
    }
}
