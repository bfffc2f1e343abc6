use farspace_position::AbsolutePosition;
use glam::DQuat;

/// Anything an orbit can be placed around: a position plus an orientation.
pub trait Frame {
    fn position(&self) -> &AbsolutePosition;
    fn rotation(&self) -> DQuat;
}

/// A detached copy of a parent's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentFrame {
    pub position: AbsolutePosition,
    pub rotation: DQuat,
}

impl ParentFrame {
    pub fn new(position: AbsolutePosition, rotation: DQuat) -> Self {
        Self { position, rotation }
    }

    pub fn of(frame: &impl Frame) -> Self {
        Self::new(*frame.position(), frame.rotation())
    }
}

impl Default for ParentFrame {
    fn default() -> Self {
        Self::new(AbsolutePosition::default(), DQuat::IDENTITY)
    }
}

impl Frame for ParentFrame {
    fn position(&self) -> &AbsolutePosition {
        &self.position
    }

    fn rotation(&self) -> DQuat {
        self.rotation
    }
}
