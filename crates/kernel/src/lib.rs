//! Universe kernel: authoritative body state, orbit propagation, late update.
//!
//! # Invariants
//! - The universe is the single writer of every body's position.
//! - A parent's position change reaches its orbiting children within the
//!   same call, so no child renders against a stale parent.
//! - Orbit runs before compression in each pass; compression reads the
//!   positions the orbit pass just wrote.
//! - Render output is derived each pass and never fed back into positions.

pub mod body;
pub mod observer;
pub mod universe;

pub use body::{FloatingBody, RenderState};
pub use observer::Observer;
pub use universe::{RenderFrame, Universe, UniverseError, UniverseEvent};
