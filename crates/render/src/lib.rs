//! Rendering adapter: where render frames leave the core.
//!
//! # Invariants
//! - Sinks only read render state; they never write body positions.
//! - Render state derives from universe state and the canonical observer.
//!
//! A real backend implements [`RenderSink`] and copies each body's
//! observer-relative position and scale into its own transforms. The
//! debug text renderer stands in for one in the CLI and in tests.

mod renderer;

pub use renderer::{DebugTextRenderer, FrameCollector, RenderSink, Renderer, submit_frame};

pub fn crate_info() -> &'static str {
    "farspace-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
