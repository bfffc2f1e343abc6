use std::collections::BTreeMap;
use std::fmt::Write;

use farspace_common::BodyId;
use farspace_kernel::{RenderFrame, RenderState, Universe};

/// Consumer of per-body render state.
pub trait RenderSink {
    /// Called once per body per frame with its observer-relative state.
    fn submit(&mut self, id: BodyId, state: &RenderState);

    /// Called after every body of a frame has been submitted.
    fn end_frame(&mut self, _tick: u64) {}
}

/// Hand every body of `frame` to `sink`.
pub fn submit_frame<S: RenderSink + ?Sized>(sink: &mut S, frame: &RenderFrame) {
    for (id, state) in &frame.bodies {
        sink.submit(*id, state);
    }
    sink.end_frame(frame.tick);
    tracing::trace!(tick = frame.tick, bodies = frame.bodies.len(), "frame submitted");
}

/// Sink that keeps the latest state per body.
#[derive(Debug, Default)]
pub struct FrameCollector {
    latest: BTreeMap<BodyId, RenderState>,
    frames: u64,
    last_tick: Option<u64>,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: BodyId) -> Option<&RenderState> {
        self.latest.get(&id)
    }

    pub fn latest(&self) -> &BTreeMap<BodyId, RenderState> {
        &self.latest
    }

    /// Number of completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }
}

impl RenderSink for FrameCollector {
    fn submit(&mut self, id: BodyId, state: &RenderState) {
        self.latest.insert(id, *state);
    }

    fn end_frame(&mut self, tick: u64) {
        self.frames += 1;
        self.last_tick = Some(tick);
    }
}

/// Renderer-agnostic read of a whole universe.
///
/// The renderer reads universe state and produces output. It never mutates
/// the universe.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&self, universe: &Universe) -> Self::Output;
}

/// Human-readable dump of the universe and each body's last render state.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, universe: &Universe) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Universe (tick={}, t={:.2}s{}) ===",
            universe.tick(),
            universe.elapsed(),
            if universe.is_paused() { ", paused" } else { "" }
        );
        let _ = writeln!(out, "Bodies: {}", universe.body_count());
        match universe.canonical_observer() {
            Some(obs) => {
                let _ = writeln!(
                    out,
                    "Observer: {} horizon={:.1}",
                    obs.position, obs.massive_distance
                );
            }
            None => {
                let _ = writeln!(out, "Observer: none");
            }
        }

        for body in universe.bodies().values() {
            let _ = write!(out, "  [{}] {}", body.label(), body.position());
            if let Some(orbit) = body.orbit() {
                let _ = write!(out, " orbit(angle={:.2}", orbit.params.angle);
                match orbit.parent().and_then(|p| universe.body(p)) {
                    Some(parent) => {
                        let _ = write!(out, " around {})", parent.label());
                    }
                    None => out.push_str(" detached)"),
                }
            }
            if let Some(state) = body.massive_state() {
                let _ = write!(out, " massive(factor={:.4})", state.scale_factor);
            }
            if let Some(r) = body.render() {
                let _ = write!(
                    out,
                    " render=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
                    r.position.x, r.position.y, r.position.z, r.scale.x, r.scale.y, r.scale.z
                );
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farspace_kernel::Observer;
    use farspace_massive::MassiveScale;
    use farspace_position::AbsolutePosition;
    use glam::{DVec3, Vec3};

    #[test]
    fn debug_renderer_empty_universe() {
        let universe = Universe::new();
        let output = DebugTextRenderer::new().render(&universe);
        assert!(output.contains("tick=0"));
        assert!(output.contains("Bodies: 0"));
        assert!(output.contains("Observer: none"));
    }

    #[test]
    fn debug_renderer_with_bodies() {
        let mut universe = Universe::new();
        universe.add_observer(Observer::default().with_massive_distance(100.0));
        let sun = universe.spawn_named("sun", AbsolutePosition::default().offset_by(DVec3::Z * 1.0e4));
        universe
            .set_massive(sun, Some(MassiveScale::new(DVec3::ONE, 5.0)))
            .unwrap();
        universe.spawn(AbsolutePosition::default());
        universe.late_update(0.1);

        let output = DebugTextRenderer::new().render(&universe);
        assert!(output.contains("Bodies: 2"));
        assert!(output.contains("[sun]"));
        assert!(output.contains("massive(factor="));
        assert!(output.contains("render="));
    }

    #[test]
    fn collector_keeps_latest_state() {
        let mut universe = Universe::new();
        universe.add_observer(Observer::default().with_render_position(Vec3::ONE));
        let id = universe.spawn(AbsolutePosition::default());

        let mut sink = FrameCollector::new();
        submit_frame(&mut sink, &universe.late_update(0.1));
        universe.translate(id, DVec3::X * 2.0).unwrap();
        submit_frame(&mut sink, &universe.late_update(0.1));

        assert_eq!(sink.frames(), 2);
        assert_eq!(sink.last_tick(), Some(2));
        let state = sink.get(id).unwrap();
        assert!((state.position - Vec3::new(3.0, 1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn sink_sees_nothing_without_observer() {
        let mut universe = Universe::new();
        universe.spawn(AbsolutePosition::default());
        let mut sink = FrameCollector::new();
        submit_frame(&mut sink, &universe.late_update(0.1));
        assert!(sink.latest().is_empty());
        assert_eq!(sink.frames(), 1);
    }
}
