use farspace_common::BodyId;
use farspace_kernel::{RenderState, Universe};
use farspace_position::{AbsolutePosition, SectorCoord};
use glam::DVec3;

/// Read-only queries against a universe for debugging and the CLI.
pub struct UniverseInspector;

impl UniverseInspector {
    pub fn summary(universe: &Universe) -> UniverseSummary {
        let bodies = universe.bodies().values();
        let (mut orbiting, mut attached, mut massive) = (0, 0, 0);
        for body in bodies {
            if let Some(orbit) = body.orbit() {
                orbiting += 1;
                if orbit.is_attached() {
                    attached += 1;
                }
            }
            if body.massive.is_some() {
                massive += 1;
            }
        }
        UniverseSummary {
            tick: universe.tick(),
            elapsed: universe.elapsed(),
            paused: universe.is_paused(),
            body_count: universe.body_count(),
            observer_count: universe.observers().len(),
            orbiting,
            attached,
            massive,
            pending_events: universe.events().len(),
        }
    }

    /// Details for one body, measured against the canonical observer when
    /// there is one.
    pub fn inspect_body(universe: &Universe, id: BodyId) -> Option<BodyInfo> {
        let body = universe.body(id)?;
        let observer = universe.canonical_observer();
        Some(BodyInfo {
            id,
            label: body.label(),
            sector: body.position().sector,
            local: body.position().local,
            observer_distance: observer
                .map(|obs| AbsolutePosition::distance(&obs.position, body.position())),
            parent: body.orbit().and_then(|o| o.parent()),
            angle: body.orbit().map(|o| o.params.angle),
            scale_factor: body.massive_state().map(|s| s.scale_factor),
            render: body.render().copied(),
            subscribers: body.subscribers().len(),
        })
    }

    pub fn list_bodies(universe: &Universe) -> Vec<BodyId> {
        universe.bodies().keys().copied().collect()
    }

    /// Parents of `id`, nearest first. Empty for a body that is not attached.
    pub fn orbit_chain(universe: &Universe, id: BodyId) -> Vec<BodyId> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(parent) = universe
            .body(current)
            .and_then(|b| b.orbit())
            .and_then(|o| o.parent())
        {
            if parent == id || chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }
}

#[derive(Debug, Clone)]
pub struct UniverseSummary {
    pub tick: u64,
    pub elapsed: f64,
    pub paused: bool,
    pub body_count: usize,
    pub observer_count: usize,
    /// Bodies carrying an orbit, attached or not.
    pub orbiting: usize,
    pub attached: usize,
    pub massive: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for UniverseSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Universe: tick={} elapsed={:.2}s bodies={} observers={} orbits={}/{} massive={} pending_events={}",
            self.tick,
            self.elapsed,
            self.body_count,
            self.observer_count,
            self.attached,
            self.orbiting,
            self.massive,
            self.pending_events
        )?;
        if self.paused {
            write!(f, " (paused)")?;
        }
        Ok(())
    }
}

/// Detailed info about a single body.
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub id: BodyId,
    pub label: String,
    pub sector: SectorCoord,
    pub local: DVec3,
    pub observer_distance: Option<f64>,
    pub parent: Option<BodyId>,
    pub angle: Option<f64>,
    pub scale_factor: Option<f64>,
    pub render: Option<RenderState>,
    pub subscribers: usize,
}

impl std::fmt::Display for BodyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Body {} [{}] sector={} local=({:.3}, {:.3}, {:.3})",
            self.label, self.id, self.sector, self.local.x, self.local.y, self.local.z,
        )?;
        if let Some(d) = self.observer_distance {
            write!(f, " dist={d:.3e}")?;
        }
        if let (Some(parent), Some(angle)) = (self.parent, self.angle) {
            write!(f, " orbit={parent}@{angle:.2}deg")?;
        }
        if let Some(k) = self.scale_factor {
            write!(f, " k={k:.4e}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farspace_kernel::Observer;
    use farspace_massive::MassiveScale;
    use farspace_orbit::OrbitParams;

    fn at(x: f64) -> AbsolutePosition {
        AbsolutePosition::new(DVec3::new(x, 0.0, 0.0), SectorCoord::ZERO)
    }

    #[test]
    fn summary_empty_universe() {
        let universe = Universe::new();
        let summary = UniverseInspector::summary(&universe);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.body_count, 0);
        assert_eq!(summary.observer_count, 0);
    }

    #[test]
    fn summary_counts_roles() {
        let mut universe = Universe::new();
        let star = universe.spawn_named("star", at(0.0));
        let planet = universe.spawn_named("planet", at(10.0));
        let spare = universe.spawn(at(20.0));
        universe.set_orbit(planet, OrbitParams::circular(5.0)).unwrap();
        universe.set_orbit(spare, OrbitParams::circular(5.0)).unwrap();
        universe.attach_orbit(planet, star).unwrap();
        universe
            .set_massive(star, Some(MassiveScale::new(DVec3::ONE, 10.0)))
            .unwrap();
        universe.late_update(0.1);

        let summary = UniverseInspector::summary(&universe);
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.body_count, 3);
        assert_eq!(summary.orbiting, 2);
        assert_eq!(summary.attached, 1);
        assert_eq!(summary.massive, 1);
        assert!(summary.pending_events >= 4);
    }

    #[test]
    fn inspect_body_found() {
        let mut universe = Universe::new();
        universe.add_observer(Observer::new(at(0.0)));
        let id = universe.spawn_named("probe", at(3.0));
        universe.late_update(0.0);

        let info = UniverseInspector::inspect_body(&universe, id).unwrap();
        assert_eq!(info.label, "probe");
        assert_eq!(info.local, DVec3::new(3.0, 0.0, 0.0));
        assert_eq!(info.observer_distance, Some(3.0));
        assert!(info.parent.is_none());
        assert_eq!(info.render.unwrap().position.x, 3.0);
    }

    #[test]
    fn inspect_body_not_found() {
        let universe = Universe::new();
        assert!(UniverseInspector::inspect_body(&universe, BodyId::new()).is_none());
    }

    #[test]
    fn list_bodies() {
        let mut universe = Universe::new();
        let id1 = universe.spawn(at(0.0));
        let id2 = universe.spawn(at(1.0));

        let ids = UniverseInspector::list_bodies(&universe);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&id1));
        assert!(ids.contains(&id2));
    }

    #[test]
    fn orbit_chain_walks_to_root() {
        let mut universe = Universe::new();
        let sun = universe.spawn(at(0.0));
        let planet = universe.spawn(at(0.0));
        let moon = universe.spawn(at(0.0));
        universe.set_orbit(planet, OrbitParams::circular(100.0)).unwrap();
        universe.set_orbit(moon, OrbitParams::circular(1.0)).unwrap();
        universe.attach_orbit(planet, sun).unwrap();
        universe.attach_orbit(moon, planet).unwrap();

        assert_eq!(UniverseInspector::orbit_chain(&universe, moon), vec![planet, sun]);
        assert!(UniverseInspector::orbit_chain(&universe, sun).is_empty());
    }

    #[test]
    fn displays_are_readable() {
        let mut universe = Universe::new();
        universe.set_paused(true);
        let id = universe.spawn_named("probe", at(1.0));
        let summary = format!("{}", UniverseInspector::summary(&universe));
        assert!(summary.contains("bodies=1"));
        assert!(summary.ends_with("(paused)"));

        let info = format!("{}", UniverseInspector::inspect_body(&universe, id).unwrap());
        assert!(info.starts_with("Body probe"));
        assert!(!info.contains("dist="));
    }
}
