use std::collections::{BTreeMap, BTreeSet, VecDeque};

use farspace_common::{BodyId, SpaceConfig};
use farspace_massive::MassiveScale;
use farspace_orbit::{OrbitKinematics, OrbitParams, ParentFrame};
use farspace_position::{AbsolutePosition, SectorCoord};
use glam::{DQuat, DVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::body::{FloatingBody, RenderState};
use crate::observer::Observer;

/// Errors from universe operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("unknown body: {0}")]
    UnknownBody(BodyId),
    #[error("body {0} cannot orbit itself")]
    SelfOrbit(BodyId),
    #[error("attaching {child} to {parent} would form an orbit cycle")]
    OrbitCycle { child: BodyId, parent: BodyId },
    #[error("body {0} has no orbit")]
    NoOrbit(BodyId),
    #[error("no observer at index {0}")]
    UnknownObserver(usize),
}

/// An event record produced by every mutation to the universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UniverseEvent {
    Spawned { id: BodyId, position: AbsolutePosition },
    Despawned { id: BodyId, position: AbsolutePosition },
    /// The body's position was reassigned. Subscribers have already been
    /// updated by the time this is logged.
    PositionChanged {
        id: BodyId,
        old: AbsolutePosition,
        new: AbsolutePosition,
    },
    OrbitAttached { child: BodyId, parent: BodyId },
    OrbitDetached { child: BodyId, parent: BodyId },
    /// One late-update pass finished.
    Stepped { tick: u64, dt: f64 },
}

/// Render output of one late-update pass, in body id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub tick: u64,
    pub bodies: Vec<(BodyId, RenderState)>,
}

/// The authoritative floating-body store.
///
/// All position writes go through here so a body's subscribers can be
/// recomputed in the same call. Bodies are kept in a `BTreeMap` for a stable
/// iteration order.
///
/// The event log keeps at most `event_capacity` entries. When it fills up
/// the oldest half is discarded, so a frame loop that never drains it stays
/// bounded.
#[derive(Debug, Clone)]
pub struct Universe {
    config: SpaceConfig,
    bodies: BTreeMap<BodyId, FloatingBody>,
    /// Registered observers; the first one is canonical.
    observers: Vec<Observer>,
    tick: u64,
    elapsed: f64,
    event_log: Vec<UniverseEvent>,
    event_capacity: usize,
    dropped_events: u64,
}

impl Default for Universe {
    fn default() -> Self {
        Self::with_config(SpaceConfig::default())
    }
}

impl Universe {
    pub const DEFAULT_EVENT_CAPACITY: usize = 4096;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SpaceConfig) -> Self {
        Self {
            config,
            bodies: BTreeMap::new(),
            observers: Vec::new(),
            tick: 0,
            elapsed: 0.0,
            event_log: Vec::new(),
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
            dropped_events: 0,
        }
    }

    /// Bound the event log. Zero turns logging off.
    pub fn set_event_capacity(&mut self, capacity: usize) {
        self.event_capacity = capacity;
        if self.event_log.len() > capacity {
            let excess = self.event_log.len() - capacity;
            self.event_log.drain(..excess);
            self.dropped_events += excess as u64;
        }
    }

    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }

    /// Events discarded because the log was full.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    /// Stop or resume the orbit clock. Recompute still runs while paused.
    pub fn set_paused(&mut self, paused: bool) {
        self.config.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.config.paused
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds across all passes, paused or not.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn bodies(&self) -> &BTreeMap<BodyId, FloatingBody> {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&FloatingBody> {
        self.bodies.get(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .values()
            .find(|b| b.name.as_deref() == Some(name))
            .map(FloatingBody::id)
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<UniverseEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn events(&self) -> &[UniverseEvent] {
        &self.event_log
    }

    /// A snapped position on this universe's sector grid.
    pub fn position(&self, local: DVec3, sector: SectorCoord) -> AbsolutePosition {
        let mut position =
            AbsolutePosition::new(local, sector).with_sector_size(self.config.sector_size);
        position.snap_local();
        position
    }

    /// `position` re-expressed on this universe's sector grid. Every stored
    /// position goes through here so arithmetic never mixes grids.
    fn on_grid(&self, position: AbsolutePosition) -> AbsolutePosition {
        position.rebased(self.config.sector_size)
    }

    // --- Observers ---

    /// Register an observer. Returns its index.
    pub fn add_observer(&mut self, mut observer: Observer) -> usize {
        observer.position = self.on_grid(observer.position);
        self.observers.push(observer);
        self.observers.len() - 1
    }

    pub fn remove_observer(&mut self, index: usize) -> Result<Observer, UniverseError> {
        if index >= self.observers.len() {
            return Err(UniverseError::UnknownObserver(index));
        }
        Ok(self.observers.remove(index))
    }

    pub fn observers(&self) -> &[Observer] {
        &self.observers
    }

    /// The observer bodies are rendered against, if any is registered.
    pub fn canonical_observer(&self) -> Option<&Observer> {
        self.observers.first()
    }

    pub fn observer_mut(&mut self, index: usize) -> Result<&mut Observer, UniverseError> {
        self.observers
            .get_mut(index)
            .ok_or(UniverseError::UnknownObserver(index))
    }

    /// Replace the observer at `index`, returning the previous one.
    pub fn set_observer(
        &mut self,
        index: usize,
        mut observer: Observer,
    ) -> Result<Observer, UniverseError> {
        observer.position = self.on_grid(observer.position);
        let slot = self.observer_mut(index)?;
        Ok(std::mem::replace(slot, observer))
    }

    // --- Lifecycle ---

    /// Spawn a body at `position`. Returns its id.
    pub fn spawn(&mut self, position: AbsolutePosition) -> BodyId {
        let position = self.on_grid(position);
        let id = BodyId::new();
        self.bodies.insert(id, FloatingBody::new(id, position));
        self.record(UniverseEvent::Spawned { id, position });
        tracing::debug!(%id, %position, "spawned body");
        id
    }

    pub fn spawn_named(&mut self, name: impl Into<String>, position: AbsolutePosition) -> BodyId {
        let id = self.spawn(position);
        if let Some(body) = self.bodies.get_mut(&id) {
            body.name = Some(name.into());
        }
        id
    }

    /// Remove a body, releasing every subscription that involves it: its own
    /// orbit unsubscribes from its parent, and children orbiting it are
    /// detached.
    pub fn despawn(&mut self, id: BodyId) -> Option<FloatingBody> {
        let body = self.bodies.get(&id)?;
        let has_orbit = body.orbit.is_some();
        let children: Vec<BodyId> = body.subscribers.iter().copied().collect();

        if has_orbit {
            if let Err(err) = self.detach_orbit(id) {
                tracing::warn!(%id, %err, "orbit detach failed on despawn");
            }
        }
        for child in children {
            if let Err(err) = self.detach_orbit(child) {
                tracing::warn!(%child, %err, "stale subscriber on despawn");
            }
        }

        let body = self.bodies.remove(&id)?;
        self.record(UniverseEvent::Despawned {
            id,
            position: *body.position(),
        });
        tracing::debug!(%id, "despawned body");
        Some(body)
    }

    // --- Per-body state ---

    pub fn set_name(&mut self, id: BodyId, name: Option<String>) -> Result<(), UniverseError> {
        self.body_mut(id)?.name = name;
        Ok(())
    }

    pub fn set_massive(&mut self, id: BodyId, massive: Option<MassiveScale>) -> Result<(), UniverseError> {
        let body = self.body_mut(id)?;
        if massive.is_none() {
            body.massive_state = None;
        }
        body.massive = massive;
        Ok(())
    }

    /// Reassign a body's position and recompute everything orbiting it.
    pub fn set_position(&mut self, id: BodyId, position: AbsolutePosition) -> Result<(), UniverseError> {
        self.write_position(id, position)?;
        self.notify_frame_changed(id);
        Ok(())
    }

    /// Move a body by `offset` metres.
    pub fn translate(&mut self, id: BodyId, offset: DVec3) -> Result<(), UniverseError> {
        let moved = self.body_ref(id)?.position().offset_by(offset);
        self.set_position(id, moved)
    }

    /// Reorient a body. Children orbit in its rotated frame, so they are
    /// recomputed as for a position change.
    pub fn set_rotation(&mut self, id: BodyId, rotation: DQuat) -> Result<(), UniverseError> {
        self.body_mut(id)?.rotation = rotation;
        self.notify_frame_changed(id);
        Ok(())
    }

    // --- Orbits ---

    /// Give a body orbit parameters, keeping any existing attachment.
    pub fn set_orbit(&mut self, id: BodyId, params: OrbitParams) -> Result<(), UniverseError> {
        let body = self.body_mut(id)?;
        match body.orbit.as_mut() {
            Some(orbit) => orbit.params = params,
            None => body.orbit = Some(OrbitKinematics::new(params)),
        }
        self.update_orbit(id)
    }

    /// Detach and drop a body's orbit. Its position stays where it is.
    pub fn remove_orbit(&mut self, id: BodyId) -> Result<Option<OrbitKinematics>, UniverseError> {
        self.detach_orbit(id)?;
        Ok(self.body_mut(id)?.orbit.take())
    }

    /// Bind `child`'s orbit to `parent`: subscribe to the parent's frame
    /// changes, then place the child.
    pub fn attach_orbit(&mut self, child: BodyId, parent: BodyId) -> Result<(), UniverseError> {
        if child == parent {
            return Err(UniverseError::SelfOrbit(child));
        }
        self.body_ref(parent)?;
        let current = self
            .body_ref(child)?
            .orbit
            .as_ref()
            .ok_or(UniverseError::NoOrbit(child))?
            .parent();
        if current == Some(parent) {
            return Ok(());
        }
        if self.orbits_around(parent, child) {
            return Err(UniverseError::OrbitCycle { child, parent });
        }

        let previous = self
            .body_mut(child)?
            .orbit
            .as_mut()
            .and_then(|orbit| orbit.bind(parent));
        if let Some(old) = previous {
            self.unsubscribe(old, child);
        }
        self.body_mut(parent)?.subscribers.insert(child);
        self.record(UniverseEvent::OrbitAttached { child, parent });
        tracing::debug!(%child, %parent, "orbit attached");

        self.update_orbit(child)
    }

    /// Return `child`'s orbit to detached, unsubscribing first.
    /// Returns the parent it was bound to.
    pub fn detach_orbit(&mut self, child: BodyId) -> Result<Option<BodyId>, UniverseError> {
        let parent = self
            .body_ref(child)?
            .orbit
            .as_ref()
            .ok_or(UniverseError::NoOrbit(child))?
            .parent();
        let Some(parent) = parent else {
            return Ok(None);
        };
        self.unsubscribe(parent, child);
        if let Some(orbit) = self.body_mut(child)?.orbit.as_mut() {
            orbit.unbind();
        }
        self.record(UniverseEvent::OrbitDetached { child, parent });
        tracing::debug!(%child, %parent, "orbit detached");
        Ok(Some(parent))
    }

    /// Recompute an orbiting body's position from its parent's current
    /// frame. A detached orbit is left in place; it is waiting to be
    /// attached, not asking to be reset.
    pub fn update_orbit(&mut self, id: BodyId) -> Result<(), UniverseError> {
        if let Some(position) = self.orbit_position(id)? {
            self.set_position(id, position)?;
        }
        Ok(())
    }

    // --- Frame pass ---

    /// One late-update pass: advance and place orbits, then compress massive
    /// bodies and derive render state against the canonical observer.
    pub fn late_update(&mut self, dt: f64) -> RenderFrame {
        let _span = tracing::info_span!("late_update", tick = self.tick + 1).entered();
        self.tick += 1;
        self.elapsed += dt;

        let orbiting: Vec<BodyId> = self
            .bodies
            .values()
            .filter(|b| b.orbit.is_some_and(|o| o.is_attached()))
            .map(FloatingBody::id)
            .collect();
        let advance = !self.config.paused;
        for id in orbiting {
            if advance {
                if let Some(orbit) = self.bodies.get_mut(&id).and_then(|b| b.orbit.as_mut()) {
                    orbit.tick(dt);
                }
            }
            if let Err(err) = self.update_orbit(id) {
                tracing::warn!(%id, %err, "orbit update skipped");
            }
        }

        let frame = self.refresh_render();
        self.record(UniverseEvent::Stepped {
            tick: self.tick,
            dt,
        });
        tracing::trace!(
            bodies = self.bodies.len(),
            rendered = frame.bodies.len(),
            "late update complete"
        );
        frame
    }

    /// Derive render state for every body against the canonical observer,
    /// without advancing anything.
    pub fn refresh_render(&mut self) -> RenderFrame {
        let mut frame = RenderFrame {
            tick: self.tick,
            bodies: Vec::with_capacity(self.bodies.len()),
        };
        let Some(mut observer) = self.observers.first().copied() else {
            tracing::trace!("no observer registered, render skipped");
            return frame;
        };
        // `observer_mut` hands out the raw slot, so it may be off grid.
        observer.position = self.on_grid(observer.position);

        for body in self.bodies.values_mut() {
            let state = match body.massive {
                Some(massive) => {
                    let out = massive.evaluate(
                        &observer.position,
                        observer.render_position,
                        body.position(),
                        observer.massive_distance,
                    );
                    body.massive_state = Some(out.state);
                    RenderState {
                        position: out.position,
                        scale: out.scale,
                    }
                }
                None => RenderState {
                    position: body.position().render_position(
                        &observer.position,
                        observer.render_position,
                        1.0,
                    ),
                    scale: Vec3::ONE,
                },
            };
            body.render = Some(state);
            frame.bodies.push((body.id(), state));
        }
        frame
    }

    // --- Internals ---

    fn body_ref(&self, id: BodyId) -> Result<&FloatingBody, UniverseError> {
        self.bodies.get(&id).ok_or(UniverseError::UnknownBody(id))
    }

    fn body_mut(&mut self, id: BodyId) -> Result<&mut FloatingBody, UniverseError> {
        self.bodies.get_mut(&id).ok_or(UniverseError::UnknownBody(id))
    }

    fn unsubscribe(&mut self, parent: BodyId, child: BodyId) {
        if let Some(body) = self.bodies.get_mut(&parent) {
            body.subscribers.remove(&child);
        }
    }

    /// True if `body` orbits `ancestor`, directly or through other bodies.
    fn orbits_around(&self, body: BodyId, ancestor: BodyId) -> bool {
        let mut seen = BTreeSet::new();
        let mut current = body;
        while seen.insert(current) {
            let Some(parent) = self
                .bodies
                .get(&current)
                .and_then(|b| b.orbit.as_ref())
                .and_then(OrbitKinematics::parent)
            else {
                return false;
            };
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Where an attached orbit places `id` right now. `None` if the body has
    /// no orbit or the orbit is detached.
    fn orbit_position(&self, id: BodyId) -> Result<Option<AbsolutePosition>, UniverseError> {
        let body = self.body_ref(id)?;
        let Some(orbit) = body.orbit.as_ref() else {
            return Ok(None);
        };
        let Some(parent_id) = orbit.parent() else {
            return Ok(None);
        };
        let parent = self.body_ref(parent_id)?;
        let frame = ParentFrame::of(parent);
        Ok(Some(orbit.recompute(Some(&frame))))
    }

    /// Store a new position and log it. Does not notify.
    fn write_position(&mut self, id: BodyId, position: AbsolutePosition) -> Result<(), UniverseError> {
        let position = self.on_grid(position);
        let old = self.body_mut(id)?.replace_position(position);
        if old != position {
            self.record(UniverseEvent::PositionChanged {
                id,
                old,
                new: position,
            });
        }
        Ok(())
    }

    fn record(&mut self, event: UniverseEvent) {
        if self.event_capacity == 0 {
            self.dropped_events += 1;
            return;
        }
        if self.event_log.len() >= self.event_capacity {
            let keep = self.event_capacity / 2;
            let excess = self.event_log.len() - keep;
            self.event_log.drain(..excess);
            self.dropped_events += excess as u64;
            tracing::trace!(dropped = excess, "event log full, oldest events discarded");
        }
        self.event_log.push(event);
    }

    /// Recompute every body orbiting `origin`, breadth first, each at most
    /// once per notification.
    fn notify_frame_changed(&mut self, origin: BodyId) {
        let mut visited = BTreeSet::from([origin]);
        let mut queue: VecDeque<BodyId> = self
            .bodies
            .get(&origin)
            .map(|b| b.subscribers.iter().copied().collect())
            .unwrap_or_default();

        while let Some(child) = queue.pop_front() {
            if !visited.insert(child) {
                tracing::warn!(%origin, %child, "orbit cycle during propagation");
                continue;
            }
            let position = match self.orbit_position(child) {
                Ok(Some(position)) => position,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(%child, %err, "subscriber skipped");
                    continue;
                }
            };
            if self.write_position(child, position).is_ok() {
                if let Some(body) = self.bodies.get(&child) {
                    queue.extend(body.subscribers.iter().copied());
                }
            }
        }
    }
}
