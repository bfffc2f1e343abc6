use std::collections::{BTreeMap, BTreeSet};

use farspace_common::{BodyId, Length, LengthUnit, SpaceConfig};
use farspace_kernel::{Observer, Universe};
use farspace_massive::MassiveScale;
use farspace_orbit::{OrbitParams, tilt_rotation};
use farspace_position::{AbsolutePosition, SectorCoord};
use glam::{DVec3, EulerRot, Vec3};
use serde::{Deserialize, Serialize};

use crate::store::SceneError;

/// Current scene file schema version.
pub const SCENE_SCHEMA_VERSION: u32 = 1;

fn schema_version() -> u32 {
    SCENE_SCHEMA_VERSION
}

/// Everything needed to rebuild a universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub space: SpaceConfig,
    #[serde(default)]
    pub observers: Vec<ObserverDesc>,
    #[serde(default)]
    pub bodies: Vec<BodyDesc>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            schema_version: SCENE_SCHEMA_VERSION,
            space: SpaceConfig::default(),
            observers: Vec::new(),
            bodies: Vec::new(),
        }
    }
}

/// Sector plus local offset, measured in the scene's sector size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionDesc {
    pub local: DVec3,
    pub sector: SectorCoord,
}

impl PositionDesc {
    /// Snapped position on `universe`'s sector grid.
    pub fn place(self, universe: &Universe) -> AbsolutePosition {
        universe.position(self.local, self.sector)
    }

    /// Record `position` as sector and local on a grid of `sector_size`.
    pub fn on_grid(position: &AbsolutePosition, sector_size: f64) -> Self {
        let position = position.rebased(sector_size);
        Self {
            local: position.local,
            sector: position.sector,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObserverDesc {
    #[serde(default)]
    pub position: PositionDesc,
    #[serde(default)]
    pub render_position: Vec3,
    /// Falls back to the space's `massive_distance`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub massive_distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub name: String,
    #[serde(default)]
    pub position: PositionDesc,
    /// Orientation as Euler degrees, same convention as orbit tilt.
    #[serde(default)]
    pub rotation: DVec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit: Option<OrbitDesc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub massive: Option<MassiveScale>,
}

impl BodyDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: PositionDesc::default(),
            rotation: DVec3::ZERO,
            orbit: None,
            massive: None,
        }
    }
}

/// Orbit parameters plus the name of the body orbited. No parent means the
/// body is a template that stays detached until attached at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitDesc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(flatten)]
    pub params: OrbitParams,
}

impl SceneDescription {
    /// Spawn every body, then attach orbits by parent name, then register
    /// observers.
    pub fn build(&self) -> Result<Universe, SceneError> {
        if self.schema_version != SCENE_SCHEMA_VERSION {
            return Err(SceneError::SchemaMismatch {
                file_version: self.schema_version,
                expected_version: SCENE_SCHEMA_VERSION,
            });
        }

        let mut universe = Universe::with_config(self.space);
        let mut ids: BTreeMap<&str, BodyId> = BTreeMap::new();

        for desc in &self.bodies {
            if ids.contains_key(desc.name.as_str()) {
                return Err(SceneError::DuplicateName(desc.name.clone()));
            }
            let position = desc.position.place(&universe);
            let id = universe.spawn_named(desc.name.clone(), position);
            ids.insert(desc.name.as_str(), id);

            if desc.rotation != DVec3::ZERO {
                universe.set_rotation(id, tilt_rotation(desc.rotation))?;
            }
            universe.set_massive(id, desc.massive)?;
            if let Some(orbit) = &desc.orbit {
                universe.set_orbit(id, orbit.params)?;
            }
        }

        for desc in &self.bodies {
            let Some(parent) = desc.orbit.as_ref().and_then(|o| o.parent.as_deref()) else {
                continue;
            };
            let parent_id = ids.get(parent).ok_or_else(|| SceneError::UnknownParent {
                body: desc.name.clone(),
                parent: parent.to_string(),
            })?;
            universe.attach_orbit(ids[desc.name.as_str()], *parent_id)?;
        }

        for desc in &self.observers {
            let observer = Observer::new(desc.position.place(&universe))
                .with_render_position(desc.render_position)
                .with_massive_distance(desc.massive_distance.unwrap_or(self.space.massive_distance));
            universe.add_observer(observer);
        }

        tracing::info!(
            bodies = universe.body_count(),
            observers = universe.observers().len(),
            "scene built"
        );
        Ok(universe)
    }

    /// Record the configuration of a running universe. Unnamed bodies get
    /// their short id as a name so orbit parents stay resolvable.
    pub fn capture(universe: &Universe) -> Self {
        let sector_size = universe.config().sector_size;
        let mut names: BTreeMap<BodyId, String> = BTreeMap::new();
        let mut taken = BTreeSet::new();
        for body in universe.bodies().values() {
            let mut name = body.label();
            if !taken.insert(name.clone()) {
                name = format!("{name}-{}", body.id().short());
                taken.insert(name.clone());
            }
            names.insert(body.id(), name);
        }

        let bodies = universe
            .bodies()
            .values()
            .map(|body| {
                let (y, x, z) = body.rotation().to_euler(EulerRot::YXZ);
                BodyDesc {
                    name: names[&body.id()].clone(),
                    position: PositionDesc::on_grid(body.position(), sector_size),
                    rotation: DVec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees()),
                    orbit: body.orbit().map(|orbit| OrbitDesc {
                        parent: orbit.parent().and_then(|p| names.get(&p).cloned()),
                        params: orbit.params,
                    }),
                    massive: body.massive,
                }
            })
            .collect();

        let observers = universe
            .observers()
            .iter()
            .map(|obs| ObserverDesc {
                position: PositionDesc::on_grid(&obs.position, sector_size),
                render_position: obs.render_position,
                massive_distance: Some(obs.massive_distance),
            })
            .collect();

        Self {
            schema_version: SCENE_SCHEMA_VERSION,
            space: *universe.config(),
            observers,
            bodies,
        }
    }

    /// A sun, planet and moon far from the origin, with the observer near the
    /// planet. Used by the CLI when no scene file is given.
    pub fn demo() -> Self {
        let au = Length::new(1.0, LengthUnit::AstronomicalUnit);
        let sun_sector = SectorCoord::new(150_000, 0, 0);

        let mut sun = BodyDesc::new("sun");
        sun.position.sector = sun_sector;
        sun.massive = Some(MassiveScale::new(DVec3::ONE, Length::new(696_000.0, LengthUnit::Kilometer)));

        let mut planet = BodyDesc::new("planet");
        planet.orbit = Some(OrbitDesc {
            parent: Some("sun".into()),
            params: OrbitParams::circular(au).with_speed(1.0),
        });
        planet.massive = Some(MassiveScale::new(DVec3::ONE, Length::new(6_371.0, LengthUnit::Kilometer)));

        let mut moon = BodyDesc::new("moon");
        moon.orbit = Some(OrbitDesc {
            parent: Some("planet".into()),
            params: OrbitParams::circular(Length::new(384_400.0, LengthUnit::Kilometer))
                .with_oblateness(0.05)
                .with_tilt(DVec3::new(5.1, 0.0, 0.0))
                .with_speed(13.0),
        });
        moon.massive = Some(MassiveScale::new(DVec3::ONE, Length::new(1_737.0, LengthUnit::Kilometer)));

        let observer = ObserverDesc {
            position: PositionDesc {
                local: DVec3::ZERO,
                sector: SectorCoord::new(150_000, 0, 149_590),
            },
            render_position: Vec3::ZERO,
            massive_distance: Some(5.0e4),
        };

        Self {
            schema_version: SCENE_SCHEMA_VERSION,
            space: SpaceConfig::default(),
            observers: vec![observer],
            bodies: vec![sun, planet, moon],
        }
    }
}
