use farspace_common::SpaceConfig;
use glam::{DVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::sector::SectorCoord;

/// A location in floating-origin space.
///
/// The represented point is `sector * sector_size + local` on each axis.
/// `local` stays small (within one sector edge after [`snap_local`]) so that
/// double-precision arithmetic on it keeps sub-millimetre accuracy however
/// far the sector is from the origin.
///
/// Callers may accumulate into `local` directly and snap afterwards.
/// Positions are plain values: every body owns its own copy.
///
/// [`snap_local`]: AbsolutePosition::snap_local
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbsolutePosition {
    pub local: DVec3,
    pub sector: SectorCoord,
    #[serde(default = "default_sector_size")]
    sector_size: f64,
}

fn default_sector_size() -> f64 {
    SpaceConfig::DEFAULT_SECTOR_SIZE
}

impl Default for AbsolutePosition {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl AbsolutePosition {
    /// Origin of sector zero with the default sector size.
    pub const ORIGIN: Self = Self {
        local: DVec3::ZERO,
        sector: SectorCoord::ZERO,
        sector_size: SpaceConfig::DEFAULT_SECTOR_SIZE,
    };

    pub fn new(local: DVec3, sector: SectorCoord) -> Self {
        Self {
            local,
            sector,
            sector_size: default_sector_size(),
        }
    }

    /// Same sector and local offset, measured against a different sector edge.
    ///
    /// A non-positive or non-finite size disables snapping; the sector index
    /// then contributes nothing to the represented location.
    pub fn with_sector_size(mut self, sector_size: f64) -> Self {
        self.sector_size = sector_size;
        self
    }

    /// Build a snapped position from a single double-precision world vector.
    pub fn from_world(world: DVec3, sector_size: f64) -> Self {
        let mut pos = Self::new(world, SectorCoord::ZERO).with_sector_size(sector_size);
        pos.snap_local();
        pos
    }

    pub fn sector_size(&self) -> f64 {
        self.sector_size
    }

    pub fn snapping_enabled(&self) -> bool {
        self.sector_size.is_finite() && self.sector_size > 0.0
    }

    /// Sector edge used when turning the sector index into metres.
    fn sector_extent(&self) -> f64 {
        if self.snapping_enabled() {
            self.sector_size
        } else {
            0.0
        }
    }

    /// Fold any local axis larger than one sector edge into the sector index.
    ///
    /// After snapping each folded axis lies within half a sector of zero, so a
    /// second call finds nothing over the threshold and changes nothing.
    pub fn snap_local(&mut self) {
        if !self.snapping_enabled() {
            return;
        }
        let size = self.sector_size;
        snap_axis(&mut self.local.x, &mut self.sector.x, size);
        snap_axis(&mut self.local.y, &mut self.sector.y, size);
        snap_axis(&mut self.local.z, &mut self.sector.z, size);
    }

    /// True when no local axis exceeds the sector edge.
    pub fn is_snapped(&self) -> bool {
        !self.snapping_enabled() || self.local.abs().max_element() <= self.sector_size
    }

    /// Add `offset` to the local coordinates and snap.
    pub fn translate(&mut self, offset: DVec3) {
        self.local += offset;
        self.snap_local();
    }

    /// `self` moved by `offset`, snapped.
    pub fn offset_by(mut self, offset: DVec3) -> Self {
        self.translate(offset);
        self
    }

    /// Double-precision displacement from `from` to `to`.
    ///
    /// The sector difference is taken in integers first, so two positions a
    /// light year from the origin but a metre apart still differ by exactly a
    /// metre. `relative(b, a)` is the exact negation of `relative(a, b)`.
    ///
    /// Positions on different sector grids fall back to subtracting each
    /// sector's offset in metres, which is as lossy as [`to_world_lossy`].
    /// Bring both onto one grid with [`rebased`] first to avoid that.
    ///
    /// [`to_world_lossy`]: AbsolutePosition::to_world_lossy
    /// [`rebased`]: AbsolutePosition::rebased
    pub fn relative(from: &Self, to: &Self) -> DVec3 {
        let sectors = if from.sector_extent() == to.sector_extent() {
            from.sector.delta_to(to.sector) * to.sector_extent()
        } else {
            to.sector.as_dvec3() * to.sector_extent() - from.sector.as_dvec3() * from.sector_extent()
        };
        sectors + (to.local - from.local)
    }

    /// Euclidean distance between two positions.
    pub fn distance(a: &Self, b: &Self) -> f64 {
        Self::relative(a, b).length()
    }

    /// Displacement from `from` to `to` multiplied by `scale`, narrowed to
    /// single precision for a render transform.
    pub fn vector(from: &Self, to: &Self, scale: f64) -> Vec3 {
        (Self::relative(from, to) * scale).as_vec3()
    }

    /// Where this position renders for an observer drawn at `observer_render`.
    pub fn render_position(&self, observer: &Self, observer_render: Vec3, scale: f64) -> Vec3 {
        observer_render + Self::vector(observer, self, scale)
    }

    /// The same location expressed on a grid with a different sector edge.
    ///
    /// The sector offset is snapped on its own before the local offset is
    /// added back, so the local part keeps its precision. The sector part is
    /// exact while `sector * sector_size` fits in the 53-bit mantissa.
    pub fn rebased(&self, sector_size: f64) -> Self {
        if self.sector_size == sector_size {
            return *self;
        }
        let sector_metres = self.sector.as_dvec3() * self.sector_extent();
        let mut out = Self::new(sector_metres, SectorCoord::ZERO).with_sector_size(sector_size);
        out.snap_local();
        out.local += self.local;
        out.snap_local();
        out
    }

    /// Collapse into one world vector. Loses precision far from the origin;
    /// meant for display and coarse checks only.
    pub fn to_world_lossy(&self) -> DVec3 {
        self.sector.as_dvec3() * self.sector_extent() + self.local
    }
}

fn snap_axis(local: &mut f64, sector: &mut i64, size: f64) {
    if !local.is_finite() {
        tracing::warn!(local = *local, "non-finite local coordinate left unsnapped");
        return;
    }
    if local.abs() <= size {
        return;
    }
    let cells = (*local / size).round();
    // `i64::MAX as f64` rounds up to 2^63, so the bound is exclusive.
    let moved = if cells.abs() < i64::MAX as f64 {
        sector.checked_add(cells as i64)
    } else {
        None
    };
    let Some(moved) = moved else {
        tracing::warn!(
            local = *local,
            sector = *sector,
            "sector index overflow, axis left unsnapped"
        );
        return;
    };
    *local -= cells * size;
    *sector = moved;
}

impl AddAssign<DVec3> for AbsolutePosition {
    /// Accumulate into the local coordinates without snapping.
    fn add_assign(&mut self, offset: DVec3) {
        self.local += offset;
    }
}

impl std::fmt::Display for AbsolutePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sector {} + ({:.3}, {:.3}, {:.3})",
            self.sector, self.local.x, self.local.y, self.local.z
        )
    }
}
