use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Integer address of a sector (macro-cell) in the floating-origin grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectorCoord {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl SectorCoord {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// `other - self` per axis, widened before converting so the subtraction
    /// itself can't overflow.
    pub fn delta_to(self, other: Self) -> DVec3 {
        DVec3::new(
            (other.x as i128 - self.x as i128) as f64,
            (other.y as i128 - self.y as i128) as f64,
            (other.z as i128 - self.z as i128) as f64,
        )
    }

    pub fn as_dvec3(self) -> DVec3 {
        DVec3::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

impl std::fmt::Display for SectorCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_antisymmetric() {
        let a = SectorCoord::new(3, -2, 7);
        let b = SectorCoord::new(-1, 4, 7);
        assert_eq!(a.delta_to(b), DVec3::new(-4.0, 6.0, 0.0));
        assert_eq!(b.delta_to(a), -a.delta_to(b));
    }

    #[test]
    fn delta_does_not_overflow_at_extremes() {
        let a = SectorCoord::new(i64::MIN, 0, 0);
        let b = SectorCoord::new(i64::MAX, 0, 0);
        assert!(a.delta_to(b).x > 0.0);
    }

    #[test]
    fn display_lists_axes() {
        assert_eq!(SectorCoord::new(1, 2, -3).to_string(), "[1, 2, -3]");
    }
}
