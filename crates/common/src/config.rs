use serde::{Deserialize, Serialize};

/// Space-wide configuration shared by every body in a universe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    /// Sector edge length in metres. Local coordinates snap into sectors
    /// once they exceed this magnitude. Non-positive disables snapping.
    pub sector_size: f64,
    /// Horizon used by massive bodies when no observer overrides it.
    pub massive_distance: f64,
    /// When true, orbit angles do not advance but positions still recompute.
    pub paused: bool,
}

impl SpaceConfig {
    /// Default sector edge, 1000 km.
    pub const DEFAULT_SECTOR_SIZE: f64 = 1.0e6;
    /// Default massive horizon, 10 km.
    pub const DEFAULT_MASSIVE_DISTANCE: f64 = 1.0e4;
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            sector_size: Self::DEFAULT_SECTOR_SIZE,
            massive_distance: Self::DEFAULT_MASSIVE_DISTANCE,
            paused: false,
        }
    }
}
