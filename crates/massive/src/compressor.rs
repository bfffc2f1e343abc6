use serde::{Deserialize, Serialize};

/// Result of compressing one distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Compression {
    pub compressed: f64,
    /// `compressed / distance`, or 1 for a non-positive distance.
    pub scale_factor: f64,
}

/// Map a true distance into `[0, horizon)`.
///
/// Identity up to half the horizon. Past that the curve is
/// `(1 - 0.5^(log10(d / half) + 1)) * horizon`, which meets the identity
/// region continuously at `half` and approaches the horizon from below.
/// Where f64 rounding would land on the horizon itself, the result is pinned
/// just under it. A non-positive or non-finite horizon disables compression.
pub fn compress_distance(distance: f64, horizon: f64) -> f64 {
    if !(horizon.is_finite() && horizon > 0.0) {
        return distance;
    }
    let half = horizon * 0.5;
    if distance < half {
        return distance;
    }
    let log = (distance / half).log10() + 1.0;
    let compressed = (1.0 - 0.5f64.powf(log)) * horizon;
    compressed.min(horizon - horizon * f64::EPSILON)
}

/// Compressor bound to one horizon distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceCompressor {
    pub horizon: f64,
}

impl DistanceCompressor {
    pub fn new(horizon: f64) -> Self {
        if !(horizon.is_finite() && horizon > 0.0) {
            tracing::debug!(horizon, "non-positive horizon, compression disabled");
        }
        Self { horizon }
    }

    pub fn is_active(&self) -> bool {
        self.horizon.is_finite() && self.horizon > 0.0
    }

    pub fn compute(&self, distance: f64) -> Compression {
        let compressed = compress_distance(distance, self.horizon);
        let scale_factor = if distance > 0.0 {
            compressed / distance
        } else {
            1.0
        };
        Compression {
            compressed,
            scale_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_is_identity() {
        for horizon in [1.0, 1000.0, 1.0e12] {
            let c = DistanceCompressor::new(horizon).compute(0.0);
            assert_eq!(c.compressed, 0.0);
            assert_eq!(c.scale_factor, 1.0);
        }
    }

    #[test]
    fn quarter_horizon_is_identity() {
        let c = DistanceCompressor::new(1000.0).compute(250.0);
        assert_eq!(c.compressed, 250.0);
        assert_eq!(c.scale_factor, 1.0);
    }

    #[test]
    fn continuous_at_half_horizon() {
        let below = compress_distance(499.999_999, 1000.0);
        let at = compress_distance(500.0, 1000.0);
        assert!((at - 500.0).abs() < 1e-9);
        assert!((at - below).abs() < 1e-5);
    }

    #[test]
    fn far_distances_approach_horizon_from_below() {
        let horizon = 1000.0;
        let mut last = compress_distance(horizon, horizon);
        for multiple in [10.0, 1000.0, 1.0e6] {
            let c = compress_distance(horizon * multiple, horizon);
            assert!(c > last, "not increasing at {multiple}x");
            assert!(c < horizon, "reached horizon at {multiple}x");
            last = c;
        }
    }

    #[test]
    fn extreme_distance_stays_below_horizon() {
        let horizon = 1000.0;
        for d in [1.0e60, 1.0e200, f64::MAX] {
            assert!(compress_distance(d, horizon) < horizon);
        }
    }

    #[test]
    fn monotonic_over_a_sweep() {
        let horizon = 5.0e4;
        let mut last = 0.0;
        let mut d = 1.0;
        while d < 1.0e15 {
            let c = compress_distance(d, horizon);
            assert!(c >= last);
            last = c;
            d *= 1.7;
        }
    }

    #[test]
    fn non_positive_horizon_disables_compression() {
        for horizon in [0.0, -5.0, f64::NAN] {
            let compressor = DistanceCompressor::new(horizon);
            assert!(!compressor.is_active());
            let c = compressor.compute(1.0e9);
            assert_eq!(c.compressed, 1.0e9);
            assert_eq!(c.scale_factor, 1.0);
        }
    }

    #[test]
    fn scale_factor_shrinks_beyond_half() {
        let c = DistanceCompressor::new(1000.0).compute(4000.0);
        assert!(c.scale_factor < 1.0);
        assert!((c.compressed - c.scale_factor * 4000.0).abs() < 1e-9);
    }
}
