//! Proportional control laws.
//!
//! Pure functions of (error, elapsed time, previous output). Two families:
//!
//! - **Smoothed**: `clamp(prev + kp * error * dt)`, the output integrates
//!   toward the target. Used for parking speed and steering.
//! - **Instantaneous**: `clamp(f(error))`, no memory. Used for the
//!   OBSTACLE_STOP speed.

/// Inclusive output range of a law.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Lowest allowed output
    pub min: f32,
    /// Highest allowed output
    pub max: f32,
}

impl Bounds {
    /// Full actuator range [-1, 1].
    pub const UNIT: Bounds = Bounds {
        min: -1.0,
        max: 1.0,
    };

    /// Create bounds. Swapped limits are reordered.
    #[inline]
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Clamp a value into the bounds. `NaN` is treated as zero.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return 0.0_f32.clamp(self.min, self.max);
        }
        value.clamp(self.min, self.max)
    }
}

/// `clamp(prev + kp * error * dt)`.
#[inline]
pub fn smoothed(prev: f32, kp: f32, error: f32, dt: f32, bounds: Bounds) -> f32 {
    bounds.clamp(prev + kp * error * dt)
}

/// `clamp(value)`, the instantaneous law applied to an already mapped error.
#[inline]
pub fn instantaneous(value: f32, bounds: Bounds) -> f32 {
    bounds.clamp(value)
}

/// Check if both the output and the error are inside their dead bands.
#[inline]
pub fn in_dead_band(output: f32, error: f32, output_band: f32, error_band: f32) -> bool {
    output.abs() < output_band && error.abs() < error_band
}

/// Zero the output when both it and the error are inside their dead bands.
///
/// Stops the vehicle from hunting back and forth around the target.
#[inline]
pub fn snap_to_zero(output: f32, error: f32, output_band: f32, error_band: f32) -> f32 {
    if in_dead_band(output, error, output_band, error_band) {
        0.0
    } else {
        output
    }
}

/// Speed cap that shrinks with distance: `clamp(|depth / scale|, 0.05, 1)`.
#[inline]
pub fn speed_limit(depth: f32, scale: f32) -> f32 {
    (depth / scale).abs().clamp(0.05, 1.0)
}

/// Emit zero instead of reversing direction within a single tick.
///
/// `previous` is the output of the previous tick. A candidate with the
/// opposite sign passes through zero first, so two consecutive nonzero
/// outputs never differ in sign.
#[inline]
pub fn guard_zero_crossing(candidate: f32, previous: f32) -> f32 {
    if candidate * previous < 0.0 {
        0.0
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smoothed_integrates_and_clamps() {
        let out = smoothed(0.2, 200.0, 0.01, 0.1, Bounds::UNIT);
        assert_relative_eq!(out, 0.4, epsilon = 1e-6);

        let out = smoothed(0.2, 200.0, 1.0, 0.1, Bounds::new(-1.0, 0.5));
        assert_eq!(out, 0.5);

        let out = smoothed(0.2, 200.0, -1.0, 0.1, Bounds::new(-1.0, 0.5));
        assert_eq!(out, -1.0);
    }

    #[test]
    fn test_smoothed_zero_dt_holds() {
        assert_eq!(smoothed(0.3, 200.0, 5.0, 0.0, Bounds::UNIT), 0.3);
    }

    #[test]
    fn test_instantaneous() {
        assert_eq!(instantaneous(-1.9, Bounds::new(-1.0, 0.05)), -1.0);
        assert_eq!(instantaneous(0.5, Bounds::new(-1.0, 0.05)), 0.05);
        assert_eq!(instantaneous(f32::NAN, Bounds::new(-1.0, 0.05)), 0.0);
    }

    #[test]
    fn test_bounds_reordered() {
        let bounds = Bounds::new(0.5, -0.2);
        assert_eq!(bounds.min, -0.2);
        assert_eq!(bounds.max, 0.5);
    }

    #[test]
    fn test_snap_to_zero() {
        assert_eq!(snap_to_zero(0.02, 0.005, 0.03, 0.01), 0.0);
        assert_eq!(snap_to_zero(0.02, 0.02, 0.03, 0.01), 0.02);
        assert_eq!(snap_to_zero(0.5, 0.0, 0.03, 0.01), 0.5);
    }

    #[test]
    fn test_speed_limit() {
        assert_eq!(speed_limit(1.0, 160.0), 0.05);
        assert_relative_eq!(speed_limit(80.0, 160.0), 0.5);
        assert_eq!(speed_limit(400.0, 160.0), 1.0);
    }

    #[test]
    fn test_zero_crossing_guard() {
        assert_eq!(guard_zero_crossing(-0.3, 0.4), 0.0);
        assert_eq!(guard_zero_crossing(0.3, 0.4), 0.3);
        assert_eq!(guard_zero_crossing(-0.3, 0.0), -0.3);
    }
}
