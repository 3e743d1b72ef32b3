//! Per-controller configuration record.

use serde::{Deserialize, Serialize};

use crate::error::{GatiError, Result};

use super::defaults;

/// Half-extents of a search window in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    /// Horizontal half-extent
    pub half_x: usize,
    /// Vertical half-extent
    pub half_y: usize,
}

impl Extent {
    /// Create an extent.
    pub const fn new(half_x: usize, half_y: usize) -> Self {
        Self { half_x, half_y }
    }
}

/// Durations of the blind override states (seconds).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverrideDurations {
    /// Straight driving held after cresting onto a steep ramp
    #[serde(default = "defaults::ramp_steep_secs")]
    pub ramp_steep: f32,

    /// Reverse time when a parking approach is aborted
    #[serde(default = "defaults::force_reverse_secs")]
    pub force_reverse: f32,
}

impl Default for OverrideDurations {
    fn default() -> Self {
        Self {
            ramp_steep: defaults::ramp_steep_secs(),
            force_reverse: defaults::force_reverse_secs(),
        }
    }
}

/// Search window sizes used by the probes.
///
/// Offsets are derived from the image size; only the extents are tunable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbeWindows {
    /// Wide window at the image center
    #[serde(default = "defaults::center_probe")]
    pub center: Extent,

    /// Left/right windows, a quarter width off center
    #[serde(default = "defaults::side_probe")]
    pub side: Extent,

    /// Top/bottom windows, a quarter height off center
    #[serde(default = "defaults::vertical_probe")]
    pub vertical: Extent,

    /// Vertical half-extent of the full-width OBSTACLE_STOP probe
    #[serde(default = "defaults::front_probe_half_y")]
    pub front_half_y: usize,

    /// Rows the OBSTACLE_STOP probe sits above center
    #[serde(default = "defaults::front_probe_lift")]
    pub front_lift: usize,

    /// VOID_STOP floor re-probe below center
    #[serde(default = "defaults::void_probe")]
    pub void: Extent,

    /// Wall-parking edge probes, two thirds of half width off center
    #[serde(default = "defaults::wall_edge_probe")]
    pub wall_edge: Extent,

    /// Cone-parking depth probe around the contour center
    #[serde(default = "defaults::cone_probe")]
    pub cone: Extent,
}

impl Default for ProbeWindows {
    fn default() -> Self {
        Self {
            center: defaults::center_probe(),
            side: defaults::side_probe(),
            vertical: defaults::vertical_probe(),
            front_half_y: defaults::front_probe_half_y(),
            front_lift: defaults::front_probe_lift(),
            void: defaults::void_probe(),
            wall_edge: defaults::wall_edge_probe(),
            cone: defaults::cone_probe(),
        }
    }
}

/// Configuration record handed to a controller at construction.
///
/// Distances share the depth map's unit (centimeters by default). Read on
/// its own, a record takes the generic defaults below for missing fields;
/// inside a [`GatiConfig`](super::GatiConfig) section it takes the preset of
/// that section instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Base obstacle threshold; predicates use multiples of it
    #[serde(default = "defaults::min_distance")]
    pub min_distance: f32,

    /// Distance substituted for "no reading"
    #[serde(default = "defaults::max_distance")]
    pub max_distance: f32,

    /// Parking distance
    #[serde(default = "defaults::target_depth")]
    pub target_depth: f32,

    /// Gain of the smoothed steering law
    #[serde(default = "defaults::angle_kp")]
    pub angle_kp: f32,

    /// Gain of the smoothed speed law
    #[serde(default = "defaults::speed_kp")]
    pub speed_kp: f32,

    /// Capacity of the momentum window
    #[serde(default = "defaults::momentum_window_size")]
    pub momentum_window_size: usize,

    /// Blind override durations
    #[serde(default)]
    pub override_durations: OverrideDurations,

    /// Probe window sizes
    #[serde(default)]
    pub probes: ProbeWindows,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_distance: defaults::min_distance(),
            max_distance: defaults::max_distance(),
            target_depth: defaults::target_depth(),
            angle_kp: defaults::angle_kp(),
            speed_kp: defaults::speed_kp(),
            momentum_window_size: defaults::momentum_window_size(),
            override_durations: OverrideDurations::default(),
            probes: ProbeWindows::default(),
        }
    }
}

impl ControllerConfig {
    /// Preset for the obstacle-avoidance behavior.
    pub fn obstacle_avoidance() -> Self {
        Self::default()
    }

    /// Preset for wall parking (20 cm target, gain on raw cm difference).
    pub fn wall_parking() -> Self {
        Self::default()
    }

    /// Preset for cone parking (30 cm target, gain on normalized offset).
    pub fn cone_parking() -> Self {
        Self {
            target_depth: 30.0,
            angle_kp: 0.5,
            ..Self::default()
        }
    }

    /// Reject records a controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        positive("min_distance", self.min_distance)?;
        positive("max_distance", self.max_distance)?;
        positive("target_depth", self.target_depth)?;

        if self.max_distance <= self.min_distance {
            return Err(GatiError::config(format!(
                "max_distance ({}) must exceed min_distance ({})",
                self.max_distance, self.min_distance
            )));
        }

        finite("angle_kp", self.angle_kp)?;
        finite("speed_kp", self.speed_kp)?;

        if self.momentum_window_size == 0 {
            return Err(GatiError::config("momentum_window_size must be at least 1"));
        }

        non_negative(
            "override_durations.ramp_steep",
            self.override_durations.ramp_steep,
        )?;
        non_negative(
            "override_durations.force_reverse",
            self.override_durations.force_reverse,
        )?;

        Ok(())
    }
}

fn finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GatiError::config(format!("{} must be finite, got {}", name, value)))
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(GatiError::config(format!("{} must be positive, got {}", name, value)))
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(GatiError::config(format!(
            "{} must not be negative, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(ControllerConfig::obstacle_avoidance().validate().is_ok());
        assert!(ControllerConfig::wall_parking().validate().is_ok());
        assert!(ControllerConfig::cone_parking().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_target() {
        let config = ControllerConfig {
            target_depth: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GatiError::Config(_))));

        let config = ControllerConfig {
            target_depth: -20.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = ControllerConfig {
            momentum_window_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_distances() {
        let config = ControllerConfig {
            min_distance: 50.0,
            max_distance: 40.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_gain_and_duration() {
        let config = ControllerConfig {
            speed_kp: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = ControllerConfig::default();
        config.override_durations.ramp_steep = -1.0;
        assert!(config.validate().is_err());
    }
}
