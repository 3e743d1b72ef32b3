//! Sections for the behaviors that do not use the shared controller record.

use serde::{Deserialize, Serialize};

use crate::control::PidGains;
use crate::error::{GatiError, Result};

use super::defaults;

/// Line-following PID gains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineFollowingConfig {
    /// Steering law on the normalized contour offset
    #[serde(default = "defaults::line_angle_pid")]
    pub angle_pid: PidGains,

    /// Speed reduction law on the normalized contour offset
    #[serde(default = "defaults::line_speed_pid")]
    pub speed_pid: PidGains,
}

impl Default for LineFollowingConfig {
    fn default() -> Self {
        Self {
            angle_pid: defaults::line_angle_pid(),
            speed_pid: defaults::line_speed_pid(),
        }
    }
}

impl LineFollowingConfig {
    /// Reject unusable gains.
    pub fn validate(&self) -> Result<()> {
        self.angle_pid.validate("line_following.angle_pid")?;
        self.speed_pid.validate("line_following.speed_pid")
    }
}

/// Shape-driving timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Seconds of full lock for a quarter turn
    #[serde(default = "defaults::quarter_turn_secs")]
    pub quarter_turn_secs: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            quarter_turn_secs: defaults::quarter_turn_secs(),
        }
    }
}

impl ShapeConfig {
    /// Reject a non-positive quarter-turn time.
    pub fn validate(&self) -> Result<()> {
        if self.quarter_turn_secs.is_finite() && self.quarter_turn_secs > 0.0 {
            Ok(())
        } else {
            Err(GatiError::config(format!(
                "shapes.quarter_turn_secs must be positive, got {}",
                self.quarter_turn_secs
            )))
        }
    }
}
