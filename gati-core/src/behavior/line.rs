//! Line following on the segmented contour.
//!
//! The operator controls the throttle; steering follows the contour's
//! horizontal offset through a PID law, and a second PID law on the same
//! offset trims the speed in curves.

use serde::{Deserialize, Serialize};

use crate::config::LineFollowingConfig;
use crate::control::Pid;
use crate::core::{DriveCommand, OperatorRequest};

use super::{Behavior, ModeName, Step, StepContext};

/// Modes of [`LineFollowing`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineMode {
    /// Contour visible, steering on it
    Tracking,
    /// Contour lost, previous steering kept
    Coasting,
}

impl ModeName for LineMode {
    fn as_str(&self) -> &'static str {
        match self {
            LineMode::Tracking => "TRACKING",
            LineMode::Coasting => "COASTING",
        }
    }
}

/// Line-following behavior. Initial mode COASTING.
#[derive(Clone, Debug)]
pub struct LineFollowing {
    mode: LineMode,
    angle_pid: Pid,
    speed_pid: Pid,
}

impl LineFollowing {
    /// Create the behavior with fresh PID state.
    pub fn new(config: &LineFollowingConfig) -> Self {
        Self {
            mode: LineMode::Coasting,
            angle_pid: Pid::new(config.angle_pid, 0.0),
            speed_pid: Pid::new(config.speed_pid, 0.0),
        }
    }
}

impl Default for LineFollowing {
    fn default() -> Self {
        Self::new(&LineFollowingConfig::default())
    }
}

impl Behavior for LineFollowing {
    type Mode = LineMode;

    fn name(&self) -> &'static str {
        "line_following"
    }

    fn mode(&self) -> LineMode {
        self.mode
    }

    fn step(&mut self, ctx: &mut StepContext<'_, '_>) -> Step {
        let input = &ctx.frame.input;
        let manual_speed = input.speed();

        let Some(contour) = ctx.frame.contour else {
            self.mode = LineMode::Coasting;
            return Step::drive(DriveCommand::new(manual_speed, ctx.previous.angle));
        };
        self.mode = LineMode::Tracking;

        let mid_x = ctx.frame.depth.center().col as f32;
        let normalized = if mid_x > 0.0 {
            (mid_x - contour.center.col as f32) / mid_x
        } else {
            0.0
        };

        let angle = self.angle_pid.update(normalized, ctx.dt);
        let trim = self.speed_pid.update(normalized, ctx.dt);
        let speed = if input.is_driving() {
            manual_speed * (1.0 - trim.abs())
        } else {
            manual_speed
        };

        tracing::trace!(normalized, angle, speed, "Line law");
        Step::drive(DriveCommand::new(speed, angle))
    }

    fn handle_request(
        &mut self,
        _request: OperatorRequest,
        _decided: DriveCommand,
        _ctx: &mut StepContext<'_, '_>,
    ) -> Option<DriveCommand> {
        None
    }
}
