//! Per-behavior state machines.
//!
//! A behavior owns its mode and any law memory. The surrounding
//! [`DriveController`](crate::DriveController) owns everything the behaviors
//! share (override timer, momentum window, previous command) and hands it
//! over through a [`StepContext`] once per evaluated tick.
//!
//! | Behavior | Modes |
//! |----------|-------|
//! | [`ObstacleAvoidance`] | FORWARD, OBSTACLE_STOP, VOID_STOP, RAMP, RAMP_STEEP |
//! | [`Parking`] (wall / cone) | FORWARD, SEARCH, COMPLETE_STOP, FORCE_REVERSING |
//! | [`LineFollowing`] | TRACKING, COASTING |
//! | [`ShapeDriving`] | IDLE, CIRCLE, SQUARE, FIGURE_EIGHT |

use std::fmt::Debug;

use crate::config::ControllerConfig;
use crate::core::{DriveCommand, Frame, OperatorRequest};
use crate::sensing::MomentumTracker;

mod avoidance;
mod line;
mod parking;
mod shapes;

pub use avoidance::{AvoidanceMode, ObstacleAvoidance};
pub use line::{LineFollowing, LineMode};
pub use parking::{Parking, ParkingMode, ParkingTarget};
pub use shapes::{ShapeDriving, ShapeMode};

/// Closed set of modes of one behavior.
pub trait ModeName: Copy + Eq + Debug {
    /// Upper-case name used in logs and traces.
    fn as_str(&self) -> &'static str;
}

/// Shared state lent to a behavior for one evaluated tick.
pub struct StepContext<'a, 'f> {
    /// Inputs of this tick
    pub frame: &'a Frame<'f>,
    /// Controller configuration
    pub config: &'a ControllerConfig,
    /// Approach estimate, owned by the controller
    pub momentum: &'a mut MomentumTracker,
    /// Command issued on the previous tick
    pub previous: DriveCommand,
    /// Sanitized elapsed seconds (never negative)
    pub dt: f32,
}

/// Outcome of one evaluated tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// Command to issue
    pub command: DriveCommand,
    /// Arm the override timer for this many seconds
    pub hold_for: Option<f32>,
}

impl Step {
    /// Issue a command, no override.
    #[inline]
    pub fn drive(command: DriveCommand) -> Self {
        Self {
            command,
            hold_for: None,
        }
    }

    /// Issue a command and hold it blindly for `secs`.
    #[inline]
    pub fn hold(command: DriveCommand, secs: f32) -> Self {
        Self {
            command,
            hold_for: Some(secs),
        }
    }
}

/// A per-frame driving state machine.
pub trait Behavior {
    /// Mode enum of this behavior
    type Mode: ModeName;

    /// Short behavior name for logs.
    fn name(&self) -> &'static str;

    /// Currently active mode.
    fn mode(&self) -> Self::Mode;

    /// Evaluate one tick: apply transitions and compute the command.
    ///
    /// Never called while the override timer is running.
    fn step(&mut self, ctx: &mut StepContext<'_, '_>) -> Step;

    /// Apply an operator request after the tick's own decision.
    ///
    /// Returns the command to issue instead of `decided` when the request is
    /// honored, `None` when this behavior ignores it. An honored request
    /// cancels any running override.
    fn handle_request(
        &mut self,
        request: OperatorRequest,
        decided: DriveCommand,
        ctx: &mut StepContext<'_, '_>,
    ) -> Option<DriveCommand>;
}
