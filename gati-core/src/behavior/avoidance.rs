//! Obstacle avoidance: manual driving with collision, drop-off and ramp
//! protection.
//!
//! ```text
//!                 front clears / back-off release
//!        +-------------------------------------------+
//!        v                                           |
//!   FORWARD --front--> OBSTACLE_STOP ----ramp----> RAMP --front clear & cliff--> RAMP_STEEP
//!      |  \--ramp-----------------------------------^                                 |
//!      |                                                                              |
//!      +--cliff--> VOID_STOP (operator FORWARD request only)     FORWARD <--no cliff--+
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{DriveCommand, OperatorRequest};
use crate::control::laws::{self, Bounds};
use crate::sensing::{ObstacleModel, SearchWindow, depth_run, nearest_or};

use super::{Behavior, ModeName, Step, StepContext};

/// Speed factor while anything is within 8M.
const SLOW_FACTOR: f32 = 0.25;

/// Steering bias away from a single side obstacle while driving forward.
const SIDE_BIAS: f32 = 0.5;

/// Extra penalty on the stop error once inside M.
const TOO_CLOSE_PENALTY: f32 = 0.9;

/// Highest creep speed toward an obstacle in OBSTACLE_STOP.
const CREEP_SPEED: f32 = 0.05;

/// Modes of [`ObstacleAvoidance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvoidanceMode {
    /// Manual driving, slowed and biased near obstacles
    Forward,
    /// Hold station at M in front of an obstacle
    ObstacleStop,
    /// Floor missing ahead
    VoidStop,
    /// Climbing a ramp
    Ramp,
    /// Cresting a ramp onto an apparent drop-off
    RampSteep,
}

impl ModeName for AvoidanceMode {
    fn as_str(&self) -> &'static str {
        match self {
            AvoidanceMode::Forward => "FORWARD",
            AvoidanceMode::ObstacleStop => "OBSTACLE_STOP",
            AvoidanceMode::VoidStop => "VOID_STOP",
            AvoidanceMode::Ramp => "RAMP",
            AvoidanceMode::RampSteep => "RAMP_STEEP",
        }
    }
}

/// Obstacle-avoidance state machine. Initial mode FORWARD.
#[derive(Clone, Debug)]
pub struct ObstacleAvoidance {
    mode: AvoidanceMode,
    /// Closest center reading since entering OBSTACLE_STOP
    stop_closest: Option<f32>,
}

impl Default for ObstacleAvoidance {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleAvoidance {
    /// Create the behavior in FORWARD mode.
    pub fn new() -> Self {
        Self {
            mode: AvoidanceMode::Forward,
            stop_closest: None,
        }
    }

    fn enter(&mut self, mode: AvoidanceMode) {
        if mode != AvoidanceMode::ObstacleStop {
            self.stop_closest = None;
        }
        self.mode = mode;
    }

    /// Manual driving with the slow-down factor and side bias applied.
    fn cruise(obstacles: &ObstacleModel, manual: DriveCommand) -> DriveCommand {
        let speed = if obstacles.is_general_obstacle() {
            manual.speed * SLOW_FACTOR
        } else {
            manual.speed
        };

        let angle = match obstacles.single_side_obstacle() {
            Some(left) => {
                let magnitude = if speed > 0.0 { SIDE_BIAS } else { 1.0 };
                if left { magnitude } else { -magnitude }
            }
            None => manual.angle,
        };

        DriveCommand::new(speed, angle)
    }

    fn forward(&mut self, obstacles: &ObstacleModel, manual: DriveCommand) -> Step {
        if obstacles.is_ramp_up() {
            self.enter(AvoidanceMode::Ramp);
            return Step::drive(DriveCommand::STRAIGHT);
        }
        if obstacles.is_front_obstacle() {
            self.enter(AvoidanceMode::ObstacleStop);
            self.stop_closest = Some(obstacles.center.depth);
            return Step::drive(DriveCommand::new(0.0, manual.angle));
        }
        if obstacles.is_cliff() {
            self.enter(AvoidanceMode::VoidStop);
            return Step::drive(DriveCommand::STOP);
        }
        Step::drive(Self::cruise(obstacles, manual))
    }

    fn obstacle_stop(
        &mut self,
        ctx: &StepContext<'_, '_>,
        obstacles: &ObstacleModel,
        manual: DriveCommand,
    ) -> Step {
        if !obstacles.is_front_obstacle() {
            self.enter(AvoidanceMode::Forward);
            return Step::drive(Self::cruise(obstacles, manual));
        }
        if obstacles.is_ramp_up() {
            self.enter(AvoidanceMode::Ramp);
            return Step::drive(DriveCommand::STRAIGHT);
        }

        // Back-off release: once the stop law has pushed the obstacle inside
        // M, a reading back at 2M means the vehicle retreated far enough.
        let min_distance = ctx.config.min_distance;
        let center = obstacles.center.depth;
        let closest = self.stop_closest.map_or(center, |c| c.min(center));
        self.stop_closest = Some(closest);
        if closest < min_distance && center >= 2.0 * min_distance {
            tracing::debug!(closest, center, "Back-off release");
            self.enter(AvoidanceMode::Forward);
            return Step::drive(Self::cruise(obstacles, manual));
        }

        Step::drive(Self::stop_law(ctx, manual))
    }

    /// Hold the vehicle at M in front of the nearest thing across the
    /// full image width.
    fn stop_law(ctx: &StepContext<'_, '_>, manual: DriveCommand) -> DriveCommand {
        let map = ctx.frame.depth;
        let probes = &ctx.config.probes;
        let min_distance = ctx.config.min_distance;
        let mid = map.center();

        let window = SearchWindow::around(mid, mid.col.saturating_sub(1), probes.front_half_y)
            .shifted(-(probes.front_lift as isize), 0);
        let (position, depth) = nearest_or(map, window, ctx.config.max_distance);

        let lateral = match position {
            Some(pos) if mid.col > 0 => {
                // Steer off the middle of the tied run, not its first pixel
                let run = depth_run(map, pos.row, pos.col, depth, 0.0);
                let (start, end) = match window.clip(map.width(), map.height()) {
                    Some((_, cols)) => (run.start.max(cols.start), run.end.min(cols.end)),
                    None => (run.start, run.end),
                };
                let col = (start + end).saturating_sub(1) as f32 / 2.0;
                let mid_x = mid.col as f32;
                2.0 * (mid_x - col) / mid_x
            }
            _ => 0.0,
        };
        let angle_error = 2.0 * lateral;
        let angle = if angle_error.abs() > 0.95 {
            angle_error.signum()
        } else {
            manual.angle
        };

        let mut error = (min_distance - depth) / min_distance;
        if error > 0.0 {
            error += TOO_CLOSE_PENALTY;
        }
        let speed = laws::instantaneous(-error, Bounds::new(-1.0, CREEP_SPEED));
        let speed = laws::snap_to_zero(speed, error, 0.1, 0.05);

        tracing::trace!(depth, error, speed, angle, "Obstacle stop law");
        DriveCommand::new(speed, angle)
    }

    fn void_stop(ctx: &StepContext<'_, '_>) -> Step {
        let map = ctx.frame.depth;
        let probe = ctx.config.probes.void;
        let mid = map.center();

        let window = SearchWindow::around(mid, probe.half_x, probe.half_y)
            .shifted((mid.row / 2) as isize, 0);
        let (_, depth) = nearest_or(map, window, ctx.config.max_distance);

        if depth < 4.0 * ctx.config.min_distance {
            Step::drive(DriveCommand::new(-1.0, 0.0))
        } else {
            Step::drive(DriveCommand::STOP)
        }
    }

    fn ramp(&mut self, ctx: &StepContext<'_, '_>, obstacles: &ObstacleModel) -> Step {
        if !obstacles.is_front_obstacle() && obstacles.is_cliff() {
            self.enter(AvoidanceMode::RampSteep);
            return Step::hold(
                DriveCommand::STRAIGHT,
                ctx.config.override_durations.ramp_steep,
            );
        }
        Step::drive(DriveCommand::STRAIGHT)
    }

    fn ramp_steep(&mut self, obstacles: &ObstacleModel, manual: DriveCommand) -> Step {
        if !obstacles.is_cliff() {
            self.enter(AvoidanceMode::Forward);
            return Step::drive(Self::cruise(obstacles, manual));
        }
        Step::drive(DriveCommand::STRAIGHT)
    }
}

impl Behavior for ObstacleAvoidance {
    type Mode = AvoidanceMode;

    fn name(&self) -> &'static str {
        "avoidance"
    }

    fn mode(&self) -> AvoidanceMode {
        self.mode
    }

    fn step(&mut self, ctx: &mut StepContext<'_, '_>) -> Step {
        let obstacles = ObstacleModel::sample(ctx.frame.depth, ctx.config);
        let manual = ctx.frame.input.manual_command();

        match self.mode {
            AvoidanceMode::Forward => self.forward(&obstacles, manual),
            AvoidanceMode::ObstacleStop => self.obstacle_stop(ctx, &obstacles, manual),
            AvoidanceMode::VoidStop => Self::void_stop(ctx),
            AvoidanceMode::Ramp => self.ramp(ctx, &obstacles),
            AvoidanceMode::RampSteep => self.ramp_steep(&obstacles, manual),
        }
    }

    fn handle_request(
        &mut self,
        request: OperatorRequest,
        _decided: DriveCommand,
        ctx: &mut StepContext<'_, '_>,
    ) -> Option<DriveCommand> {
        match request {
            OperatorRequest::Forward => {
                self.enter(AvoidanceMode::Forward);
                Some(ctx.frame.input.manual_command())
            }
            _ => None,
        }
    }
}
