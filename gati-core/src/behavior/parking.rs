//! Parking at a fixed distance from a wall or a colored cone.
//!
//! Both variants share one state machine and one pair of smoothed laws;
//! they differ in how the target is measured and in a handful of
//! thresholds, kept as one `Profile` per [`ParkingTarget`].
//!
//! ```text
//!   SEARCH <--target lost-- FORWARD --snap (wall)--> COMPLETE_STOP
//!     |                     ^  |                          |
//!     +--target in range----+  +--abort--> FORCE_REVERSING|
//!                           ^                  | timer    |
//!                           +------------------+----------+ depth > 2T
//! ```
//!
//! Distances are in multiples of the target depth T.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::ControllerConfig;
use crate::control::laws::{self, Bounds};
use crate::core::{DriveCommand, OperatorRequest};
use crate::sensing::{ObstacleModel, SearchWindow, depth_run, nearest_depth, nearest_or};

use super::{Behavior, ModeName, Step, StepContext};

/// Spin in place while looking for the target.
const SEARCH_SPIN: DriveCommand = DriveCommand {
    speed: 1.0,
    angle: 1.0,
};

/// Fixed reverse speed of FORCE_REVERSING.
const REVERSE_SPEED: f32 = -1.0;

/// Pixels within this fraction of the cone depth belong to the cone.
const CONE_DEPTH_TOLERANCE: f32 = 0.1;

/// Which surface the vehicle parks against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParkingTarget {
    /// Flat wall, squared up using two edge probes
    Wall,
    /// Colored cone reported by the segmentation collaborator
    Cone,
}

/// Per-variant thresholds.
#[derive(Clone, Copy, Debug)]
struct Profile {
    /// Target counts as in range below this many T
    range: f32,
    /// Speed cap scale in T
    limit_scale: f32,
    /// Lowest speed while approaching
    approach_reverse: f32,
    /// Highest speed while receding
    recede_forward: f32,
    /// Steering change multiplier while receding
    recede_steer: f32,
    /// Snap dead band on speed
    snap_speed: f32,
    /// Snap dead band on the speed error
    snap_error: f32,
    /// Move to COMPLETE_STOP on snap instead of latching zero speed
    stop_on_snap: bool,
}

impl ParkingTarget {
    fn profile(self) -> Profile {
        match self {
            ParkingTarget::Wall => Profile {
                range: 20.0,
                limit_scale: 8.0,
                approach_reverse: -1.0,
                recede_forward: 0.5,
                recede_steer: -10.0,
                snap_speed: 0.03,
                snap_error: 0.01,
                stop_on_snap: true,
            },
            ParkingTarget::Cone => Profile {
                range: 20.0,
                limit_scale: 6.0,
                approach_reverse: -0.5,
                recede_forward: 0.5,
                recede_steer: 1.0,
                snap_speed: 0.05,
                snap_error: 0.05,
                stop_on_snap: false,
            },
        }
    }
}

/// Momentum tracking is dropped when the nearest target edge is beyond
/// this many T.
const MOMENTUM_RANGE: f32 = 4.0;

/// COMPLETE_STOP releases once the target is beyond this many T.
const RELEASE_RANGE: f32 = 2.0;

/// Modes of [`Parking`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParkingMode {
    /// Closing in on the target
    Forward,
    /// Spinning to find the target
    Search,
    /// Parked
    CompleteStop,
    /// Blind reverse after an aborted approach
    ForceReversing,
}

impl ModeName for ParkingMode {
    fn as_str(&self) -> &'static str {
        match self {
            ParkingMode::Forward => "FORWARD",
            ParkingMode::Search => "SEARCH",
            ParkingMode::CompleteStop => "COMPLETE_STOP",
            ParkingMode::ForceReversing => "FORCE_REVERSING",
        }
    }
}

/// Target features of one frame.
#[derive(Clone, Copy, Debug)]
struct Measurement {
    /// Representative distance, tracked by momentum
    depth: f32,
    /// Nearest target edge
    min_depth: f32,
    /// Distance the speed law regulates
    regulated: f32,
    /// Input to the steering law
    angle_error: f32,
    /// Steering for an aborted approach, when one is needed
    abort: Option<f32>,
}

/// Parking state machine. Initial mode FORWARD.
#[derive(Clone, Debug)]
pub struct Parking {
    target: ParkingTarget,
    mode: ParkingMode,
    /// Zero speed latched by the snap rule (cone)
    settled: bool,
}

impl Parking {
    /// Create the behavior in FORWARD mode.
    pub fn new(target: ParkingTarget) -> Self {
        Self {
            target,
            mode: ParkingMode::Forward,
            settled: false,
        }
    }

    /// Wall parking.
    pub fn wall() -> Self {
        Self::new(ParkingTarget::Wall)
    }

    /// Cone parking.
    pub fn cone() -> Self {
        Self::new(ParkingTarget::Cone)
    }

    /// Surface this behavior parks against.
    pub fn target(&self) -> ParkingTarget {
        self.target
    }

    fn enter(&mut self, mode: ParkingMode) {
        self.settled = false;
        self.mode = mode;
    }

    fn measure(&self, ctx: &StepContext<'_, '_>) -> Option<Measurement> {
        match self.target {
            ParkingTarget::Wall => Some(measure_wall(ctx)),
            ParkingTarget::Cone => measure_cone(ctx),
        }
    }

    fn forward(&mut self, ctx: &StepContext<'_, '_>, target: Option<Measurement>) -> Step {
        let config = ctx.config;
        let profile = self.target.profile();
        let t = config.target_depth;

        let Some(m) = target.filter(|m| m.depth < profile.range * t) else {
            self.enter(ParkingMode::Search);
            return Step::drive(SEARCH_SPIN);
        };

        let error = (m.regulated - t) / t;

        if let Some(away) = m.abort {
            tracing::debug!(depth = m.depth, away, "Approach aborted");
            self.enter(ParkingMode::ForceReversing);
            return Step::hold(
                DriveCommand::new(REVERSE_SPEED, away),
                config.override_durations.force_reverse,
            );
        }

        let previous = ctx.previous;
        let limit = laws::speed_limit(m.depth, profile.limit_scale * t);
        let mut angle_change = config.angle_kp * m.angle_error * ctx.dt;

        let bounds = if ctx.momentum.is_approaching(m.depth) {
            Bounds::new(profile.approach_reverse, limit)
        } else {
            angle_change *= profile.recede_steer;
            Bounds::new(-limit, profile.recede_forward)
        };
        let angle = Bounds::UNIT.clamp(previous.angle + angle_change);

        if self.settled && error.abs() < profile.snap_error {
            return Step::drive(DriveCommand::new(0.0, angle));
        }
        self.settled = false;

        let speed = laws::smoothed(previous.speed, config.speed_kp, error, ctx.dt, bounds);
        let speed = laws::guard_zero_crossing(speed, previous.speed);

        tracing::trace!(depth = m.depth, error, speed, angle, "Parking law");

        if laws::in_dead_band(speed, error, profile.snap_speed, profile.snap_error) {
            if profile.stop_on_snap {
                self.enter(ParkingMode::CompleteStop);
                return Step::drive(DriveCommand::STOP);
            }
            self.settled = true;
            return Step::drive(DriveCommand::new(0.0, angle));
        }

        Step::drive(DriveCommand::new(speed, angle))
    }

    fn search(&mut self, ctx: &StepContext<'_, '_>, target: Option<Measurement>) -> Step {
        let range = self.target.profile().range * ctx.config.target_depth;
        if target.is_some_and(|m| m.depth < range) {
            self.enter(ParkingMode::Forward);
        }
        Step::drive(SEARCH_SPIN)
    }

    fn complete_stop(&mut self, ctx: &StepContext<'_, '_>, target: Option<Measurement>) -> Step {
        let release = RELEASE_RANGE * ctx.config.target_depth;
        if target.is_some_and(|m| m.depth > release) {
            self.enter(ParkingMode::Forward);
        }
        Step::drive(DriveCommand::STOP)
    }
}

impl Behavior for Parking {
    type Mode = ParkingMode;

    fn name(&self) -> &'static str {
        match self.target {
            ParkingTarget::Wall => "wall_parking",
            ParkingTarget::Cone => "cone_parking",
        }
    }

    fn mode(&self) -> ParkingMode {
        self.mode
    }

    fn step(&mut self, ctx: &mut StepContext<'_, '_>) -> Step {
        let target = self.measure(ctx);

        match target {
            Some(m) if m.min_depth > MOMENTUM_RANGE * ctx.config.target_depth => {
                ctx.momentum.reset();
            }
            Some(m) => ctx.momentum.push(m.depth),
            // Samples from before a lost target say nothing about the next one
            None => ctx.momentum.reset(),
        }

        match self.mode {
            ParkingMode::Forward => self.forward(ctx, target),
            ParkingMode::Search => self.search(ctx, target),
            ParkingMode::CompleteStop => self.complete_stop(ctx, target),
            ParkingMode::ForceReversing => {
                // Only reached once the override has run out
                self.enter(ParkingMode::Forward);
                Step::drive(ctx.previous.with_angle(0.0))
            }
        }
    }

    fn handle_request(
        &mut self,
        request: OperatorRequest,
        decided: DriveCommand,
        _ctx: &mut StepContext<'_, '_>,
    ) -> Option<DriveCommand> {
        match request {
            OperatorRequest::Forward => {
                self.enter(ParkingMode::Forward);
                Some(decided)
            }
            OperatorRequest::CompleteStop => {
                self.enter(ParkingMode::CompleteStop);
                Some(DriveCommand::STOP)
            }
            _ => None,
        }
    }
}

/// Two edge probes two thirds of the half width off center. Steering
/// squares the vehicle up to the wall; speed regulates the nearer edge.
fn measure_wall(ctx: &StepContext<'_, '_>) -> Measurement {
    let config: &ControllerConfig = ctx.config;
    let map = ctx.frame.depth;
    let mid = map.center();
    let edge = config.probes.wall_edge;
    let offset = (mid.col / 3 * 2) as isize;

    let window = SearchWindow::around(mid, edge.half_x, edge.half_y);
    let (_, lhs) = nearest_or(map, window.shifted(0, -offset), config.max_distance);
    let (_, rhs) = nearest_or(map, window.shifted(0, offset), config.max_distance);

    let t = config.target_depth;
    let min_depth = lhs.min(rhs);
    let delta = (lhs - rhs).abs();
    let error = (min_depth - t) / t;

    // Strongly skewed wall close by: back off and re-approach
    let abort = (error < 1.0 && delta > t).then(|| if lhs < rhs { 1.0 } else { -1.0 });

    Measurement {
        depth: (lhs + rhs) / 2.0,
        min_depth,
        regulated: min_depth,
        angle_error: lhs - rhs,
        abort,
    }
}

/// Depth around the contour center; steering from its horizontal offset.
fn measure_cone(ctx: &StepContext<'_, '_>) -> Option<Measurement> {
    let config = ctx.config;
    let map = ctx.frame.depth;
    let contour = ctx.frame.contour?;
    let probe = config.probes.cone;

    let depth = nearest_depth(
        map,
        SearchWindow::around(contour.center, probe.half_x, probe.half_y),
    )?;

    let mid_x = map.center().col as f32;
    let angle_error = if mid_x > 0.0 {
        (contour.center.col as f32 - mid_x) / mid_x
    } else {
        0.0
    };

    let cone = cone_columns(ctx, contour.center.col, depth);
    let obstacles = ObstacleModel::sample_excluding(map, config, cone);
    let abort = match (obstacles.is_left_obstacle(), obstacles.is_right_obstacle()) {
        (true, false) => Some(1.0),
        (false, true) => Some(-1.0),
        (true, true) if obstacles.left.depth <= obstacles.right.depth => Some(1.0),
        (true, true) => Some(-1.0),
        (false, false) => None,
    };

    Some(Measurement {
        depth,
        min_depth: depth,
        regulated: depth,
        angle_error,
        abort,
    })
}

/// Column span of the cone across the rows the side windows cover: the
/// union of the depth runs through `col` on each of those rows.
fn cone_columns(ctx: &StepContext<'_, '_>, col: usize, depth: f32) -> Range<usize> {
    let map = ctx.frame.depth;
    let side = ctx.config.probes.side;
    let mid = map.center();
    let rows = mid.row.saturating_sub(side.half_y)..(mid.row + side.half_y).min(map.height());
    let tolerance = CONE_DEPTH_TOLERANCE * depth;

    rows.map(|row| depth_run(map, row, col, depth, tolerance))
        .filter(|run| !run.is_empty())
        .reduce(|a, b| a.start.min(b.start)..a.end.max(b.end))
        .unwrap_or(col..col)
}
