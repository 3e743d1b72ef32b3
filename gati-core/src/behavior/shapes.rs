//! Open-loop shape scripts.
//!
//! Each script is a function of the time since it was requested, measured
//! in quarter-turn units (QTT): the time the vehicle needs at full lock to
//! turn 90 degrees.

use serde::{Deserialize, Serialize};

use crate::config::ShapeConfig;
use crate::core::{DriveCommand, OperatorRequest, Shape};

use super::{Behavior, ModeName, Step, StepContext};

const RIGHT_LOCK: DriveCommand = DriveCommand {
    speed: 1.0,
    angle: 1.0,
};

const LEFT_LOCK: DriveCommand = DriveCommand {
    speed: 1.0,
    angle: -1.0,
};

/// Modes of [`ShapeDriving`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeMode {
    /// Manual driving
    Idle,
    /// Constant right lock
    Circle,
    /// Straight legs and right quarter turns
    Square,
    /// Right loop then left loop
    FigureEight,
}

impl ModeName for ShapeMode {
    fn as_str(&self) -> &'static str {
        match self {
            ShapeMode::Idle => "IDLE",
            ShapeMode::Circle => "CIRCLE",
            ShapeMode::Square => "SQUARE",
            ShapeMode::FigureEight => "FIGURE_EIGHT",
        }
    }
}

impl From<Shape> for ShapeMode {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Circle => ShapeMode::Circle,
            Shape::Square => ShapeMode::Square,
            Shape::FigureEight => ShapeMode::FigureEight,
        }
    }
}

/// Shape-driving behavior. Initial mode IDLE.
#[derive(Clone, Debug)]
pub struct ShapeDriving {
    mode: ShapeMode,
    quarter_turn: f32,
    elapsed: f32,
}

impl ShapeDriving {
    /// Create the behavior in IDLE mode.
    pub fn new(config: &ShapeConfig) -> Self {
        Self {
            mode: ShapeMode::Idle,
            quarter_turn: config.quarter_turn_secs,
            elapsed: 0.0,
        }
    }

    /// Seconds since the running script was requested.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Scripted command `t` seconds into the active shape, `None` in IDLE.
    fn scripted(&self, t: f32) -> Option<DriveCommand> {
        let qtt = self.quarter_turn;
        match self.mode {
            ShapeMode::Idle => None,
            ShapeMode::Circle => Some(RIGHT_LOCK),
            ShapeMode::Square => {
                if t % (2.0 * qtt) <= qtt {
                    Some(DriveCommand::STRAIGHT)
                } else {
                    Some(RIGHT_LOCK)
                }
            }
            ShapeMode::FigureEight => {
                let phase = t % (8.0 * qtt);
                if (2.0 * qtt..=6.0 * qtt).contains(&phase) {
                    Some(RIGHT_LOCK)
                } else {
                    Some(LEFT_LOCK)
                }
            }
        }
    }
}

impl Default for ShapeDriving {
    fn default() -> Self {
        Self::new(&ShapeConfig::default())
    }
}

impl Behavior for ShapeDriving {
    type Mode = ShapeMode;

    fn name(&self) -> &'static str {
        "shapes"
    }

    fn mode(&self) -> ShapeMode {
        self.mode
    }

    fn step(&mut self, ctx: &mut StepContext<'_, '_>) -> Step {
        if self.mode == ShapeMode::Idle {
            return Step::drive(ctx.frame.input.manual_command());
        }

        self.elapsed += ctx.dt;
        let command = self.scripted(self.elapsed).unwrap_or(DriveCommand::STOP);
        Step::drive(command)
    }

    fn handle_request(
        &mut self,
        request: OperatorRequest,
        _decided: DriveCommand,
        _ctx: &mut StepContext<'_, '_>,
    ) -> Option<DriveCommand> {
        if let Some(shape) = request.shape() {
            tracing::info!("Driving shape {:?}", shape);
            self.mode = shape.into();
            self.elapsed = 0.0;
            return self.scripted(0.0);
        }
        match request {
            OperatorRequest::CompleteStop => {
                self.mode = ShapeMode::Idle;
                self.elapsed = 0.0;
                Some(DriveCommand::STOP)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;
    use crate::core::{DepthMap, DriveInput, Frame};
    use crate::sensing::MomentumTracker;

    fn run(shapes: &mut ShapeDriving, input: DriveInput, dt: f32) -> DriveCommand {
        let map = DepthMap::filled(4, 4, 100.0);
        let config = ControllerConfig::default();
        let mut momentum = MomentumTracker::new(1);
        let frame = Frame::new(&map, dt).with_input(input);
        let mut ctx = StepContext {
            frame: &frame,
            config: &config,
            momentum: &mut momentum,
            previous: DriveCommand::STOP,
            dt,
        };
        let step = shapes.step(&mut ctx);
        match input.request {
            Some(request) => shapes
                .handle_request(request, step.command, &mut ctx)
                .unwrap_or(step.command),
            None => step.command,
        }
    }

    fn config() -> ShapeConfig {
        ShapeConfig {
            quarter_turn_secs: 1.0,
        }
    }

    #[test]
    fn test_idle_is_manual() {
        let mut shapes = ShapeDriving::default();
        let input = DriveInput {
            forward: 0.5,
            steer: 0.2,
            ..Default::default()
        };
        assert_eq!(run(&mut shapes, input, 0.1), DriveCommand::new(0.5, 0.2));
        assert_eq!(shapes.mode(), ShapeMode::Idle);
    }

    #[test]
    fn test_square_alternates() {
        let mut shapes = ShapeDriving::new(&config());
        let first = run(&mut shapes, DriveInput::request(OperatorRequest::Square), 0.1);
        assert_eq!(first, DriveCommand::STRAIGHT);
        assert_eq!(shapes.mode(), ShapeMode::Square);

        // t = 0.5, 1.0 straight; t = 1.5 turning; t = 2.0, 2.5 next leg
        let trace: Vec<DriveCommand> = (0..5)
            .map(|_| run(&mut shapes, DriveInput::default(), 0.5))
            .collect();
        assert_eq!(
            trace,
            vec![
                DriveCommand::STRAIGHT,
                DriveCommand::STRAIGHT,
                RIGHT_LOCK,
                DriveCommand::STRAIGHT,
                DriveCommand::STRAIGHT,
            ]
        );
    }

    #[test]
    fn test_figure_eight_phases() {
        let mut shapes = ShapeDriving::new(&config());
        run(&mut shapes, DriveInput::request(OperatorRequest::FigureEight), 0.1);

        // t = 1, 3, 5, 7
        let trace: Vec<DriveCommand> = (0..4)
            .map(|i| run(&mut shapes, DriveInput::default(), if i == 0 { 1.0 } else { 2.0 }))
            .collect();
        assert_eq!(trace, vec![LEFT_LOCK, RIGHT_LOCK, RIGHT_LOCK, LEFT_LOCK]);
    }

    #[test]
    fn test_circle_and_stop() {
        let mut shapes = ShapeDriving::new(&config());
        run(&mut shapes, DriveInput::request(OperatorRequest::Circle), 0.1);
        assert_eq!(run(&mut shapes, DriveInput::default(), 0.1), RIGHT_LOCK);

        let out = run(&mut shapes, DriveInput::request(OperatorRequest::CompleteStop), 0.1);
        assert_eq!(out, DriveCommand::STOP);
        assert_eq!(shapes.mode(), ShapeMode::Idle);
    }

    #[test]
    fn test_new_request_restarts_clock() {
        let mut shapes = ShapeDriving::new(&config());
        run(&mut shapes, DriveInput::request(OperatorRequest::Square), 0.1);
        run(&mut shapes, DriveInput::default(), 1.5);
        assert!(shapes.elapsed() > 1.0);

        run(&mut shapes, DriveInput::request(OperatorRequest::Square), 0.1);
        assert_eq!(shapes.elapsed(), 0.0);
    }
}
