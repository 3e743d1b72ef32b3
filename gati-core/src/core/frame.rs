//! Per-tick inputs from the camera, segmentation and operator collaborators.

use serde::{Deserialize, Serialize};

use super::command::DriveCommand;
use super::depth::{DepthMap, Position};

/// Open-loop shape scripts selectable by the operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Constant full right lock
    Circle,
    /// Alternating straight legs and quarter turns
    Square,
    /// Right loop followed by left loop
    FigureEight,
}

/// Discrete operator request (button edge).
///
/// Each behavior honors the requests that make sense for its modes and
/// ignores the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorRequest {
    /// Force the controller back to its FORWARD mode
    Forward,
    /// Force a complete stop
    CompleteStop,
    /// Start the circle script
    Circle,
    /// Start the square script
    Square,
    /// Start the figure-eight script
    FigureEight,
}

impl OperatorRequest {
    /// Shape script selected by this request, if any.
    pub fn shape(&self) -> Option<Shape> {
        match self {
            OperatorRequest::Circle => Some(Shape::Circle),
            OperatorRequest::Square => Some(Shape::Square),
            OperatorRequest::FigureEight => Some(Shape::FigureEight),
            OperatorRequest::Forward | OperatorRequest::CompleteStop => None,
        }
    }
}

/// Largest color contour reported by the segmentation collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    /// Contour center in image coordinates
    pub center: Position,
    /// Contour area in pixels
    pub area: f32,
}

/// Manual operator intent for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveInput {
    /// Forward trigger magnitude [0, 1]
    pub forward: f32,
    /// Backward trigger magnitude [0, 1]
    pub backward: f32,
    /// Joystick steering [-1, 1]
    pub steer: f32,
    /// Discrete mode request, if a button was pressed this tick
    pub request: Option<OperatorRequest>,
    /// Log the issued command for this tick
    pub report: bool,
}

impl DriveInput {
    /// Operator input driving straight ahead at `forward`.
    pub fn throttle(forward: f32) -> Self {
        Self {
            forward,
            ..Default::default()
        }
    }

    /// Operator input with a single discrete request.
    pub fn request(request: OperatorRequest) -> Self {
        Self {
            request: Some(request),
            ..Default::default()
        }
    }

    /// Desired speed: forward trigger minus backward trigger.
    #[inline]
    pub fn speed(&self) -> f32 {
        trigger(self.forward) - trigger(self.backward)
    }

    /// Desired steering angle.
    #[inline]
    pub fn angle(&self) -> f32 {
        if self.steer.is_finite() {
            self.steer.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Check if the operator is pressing either trigger.
    #[inline]
    pub fn is_driving(&self) -> bool {
        trigger(self.forward) > 0.0 || trigger(self.backward) > 0.0
    }

    /// The operator's command, unmodified.
    #[inline]
    pub fn manual_command(&self) -> DriveCommand {
        DriveCommand::new(self.speed(), self.angle())
    }
}

#[inline]
fn trigger(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Everything a controller sees in one tick.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Depth snapshot for this frame
    pub depth: &'a DepthMap,
    /// Segmented target, if any
    pub contour: Option<Contour>,
    /// Operator input
    pub input: DriveInput,
    /// Seconds elapsed since the previous tick
    pub dt: f32,
}

impl<'a> Frame<'a> {
    /// Frame with only a depth map and elapsed time.
    pub fn new(depth: &'a DepthMap, dt: f32) -> Self {
        Self {
            depth,
            contour: None,
            input: DriveInput::default(),
            dt,
        }
    }

    /// Attach operator input.
    pub fn with_input(mut self, input: DriveInput) -> Self {
        self.input = input;
        self
    }

    /// Attach a segmentation result.
    pub fn with_contour(mut self, contour: Option<Contour>) -> Self {
        self.contour = contour;
        self
    }
}
