//! # GATI
//!
//! Reactive drive controllers for a small vehicle with a forward depth camera.
//!
//! ## Overview
//!
//! Every tick the controller receives a depth image, an optional color
//! contour and the operator's input, and returns one normalized
//! `(speed, angle)` command. Behaviors:
//!
//! - **Obstacle avoidance** - manual driving with collision, cliff and ramp protection
//! - **Wall parking** - stop square to a wall at a target depth
//! - **Cone parking** - approach a colored cone and hold at a target depth
//! - **Line following** - PID steering along a segmented line
//! - **Shapes** - open-loop circle, square and figure eight
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gati_core::{ControllerConfig, DepthMap, DriveController, Frame, ObstacleAvoidance};
//!
//! let mut controller =
//!     DriveController::new(ControllerConfig::obstacle_avoidance(), ObstacleAvoidance::new())?;
//!
//! let depth = DepthMap::new(width, height, pixels)?;
//! let command = controller.tick(&Frame::new(&depth, 0.05));
//! motors.drive(command.speed, command.angle);
//! ```
//!
//! ## Image Convention
//!
//! - Row 0 is the top of the image, column 0 the left edge
//! - Positive angle steers right, positive speed drives forward
//! - Smaller depth means closer

#![warn(missing_docs)]

// Value types
pub mod core;

// Depth probes and approach estimate
pub mod sensing;

// Proportional laws, PID, override timer
pub mod control;

// Per-behavior state machines
pub mod behavior;

// TOML configuration
pub mod config;

// Scenario replay
pub mod io;

pub mod controller;
pub mod error;

pub use behavior::{
    AvoidanceMode, Behavior, LineFollowing, LineMode, ModeName, ObstacleAvoidance, Parking,
    ParkingMode, ParkingTarget, ShapeDriving, ShapeMode, Step, StepContext,
};
pub use config::{ControllerConfig, GatiConfig, LineFollowingConfig, ShapeConfig};
pub use controller::DriveController;
pub use core::{Contour, DepthMap, DriveCommand, DriveInput, Frame, OperatorRequest, Position, Shape};
pub use error::{GatiError, Result};
pub use io::{BehaviorKind, Scenario, Trace, replay};
pub use sensing::{MomentumTracker, ObstacleModel};
