//! Core value types shared by every module.
//!
//! - [`DepthMap`] / [`Position`]: per-frame range image and pixel coordinates
//! - [`DriveCommand`]: the (speed, angle) pair issued each tick
//! - [`Frame`]: the bundle of inputs a controller sees in one tick

mod command;
mod depth;
mod frame;

pub use command::DriveCommand;
pub use depth::{DepthMap, Position};
pub use frame::{Contour, DriveInput, Frame, OperatorRequest, Shape};
