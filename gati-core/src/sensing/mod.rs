//! Feature extraction from the depth map.
//!
//! - [`range`]: nearest-point search in a clipped window
//! - [`ObstacleModel`]: five probes and the obstacle predicates
//! - [`MomentumTracker`]: approaching/receding estimate

pub mod range;

mod momentum;
mod obstacle;

pub use momentum::MomentumTracker;
pub use obstacle::{ObstacleModel, Sample};
pub use range::{
    SearchWindow, depth_run, nearest_depth, nearest_or, nearest_or_excluding, nearest_point,
    nearest_point_excluding,
};
