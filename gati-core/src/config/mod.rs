//! Configuration for GATI.
//!
//! One TOML file holds a section per behavior:
//!
//! ```toml
//! [avoidance]
//! min_distance = 15.0
//!
//! [wall_parking]
//! target_depth = 20.0
//!
//! [cone_parking]
//! target_depth = 30.0
//! angle_kp = 0.5
//!
//! [line_following.angle_pid]
//! kp = 1.0
//! ki = 0.1
//! kd = 0.05
//! limit = 1.0
//!
//! [shapes]
//! quarter_turn_secs = 1.3
//! ```

mod behavior;
mod controller;
mod defaults;
mod gati;

pub use behavior::{LineFollowingConfig, ShapeConfig};
pub use controller::{ControllerConfig, Extent, OverrideDurations, ProbeWindows};
pub use gati::{DEFAULT_CONFIG_PATH, GatiConfig};
