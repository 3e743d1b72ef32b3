//! Numeric control building blocks.
//!
//! - [`laws`]: smoothed and instantaneous proportional laws, dead bands
//! - [`OverrideTimer`]: blind-override countdown
//! - [`Pid`]: PID law for line following

pub mod laws;

mod pid;
mod timer;

pub use laws::Bounds;
pub use pid::{Pid, PidGains};
pub use timer::OverrideTimer;
