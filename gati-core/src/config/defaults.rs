//! Default value functions for serde deserialization.

use crate::control::PidGains;

use super::controller::{ControllerConfig, Extent};

pub fn min_distance() -> f32 {
    15.0
}

pub fn max_distance() -> f32 {
    1_000.0
}

pub fn target_depth() -> f32 {
    20.0
}

pub fn angle_kp() -> f32 {
    0.01
}

pub fn speed_kp() -> f32 {
    200.0
}

pub fn momentum_window_size() -> usize {
    10
}

pub fn ramp_steep_secs() -> f32 {
    2.0
}

pub fn force_reverse_secs() -> f32 {
    2.0
}

// Probe half-extents in pixels (half_x, half_y)

pub fn center_probe() -> Extent {
    Extent::new(120, 50)
}

pub fn side_probe() -> Extent {
    Extent::new(60, 20)
}

pub fn vertical_probe() -> Extent {
    Extent::new(20, 20)
}

pub fn front_probe_half_y() -> usize {
    40
}

pub fn front_probe_lift() -> usize {
    20
}

pub fn void_probe() -> Extent {
    Extent::new(50, 200)
}

pub fn wall_edge_probe() -> Extent {
    Extent::new(100, 50)
}

pub fn cone_probe() -> Extent {
    Extent::new(10, 10)
}

// Sections

pub fn avoidance() -> ControllerConfig {
    ControllerConfig::obstacle_avoidance()
}

pub fn wall_parking() -> ControllerConfig {
    ControllerConfig::wall_parking()
}

pub fn cone_parking() -> ControllerConfig {
    ControllerConfig::cone_parking()
}

pub fn quarter_turn_secs() -> f32 {
    1.3
}

pub fn line_angle_pid() -> PidGains {
    PidGains::new(1.0, 0.1, 0.05, 1.0)
}

pub fn line_speed_pid() -> PidGains {
    PidGains::new(1.0, 0.05, 0.02, 0.85)
}
