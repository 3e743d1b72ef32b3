//! Five-probe obstacle snapshot and the predicates built on it.
//!
//! The image center is where the vehicle's forward axis projects. Around it
//! the model samples:
//!
//! ```text
//!              top
//!               |
//!   left --- center --- right
//!               |
//!             bottom
//! ```
//!
//! Left/right sit a quarter image width off center, top/bottom a quarter
//! image height. A probe without any reading reports `max_distance`.
//!
//! All predicates are multiples of `min_distance` (M):
//!
//! | Predicate | Condition |
//! |-----------|-----------|
//! | left / right | side < 2M |
//! | front | center < 4M |
//! | general | center, left or right < 8M |
//! | ramp up | bottom, center, left, right < 4M and top > 8M |
//! | cliff | bottom > 4M |

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::ControllerConfig;
use crate::core::{DepthMap, Position};

use super::range::{SearchWindow, nearest_or_excluding};

/// One probe result.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Nearest pixel, `None` when the probe saw no reading
    pub position: Option<Position>,
    /// Nearest depth, or the no-data fallback
    pub depth: f32,
}

impl Sample {
    fn probe(map: &DepthMap, window: SearchWindow, skip: Range<usize>, fallback: f32) -> Self {
        let (position, depth) = nearest_or_excluding(map, window, skip, fallback);
        Self { position, depth }
    }
}

/// Per-frame obstacle snapshot. Built fresh every tick, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleModel {
    /// Wide probe at the image center
    pub center: Sample,
    /// Probe left of center
    pub left: Sample,
    /// Probe right of center
    pub right: Sample,
    /// Probe above center (far floor or ceiling)
    pub top: Sample,
    /// Probe below center (near floor)
    pub bottom: Sample,
    min_distance: f32,
}

impl ObstacleModel {
    /// Sample the five probes of `map` with the windows and thresholds of
    /// `config`.
    pub fn sample(map: &DepthMap, config: &ControllerConfig) -> Self {
        Self::sample_excluding(map, config, 0..0)
    }

    /// Like [`ObstacleModel::sample`], but every window ignores pixels in
    /// the `skip` columns. Used to keep a tracked target from counting as
    /// an obstacle.
    pub fn sample_excluding(map: &DepthMap, config: &ControllerConfig, skip: Range<usize>) -> Self {
        let mid = map.center();
        let (mid_y, mid_x) = (mid.row as isize, mid.col as isize);
        let probes = &config.probes;
        let far = config.max_distance;

        let center = SearchWindow::around(mid, probes.center.half_x, probes.center.half_y);
        let side = SearchWindow::around(mid, probes.side.half_x, probes.side.half_y);
        let vertical = SearchWindow::around(mid, probes.vertical.half_x, probes.vertical.half_y);

        Self {
            center: Sample::probe(map, center, skip.clone(), far),
            left: Sample::probe(map, side.shifted(0, -(mid_x / 2)), skip.clone(), far),
            right: Sample::probe(map, side.shifted(0, mid_x / 2), skip.clone(), far),
            top: Sample::probe(map, vertical.shifted(-(mid_y / 2), 0), skip.clone(), far),
            bottom: Sample::probe(map, vertical.shifted(mid_y / 2, 0), skip, far),
            min_distance: config.min_distance,
        }
    }

    /// Threshold the predicates are built on.
    #[inline]
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Something close on the left.
    #[inline]
    pub fn is_left_obstacle(&self) -> bool {
        self.left.depth < 2.0 * self.min_distance
    }

    /// Something close on the right.
    #[inline]
    pub fn is_right_obstacle(&self) -> bool {
        self.right.depth < 2.0 * self.min_distance
    }

    /// Something close straight ahead.
    #[inline]
    pub fn is_front_obstacle(&self) -> bool {
        self.center.depth < 4.0 * self.min_distance
    }

    /// Something in the forward half-plane worth slowing down for.
    #[inline]
    pub fn is_general_obstacle(&self) -> bool {
        let limit = 8.0 * self.min_distance;
        self.center.depth < limit || self.left.depth < limit || self.right.depth < limit
    }

    /// Everything low is near while the top of the image is far.
    #[inline]
    pub fn is_ramp_up(&self) -> bool {
        let near = 4.0 * self.min_distance;
        self.bottom.depth < near
            && self.center.depth < near
            && self.left.depth < near
            && self.right.depth < near
            && self.top.depth > 8.0 * self.min_distance
    }

    /// The floor just ahead of the bumper is missing.
    ///
    /// Never true together with [`ObstacleModel::is_ramp_up`]: the bottom
    /// probe cannot be both below and above 4M.
    #[inline]
    pub fn is_cliff(&self) -> bool {
        self.bottom.depth > 4.0 * self.min_distance
    }

    /// Exactly one side is blocked. Returns `Some(true)` for left,
    /// `Some(false)` for right.
    #[inline]
    pub fn single_side_obstacle(&self) -> Option<bool> {
        match (self.is_left_obstacle(), self.is_right_obstacle()) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}
