//! Localized nearest-point search in a depth map.
//!
//! Every feature the controllers use is the closest reading inside a small
//! rectangle of the image. Cropping matters: an unbounded search would always
//! return the floor right in front of the bumper.
//!
//! # No-data contract
//!
//! Both queries return `None` when the window has no overlap with the image
//! or when it contains no valid reading. Callers in this crate always map
//! `None` to the configured maximum distance. That makes a sensing gap look
//! exactly like a clear path: obstacle predicates stay quiet and parking
//! behaviors treat the target as lost. This is accepted, not hidden.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::{DepthMap, Position};

/// Rectangle `[row - half_y, row + half_y) x [col - half_x, col + half_x)`.
///
/// The center is signed so probes computed from image geometry may point
/// outside the image; the rectangle is clipped before the scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    /// Center row (may lie outside the image)
    pub row: isize,
    /// Center column (may lie outside the image)
    pub col: isize,
    /// Horizontal half-extent in pixels
    pub half_x: usize,
    /// Vertical half-extent in pixels
    pub half_y: usize,
}

impl SearchWindow {
    /// Window centered on a signed pixel coordinate.
    pub const fn new(row: isize, col: isize, half_x: usize, half_y: usize) -> Self {
        Self {
            row,
            col,
            half_x,
            half_y,
        }
    }

    /// Window centered on an in-image position.
    pub fn around(center: Position, half_x: usize, half_y: usize) -> Self {
        Self::new(center.row as isize, center.col as isize, half_x, half_y)
    }

    /// Same extents, center shifted by (d_row, d_col).
    pub fn shifted(self, d_row: isize, d_col: isize) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
            ..self
        }
    }

    /// Intersection with a `width x height` image as half-open row and
    /// column ranges, or `None` when empty.
    pub fn clip(&self, width: usize, height: usize) -> Option<(Range<usize>, Range<usize>)> {
        let rows = clip_axis(self.row, self.half_y, height)?;
        let cols = clip_axis(self.col, self.half_x, width)?;
        Some((rows, cols))
    }
}

fn clip_axis(center: isize, half: usize, len: usize) -> Option<Range<usize>> {
    let half = half as isize;
    let start = (center - half).max(0);
    let end = (center + half).min(len as isize);
    (start < end).then(|| start as usize..end as usize)
}

/// Position of the smallest valid reading inside the window.
///
/// The result is in the map's own coordinates. Ties resolve to the first
/// occurrence in row-major order.
pub fn nearest_point(map: &DepthMap, window: SearchWindow) -> Option<Position> {
    nearest_point_excluding(map, window, 0..0)
}

/// [`nearest_point`] ignoring every pixel whose column lies in `skip`.
pub fn nearest_point_excluding(
    map: &DepthMap,
    window: SearchWindow,
    skip: Range<usize>,
) -> Option<Position> {
    let (rows, cols) = window.clip(map.width(), map.height())?;

    let mut best: Option<(Position, f32)> = None;
    for row in rows {
        let values = &map.row(row)[cols.clone()];
        for (offset, &value) in values.iter().enumerate() {
            let col = cols.start + offset;
            if !map.is_reading(value) || skip.contains(&col) {
                continue;
            }
            // Strict comparison keeps the first occurrence on ties
            if best.is_none_or(|(_, depth)| value < depth) {
                best = Some((Position::new(row, col), value));
            }
        }
    }

    best.map(|(pos, _)| pos)
}

/// Depth of the nearest point inside the window.
pub fn nearest_depth(map: &DepthMap, window: SearchWindow) -> Option<f32> {
    nearest_point(map, window).and_then(|pos| map.reading(pos))
}

/// Nearest point and its depth, with `fallback` substituted for no data.
///
/// The position is `None` when the window held no reading.
pub fn nearest_or(
    map: &DepthMap,
    window: SearchWindow,
    fallback: f32,
) -> (Option<Position>, f32) {
    with_fallback(map, nearest_point(map, window), fallback)
}

/// [`nearest_or`] over the pixels outside the `skip` columns.
pub fn nearest_or_excluding(
    map: &DepthMap,
    window: SearchWindow,
    skip: Range<usize>,
    fallback: f32,
) -> (Option<Position>, f32) {
    with_fallback(map, nearest_point_excluding(map, window, skip), fallback)
}

fn with_fallback(
    map: &DepthMap,
    nearest: Option<Position>,
    fallback: f32,
) -> (Option<Position>, f32) {
    match nearest {
        Some(pos) => (Some(pos), map.reading(pos).unwrap_or(fallback)),
        None => (None, fallback),
    }
}

/// Columns of the unbroken run of readings on `row` that contains `col`
/// and stays within `tolerance` of `depth`. Empty when the pixel at `col`
/// itself is off.
pub fn depth_run(
    map: &DepthMap,
    row: usize,
    col: usize,
    depth: f32,
    tolerance: f32,
) -> Range<usize> {
    if row >= map.height() || col >= map.width() {
        return col..col;
    }
    let values = map.row(row);
    let matches = |c: usize| map.is_reading(values[c]) && (values[c] - depth).abs() <= tolerance;
    if !matches(col) {
        return col..col;
    }

    let mut start = col;
    while start > 0 && matches(start - 1) {
        start -= 1;
    }
    let mut end = col + 1;
    while end < values.len() && matches(end) {
        end += 1;
    }
    start..end
}
