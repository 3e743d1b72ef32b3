//! Depth map snapshot and pixel coordinates.
//!
//! A [`DepthMap`] is the per-frame range image handed over by the camera
//! collaborator. Readings are distances (centimeters by default) stored
//! row-major. "No reading" is an explicit sentinel chosen per map rather than
//! a zero-is-false convention:
//!
//! - A value equal to the sentinel is no data
//! - A non-finite or negative value is no data
//! - Everything else, including a true `0.0` when the sentinel is `NaN`,
//!   is a valid reading

use serde::{Deserialize, Serialize};

use crate::error::{GatiError, Result};

/// Pixel coordinate in (row, column) order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index (0 = top of the image)
    pub row: usize,
    /// Column index (0 = left edge of the image)
    pub col: usize,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Per-frame depth image.
#[derive(Clone, Debug)]
pub struct DepthMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
    no_data: f32,
}

impl DepthMap {
    /// Wrap a row-major buffer of `width * height` readings.
    ///
    /// The no-data sentinel defaults to `NaN`, which keeps a genuine zero
    /// reading valid. Use [`DepthMap::with_no_data`] for cameras that encode
    /// missing readings as `0.0`.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(GatiError::DepthMap(format!(
                "depth buffer has {} readings, expected {}x{}={}",
                data.len(),
                width,
                height,
                width * height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            no_data: f32::NAN,
        })
    }

    /// Map of the given size with every pixel at `depth`.
    pub fn filled(width: usize, height: usize, depth: f32) -> Self {
        Self {
            width,
            height,
            data: vec![depth; width * height],
            no_data: f32::NAN,
        }
    }

    /// Set the value that marks a pixel without reading.
    pub fn with_no_data(mut self, sentinel: f32) -> Self {
        self.no_data = sentinel;
        self
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The configured no-data sentinel.
    #[inline]
    pub fn no_data(&self) -> f32 {
        self.no_data
    }

    /// Image center, where the vehicle's forward axis projects.
    #[inline]
    pub fn center(&self) -> Position {
        Position::new(self.height / 2, self.width / 2)
    }

    /// Check if a position lies inside the image.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    /// Whether a raw value counts as a reading.
    #[inline]
    pub fn is_reading(&self, value: f32) -> bool {
        value.is_finite() && value >= 0.0 && value != self.no_data
    }

    /// Valid reading at a position, `None` when out of bounds or no data.
    #[inline]
    pub fn reading(&self, pos: Position) -> Option<f32> {
        if !self.contains(pos) {
            return None;
        }
        let value = self.data[pos.row * self.width + pos.col];
        self.is_reading(value).then_some(value)
    }

    /// Raw values of one row.
    #[inline]
    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    /// Overwrite a single pixel. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, value: f32) {
        if self.contains(pos) {
            self.data[pos.row * self.width + pos.col] = value;
        }
    }

    /// Paint a rectangle `[row_start, row_end) x [col_start, col_end)`,
    /// clipped to the image.
    pub fn fill_rect(
        &mut self,
        rows: std::ops::Range<usize>,
        cols: std::ops::Range<usize>,
        value: f32,
    ) {
        let row_end = rows.end.min(self.height);
        let col_end = cols.end.min(self.width);
        for row in rows.start..row_end {
            let start = row * self.width;
            for col in cols.start..col_end {
                self.data[start + col] = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_checked() {
        assert!(DepthMap::new(4, 3, vec![1.0; 12]).is_ok());
        assert!(matches!(
            DepthMap::new(4, 3, vec![1.0; 11]),
            Err(GatiError::DepthMap(_))
        ));
    }

    #[test]
    fn test_zero_sentinel() {
        let mut map = DepthMap::filled(4, 4, 100.0).with_no_data(0.0);
        map.set(Position::new(1, 1), 0.0);

        assert_eq!(map.reading(Position::new(1, 1)), None);
        assert_eq!(map.reading(Position::new(0, 0)), Some(100.0));
    }

    #[test]
    fn test_true_zero_survives_nan_sentinel() {
        let mut map = DepthMap::filled(4, 4, 100.0);
        map.set(Position::new(2, 3), 0.0);
        map.set(Position::new(0, 1), f32::NAN);

        assert_eq!(map.reading(Position::new(2, 3)), Some(0.0));
        assert_eq!(map.reading(Position::new(0, 1)), None);
    }

    #[test]
    fn test_out_of_bounds_and_negative() {
        let mut map = DepthMap::filled(4, 4, 100.0);
        map.set(Position::new(3, 3), -5.0);

        assert_eq!(map.reading(Position::new(3, 3)), None);
        assert_eq!(map.reading(Position::new(4, 0)), None);
        assert_eq!(map.reading(Position::new(0, 9)), None);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut map = DepthMap::filled(5, 5, 100.0);
        map.fill_rect(3..10, 4..10, 7.0);

        assert_eq!(map.reading(Position::new(4, 4)), Some(7.0));
        assert_eq!(map.reading(Position::new(3, 3)), Some(100.0));
        assert_eq!(map.row(3), &[100.0, 100.0, 100.0, 100.0, 7.0]);
    }
}
