//! Scenario YAML parsing for replay runs.
//!
//! A scenario scripts what the controller sees tick by tick:
//! - Image size, base depth and no-data sentinel
//! - A sequence of frames, each painting depth patches over the base
//! - Optional contour and operator input per frame
//!
//! ```yaml
//! name: wall ahead
//! behavior: avoidance
//! map: { width: 320, height: 240, base_depth: 500.0 }
//! dt: 0.1
//! frames:
//!   - repeat: 2
//!     input: { forward: 1.0 }
//!     patches:
//!       - { type: band, rows: [170, 240], depth: 30.0 }
//!   - patches:
//!       - { type: band, rows: [170, 240], depth: 30.0 }
//!       - { type: rect, rows: [70, 170], cols: [0, 320], depth: 40.0 }
//! ```

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::{Contour, DepthMap, DriveInput};
use crate::error::{GatiError, Result};

/// Which behavior a scenario drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    /// Manual driving with collision, cliff and ramp protection
    Avoidance,
    /// Park in front of a wall
    WallParking,
    /// Park in front of a cone
    ConeParking,
    /// Steer along a colored line
    LineFollowing,
    /// Scripted circle, square and figure eight
    Shapes,
}

impl BehaviorKind {
    /// Name used in configuration sections.
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorKind::Avoidance => "avoidance",
            BehaviorKind::WallParking => "wall_parking",
            BehaviorKind::ConeParking => "cone_parking",
            BehaviorKind::LineFollowing => "line_following",
            BehaviorKind::Shapes => "shapes",
        }
    }
}

/// A replay scenario loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    /// Human-readable scenario name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: String,

    /// Behavior to run (the command line may override it)
    #[serde(default)]
    pub behavior: Option<BehaviorKind>,

    /// Image geometry and background
    pub map: MapLayout,

    /// Default seconds per tick
    #[serde(default = "default_dt")]
    pub dt: f32,

    /// Frame sequence
    pub frames: Vec<ScriptedFrame>,
}

/// Image geometry and background depth.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapLayout {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Depth of every pixel no patch covers
    #[serde(default = "default_base_depth")]
    pub base_depth: f32,
    /// No-data sentinel (NaN when omitted)
    #[serde(default)]
    pub no_data: Option<f32>,
}

/// One scripted frame, optionally repeated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptedFrame {
    /// Number of consecutive ticks showing this frame
    #[serde(default = "default_repeat")]
    pub repeat: usize,

    /// Seconds per tick, overriding the scenario default
    #[serde(default)]
    pub dt: Option<f32>,

    /// Depth patches painted over the base, in order
    #[serde(default)]
    pub patches: Vec<Patch>,

    /// Segmentation result
    #[serde(default)]
    pub contour: Option<Contour>,

    /// Operator input. A request fires on the first repetition only.
    #[serde(default)]
    pub input: DriveInput,
}

/// Depth patch over half-open pixel ranges `[start, end)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Patch {
    /// Rectangle of constant depth
    Rect {
        /// Row range
        rows: [usize; 2],
        /// Column range
        cols: [usize; 2],
        /// Depth value
        depth: f32,
    },
    /// Full-width band of rows
    Band {
        /// Row range
        rows: [usize; 2],
        /// Depth value
        depth: f32,
    },
    /// Whole image
    Fill {
        /// Depth value
        depth: f32,
    },
    /// Rectangle without readings
    NoData {
        /// Row range
        rows: [usize; 2],
        /// Column range
        cols: [usize; 2],
    },
}

impl Patch {
    fn ranges(&self) -> &[[usize; 2]] {
        match self {
            Patch::Rect { rows, .. } | Patch::NoData { rows, .. } | Patch::Band { rows, .. } => {
                std::slice::from_ref(rows)
            }
            Patch::Fill { .. } => &[],
        }
    }

    fn apply(&self, map: &mut DepthMap) {
        let (width, height) = (map.width(), map.height());
        match *self {
            Patch::Rect { rows, cols, depth } => {
                map.fill_rect(rows[0]..rows[1], cols[0]..cols[1], depth)
            }
            Patch::Band { rows, depth } => map.fill_rect(rows[0]..rows[1], 0..width, depth),
            Patch::Fill { depth } => map.fill_rect(0..height, 0..width, depth),
            Patch::NoData { rows, cols } => {
                let sentinel = map.no_data();
                map.fill_rect(rows[0]..rows[1], cols[0]..cols[1], sentinel)
            }
        }
    }
}

fn default_dt() -> f32 {
    0.1
}

fn default_base_depth() -> f32 {
    500.0
}

fn default_repeat() -> usize {
    1
}

impl Scenario {
    /// Load and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let scenario: Self = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check geometry, repeats and patch ranges.
    pub fn validate(&self) -> Result<()> {
        if self.map.width == 0 || self.map.height == 0 {
            return Err(GatiError::Scenario(format!(
                "{}: map must be at least 1x1, got {}x{}",
                self.name, self.map.width, self.map.height
            )));
        }
        if self.frames.is_empty() {
            return Err(GatiError::Scenario(format!("{}: no frames", self.name)));
        }

        for (index, frame) in self.frames.iter().enumerate() {
            if frame.repeat == 0 {
                return Err(GatiError::Scenario(format!(
                    "{}: frame {} has repeat 0",
                    self.name, index
                )));
            }
            for patch in &frame.patches {
                if let Some(range) = patch.ranges().iter().find(|r| r[0] > r[1]) {
                    return Err(GatiError::Scenario(format!(
                        "{}: frame {} has inverted range {:?}",
                        self.name, index, range
                    )));
                }
            }
        }

        Ok(())
    }

    /// Total number of ticks after expanding repeats.
    pub fn tick_count(&self) -> usize {
        self.frames.iter().map(|f| f.repeat).sum()
    }

    /// Render the depth map of one frame.
    pub fn build_depth_map(&self, frame: &ScriptedFrame) -> DepthMap {
        let mut map = DepthMap::filled(self.map.width, self.map.height, self.map.base_depth);
        if let Some(sentinel) = self.map.no_data {
            map = map.with_no_data(sentinel);
        }
        for patch in &frame.patches {
            patch.apply(&mut map);
        }
        map
    }

    /// Seconds per tick of one frame.
    pub fn frame_dt(&self, frame: &ScriptedFrame) -> f32 {
        frame.dt.unwrap_or(self.dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OperatorRequest, Position};

    const YAML: &str = r#"
name: test
behavior: cone_parking
map:
  width: 40
  height: 30
  base_depth: 300.0
  no_data: 0.0
frames:
  - repeat: 3
    patches:
      - type: band
        rows: [20, 30]
        depth: 25.0
      - type: rect
        rows: [5, 10]
        cols: [10, 20]
        depth: 60.0
      - type: no_data
        rows: [0, 2]
        cols: [0, 40]
    contour:
      center: { row: 7, col: 15 }
      area: 50.0
    input:
      forward: 0.5
      request: forward
  - dt: 0.25
"#;

    #[test]
    fn test_parse() {
        let scenario = Scenario::from_yaml(YAML).unwrap();

        assert_eq!(scenario.behavior, Some(BehaviorKind::ConeParking));
        assert_eq!(scenario.tick_count(), 4);
        assert_eq!(scenario.dt, 0.1);
        assert_eq!(scenario.frame_dt(&scenario.frames[1]), 0.25);

        let first = &scenario.frames[0];
        assert_eq!(first.input.request, Some(OperatorRequest::Forward));
        assert_eq!(first.contour.map(|c| c.center), Some(Position::new(7, 15)));
    }

    #[test]
    fn test_build_depth_map() {
        let scenario = Scenario::from_yaml(YAML).unwrap();
        let map = scenario.build_depth_map(&scenario.frames[0]);

        assert_eq!(map.reading(Position::new(25, 0)), Some(25.0));
        assert_eq!(map.reading(Position::new(7, 15)), Some(60.0));
        assert_eq!(map.reading(Position::new(15, 30)), Some(300.0));
        assert_eq!(map.reading(Position::new(1, 5)), None);

        let plain = scenario.build_depth_map(&scenario.frames[1]);
        assert_eq!(plain.reading(Position::new(25, 0)), Some(300.0));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let yaml = r#"
name: bad
map: { width: 10, height: 10 }
frames:
  - patches:
      - { type: rect, rows: [5, 2], cols: [0, 10], depth: 1.0 }
"#;
        let err = Scenario::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, GatiError::Scenario(_)));
    }

    #[test]
    fn test_rejects_empty() {
        let yaml = "name: empty\nmap: { width: 10, height: 10 }\nframes: []\n";
        assert!(matches!(
            Scenario::from_yaml(yaml),
            Err(GatiError::Scenario(_))
        ));

        let yaml = "name: zero\nmap: { width: 0, height: 10 }\nframes: [{}]\n";
        assert!(Scenario::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_unknown_patch_is_parse_error() {
        let yaml = r#"
name: bad
map: { width: 10, height: 10 }
frames:
  - patches:
      - { type: circle, depth: 1.0 }
"#;
        assert!(matches!(
            Scenario::from_yaml(yaml),
            Err(GatiError::Parse(_))
        ));
    }
}
