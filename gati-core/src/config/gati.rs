//! Root configuration file.

use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

use super::behavior::{LineFollowingConfig, ShapeConfig};
use super::controller::ControllerConfig;
use super::defaults;

/// Default configuration path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/gati.toml";

/// Full GATI configuration loaded from TOML.
///
/// Missing sections take the preset of their behavior, and a present
/// controller section only overrides the fields it names on top of that
/// preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GatiConfig {
    /// Obstacle avoidance controller
    #[serde(default = "defaults::avoidance", deserialize_with = "avoidance_section")]
    pub avoidance: ControllerConfig,

    /// Wall parking controller
    #[serde(default = "defaults::wall_parking", deserialize_with = "wall_parking_section")]
    pub wall_parking: ControllerConfig,

    /// Cone parking controller
    #[serde(default = "defaults::cone_parking", deserialize_with = "cone_parking_section")]
    pub cone_parking: ControllerConfig,

    /// Line-following gains
    #[serde(default)]
    pub line_following: LineFollowingConfig,

    /// Shape-driving timing
    #[serde(default)]
    pub shapes: ShapeConfig,
}

fn avoidance_section<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<ControllerConfig, D::Error> {
    over_preset(deserializer, defaults::avoidance)
}

fn wall_parking_section<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<ControllerConfig, D::Error> {
    over_preset(deserializer, defaults::wall_parking)
}

fn cone_parking_section<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<ControllerConfig, D::Error> {
    over_preset(deserializer, defaults::cone_parking)
}

/// Deserialize a controller section as a table and lay it over `preset`.
fn over_preset<'de, D: Deserializer<'de>>(
    deserializer: D,
    preset: fn() -> ControllerConfig,
) -> std::result::Result<ControllerConfig, D::Error> {
    let overrides = toml::Table::deserialize(deserializer)?;
    let mut merged = match toml::Value::try_from(preset()).map_err(D::Error::custom)? {
        toml::Value::Table(table) => table,
        other => {
            return Err(D::Error::custom(format!(
                "preset serialized to {}, expected a table",
                other.type_str()
            )));
        }
    };
    merge_tables(&mut merged, overrides);
    toml::Value::Table(merged).try_into().map_err(D::Error::custom)
}

/// Recursively overwrite `base` with every key of `overrides`.
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(inner)), toml::Value::Table(nested)) => {
                merge_tables(inner, nested)
            }
            (Some(slot), value) => *slot = value,
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}

impl Default for GatiConfig {
    fn default() -> Self {
        Self {
            avoidance: defaults::avoidance(),
            wall_parking: defaults::wall_parking(),
            cone_parking: defaults::cone_parking(),
            line_following: LineFollowingConfig::default(),
            shapes: ShapeConfig::default(),
        }
    }
}

impl GatiConfig {
    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from [`DEFAULT_CONFIG_PATH`], falling back to defaults when the
    /// file does not exist.
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("{} not found, using defaults", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.avoidance.validate()?;
        self.wall_parking.validate()?;
        self.cone_parking.validate()?;
        self.line_following.validate()?;
        self.shapes.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatiError;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GatiConfig::default();
        assert_eq!(config.avoidance.min_distance, 15.0);
        assert_eq!(config.wall_parking.target_depth, 20.0);
        assert_eq!(config.cone_parking.target_depth, 30.0);
        assert_eq!(config.cone_parking.angle_kp, 0.5);
        assert_eq!(config.shapes.quarter_turn_secs, 1.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = GatiConfig::from_toml("").unwrap();
        assert_eq!(config, GatiConfig::default());
    }

    #[test]
    fn test_partial_section() {
        let toml = r#"
            [avoidance]
            min_distance = 20.0

            [avoidance.override_durations]
            ramp_steep = 3.5

            [line_following.angle_pid]
            kp = 2.0
            ki = 0.0
            kd = 0.0
            limit = 1.0
        "#;
        let config = GatiConfig::from_toml(toml).unwrap();

        assert_eq!(config.avoidance.min_distance, 20.0);
        assert_eq!(config.avoidance.max_distance, 1000.0);
        assert_eq!(config.avoidance.override_durations.ramp_steep, 3.5);
        assert_eq!(config.avoidance.override_durations.force_reverse, 2.0);
        assert_eq!(config.line_following.angle_pid.kp, 2.0);
        assert_eq!(config.line_following.speed_pid.limit, 0.85);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = GatiConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed = GatiConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_rejected() {
        let err = GatiConfig::from_toml("[wall_parking]\ntarget_depth = -1.0").unwrap_err();
        assert!(matches!(err, GatiError::Config(_)));

        let err = GatiConfig::from_toml("[shapes]\nquarter_turn_secs = 0.0").unwrap_err();
        assert!(matches!(err, GatiError::Config(_)));

        let err = GatiConfig::from_toml("[avoidance\nmin_distance = 1").unwrap_err();
        assert!(matches!(err, GatiError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cone_parking]\ntarget_depth = 45.0").unwrap();

        let config = GatiConfig::load(file.path()).unwrap();
        assert_eq!(config.cone_parking.target_depth, 45.0);
        // Fields missing from a present section keep the section's preset
        assert_eq!(config.cone_parking.angle_kp, 0.5);
    }

    #[test]
    fn test_section_overrides_preset_fields() {
        let toml = r#"
            [cone_parking]
            speed_kp = 150.0

            [cone_parking.probes.cone]
            half_x = 14
        "#;
        let config = GatiConfig::from_toml(toml).unwrap();

        let preset = ControllerConfig::cone_parking();
        assert_eq!(config.cone_parking.speed_kp, 150.0);
        assert_eq!(config.cone_parking.target_depth, preset.target_depth);
        assert_eq!(config.cone_parking.angle_kp, preset.angle_kp);
        assert_eq!(config.cone_parking.probes.cone.half_x, 14);
        assert_eq!(config.cone_parking.probes.cone.half_y, preset.probes.cone.half_y);
        assert_eq!(config.cone_parking.probes.side, preset.probes.side);
        assert_eq!(config.wall_parking, ControllerConfig::wall_parking());
    }

    #[test]
    fn test_section_type_error_reported() {
        let err = GatiConfig::from_toml("[cone_parking]
target_depth = \"far\"").unwrap_err();
        assert!(matches!(err, GatiError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GatiConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, GatiError::Io(_)));
    }
}
