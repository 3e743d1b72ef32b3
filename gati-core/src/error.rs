//! Error types for GATI

use thiserror::Error;

/// GATI error type
///
/// Nothing inside a controller tick produces one of these. Errors come from
/// building a controller with a bad configuration or from loading files.
#[derive(Error, Debug)]
pub enum GatiError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration record rejected
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML or YAML could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Depth buffer does not match its declared geometry
    #[error("Invalid depth map: {0}")]
    DepthMap(String),

    /// Scenario trace is inconsistent
    #[error("Scenario error: {0}")]
    Scenario(String),
}

impl GatiError {
    /// Shorthand for a configuration rejection.
    pub fn config(msg: impl Into<String>) -> Self {
        GatiError::Config(msg.into())
    }
}

impl From<toml::de::Error> for GatiError {
    fn from(e: toml::de::Error) -> Self {
        GatiError::Parse(e.to_string())
    }
}

impl From<serde_yaml::Error> for GatiError {
    fn from(e: serde_yaml::Error) -> Self {
        GatiError::Parse(e.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, GatiError>;
