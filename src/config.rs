//! Configuration for surfaces and the demo binary

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::Extent2D;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Parse from TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a `.toml` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        ensure_toml(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Save configuration to a `.toml` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        ensure_toml(path)?;
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn ensure_toml(path: &Path) -> Result<(), ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(()),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// What `attach_image` does with an image whose extent differs from the surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachPolicy {
    /// Attach has no observable effect
    #[default]
    Ignore,
    /// Log a warning on mismatch
    Warn,
    /// Fail with `ExtentMismatch`
    Reject,
}

/// Per-surface behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub attach_policy: AttachPolicy,
}

impl Config for SurfaceConfig {}

/// Window the demo opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl WindowConfig {
    pub fn extent(&self) -> Extent2D {
        Extent2D::new(self.width, self.height)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Soft Surface".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Headless run script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Frames to present
    pub frames: u64,
    /// Resize the window every N frames, 0 to never resize
    pub resize_every: u64,
    /// Pixels added to each dimension per resize
    pub resize_step: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            resize_every: 30,
            resize_step: 64,
        }
    }
}

/// Demo binary configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub surface: SurfaceConfig,
    pub window: WindowConfig,
    pub run: RunConfig,
}

impl Config for AppConfig {}
