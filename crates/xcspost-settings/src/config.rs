//! Configuration for xcspost
//!
//! Post processor options plus output preferences, stored as JSON or TOML.
//! The default location is `<config dir>/xcspost/config.toml`.

pub use xcspost_camtools::PostConfig;
pub use xcspost_core::units::{FeedRateUnits, MeasurementSystem};
pub use xcspost_core::SourceUnits;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SettingsError, SettingsResult};

/// Highest accepted output precision
pub const MAX_PRECISION: usize = 10;

/// Output file preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Extension of the written G-Code file
    pub gcode_extension: String,
    /// Indent the `.xcs` JSON
    pub pretty_json: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            gcode_extension: "gcode".to_string(),
            pretty_json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Units the input G-Code is written in
    pub input: SourceUnits,
    pub post: PostConfig,
    pub output: OutputSettings,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/xcspost/config.toml`, falling back to the home directory
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("xcspost");
        path.push("config.toml");
        path
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Load the file when it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating the parent directory
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let post = &self.post;
        if post.precision > MAX_PRECISION {
            return Err(SettingsError::invalid(
                "precision",
                format!("must be at most {}", MAX_PRECISION),
            ));
        }
        if !post.chord_error.is_finite() || post.chord_error <= 0.0 {
            return Err(SettingsError::invalid("chord_error", "must be > 0"));
        }
        if self.output.gcode_extension.trim().is_empty() {
            return Err(SettingsError::invalid("gcode_extension", "must not be empty"));
        }
        Ok(())
    }
}
