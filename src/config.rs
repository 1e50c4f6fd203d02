use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::error::FlipError;
use crate::markup::Selector;

/// Angle and timing constants of the flip.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlipConfig {
    /// Angle past which a release commits to the candidate panel.
    pub snap_threshold: f64,
    /// Angle a full container-height drag maps to.
    pub total_deg: f64,
    /// Resting angle a reverted flip animates back to.
    pub min_deg: f64,
    /// Accumulated movement absorbed before a drag takes effect.
    pub debounce: f64,
    /// Transition used while the clone settles after release.
    pub settle_ms: u64,
}

impl Default for FlipConfig {
    fn default() -> Self {
        FlipConfig {
            snap_threshold: 90.0,
            total_deg: 179.0,
            min_deg: 1.0,
            debounce: 10.0,
            settle_ms: 300,
        }
    }
}

impl FlipConfig {
    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [self.snap_threshold, self.total_deg, self.min_deg, self.debounce]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::Invalid("angles must be finite".into()));
        }
        if !(0.0 <= self.min_deg && self.min_deg < self.snap_threshold) {
            return Err(ConfigError::Invalid(format!(
                "min_deg {} must lie in [0, snap_threshold {})",
                self.min_deg, self.snap_threshold
            )));
        }
        if self.snap_threshold >= self.total_deg {
            return Err(ConfigError::Invalid(format!(
                "snap_threshold {} must be below total_deg {}",
                self.snap_threshold, self.total_deg
            )));
        }
        if self.debounce < 0.0 {
            return Err(ConfigError::Invalid("debounce must not be negative".into()));
        }
        // Hosts settle a flip when its transition ends; a zero transition never does.
        if self.settle_ms == 0 {
            return Err(ConfigError::Invalid("settle_ms must be positive".into()));
        }
        Ok(())
    }
}

/// Selectors used to find panels and their inner content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttachOptions {
    pub panel_selector: String,
    pub inner_selector: String,
}

impl Default for AttachOptions {
    fn default() -> Self {
        AttachOptions {
            panel_selector: "> section".into(),
            inner_selector: "> .inner".into(),
        }
    }
}

impl AttachOptions {
    pub fn selectors(&self) -> Result<(Selector, Selector), FlipError> {
        Ok((
            Selector::parse(&self.panel_selector)?,
            Selector::parse(&self.inner_selector)?,
        ))
    }
}

/// Settings of the console host.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Pointer units per terminal row.
    pub cell_height: f64,
    /// Viewer distance in container heights, for the card projection.
    pub perspective: f64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            cell_height: 16.0,
            perspective: 3.0,
        }
    }
}

/// Everything a config file may set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub flip: FlipConfig,
    pub attach: AttachOptions,
    pub terminal: TerminalConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid flip configuration: {0}")]
    Invalid(String),
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.flip.validate()?;
        Ok(settings)
    }
}
