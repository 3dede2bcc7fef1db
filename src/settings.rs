//! Persistent settings.
//!
//! Stored as JSON; every field has a default so partial files are fine.
//! The default location is `<config dir>/funnel-deck/settings.json`.

use crate::chart::{LifecycleSettings, StalePolicy};
use crate::constants::{
    ANIMATION_DURATION_MS, CONTAINER_PREFIX, CSV_DIR, DEFAULT_CHART_SIZE, JSON_DIR,
    VERTICAL_BREAKPOINT,
};
use crate::data::{ColorPolicy, SourceLayout};
use crate::deck::NavigationPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelSettings {
    /// Directory the data paths are relative to
    pub data_root: PathBuf,
    pub json_dir: String,
    pub csv_dir: String,
    /// Id prefix of funnel containers
    pub container_prefix: String,
    /// Viewport width at or below which funnels turn vertical
    pub vertical_breakpoint: f64,
    pub animation_duration_ms: u64,
    /// Chart size used when a container has neither a measured box nor explicit size
    pub default_width: f64,
    pub default_height: f64,
    pub colors: ColorPolicy,
    pub navigation: NavigationPolicy,
    pub stale_resolutions: StalePolicy,
}

impl Default for FunnelSettings {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("."),
            json_dir: JSON_DIR.to_string(),
            csv_dir: CSV_DIR.to_string(),
            container_prefix: CONTAINER_PREFIX.to_string(),
            vertical_breakpoint: VERTICAL_BREAKPOINT,
            animation_duration_ms: ANIMATION_DURATION_MS,
            default_width: DEFAULT_CHART_SIZE.0,
            default_height: DEFAULT_CHART_SIZE.1,
            colors: ColorPolicy::default(),
            navigation: NavigationPolicy::default(),
            stale_resolutions: StalePolicy::default(),
        }
    }
}

impl FunnelSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the default location, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default() -> Self {
        let Some(path) = default_settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_error)
    }

    pub fn source_layout(&self) -> SourceLayout {
        SourceLayout {
            json_dir: self.json_dir.clone(),
            csv_dir: self.csv_dir.clone(),
        }
    }

    pub fn lifecycle(&self) -> LifecycleSettings {
        LifecycleSettings {
            vertical_breakpoint: self.vertical_breakpoint,
            animation_duration: Duration::from_millis(self.animation_duration_ms),
            colors: self.colors,
            stale: self.stale_resolutions,
        }
    }
}

/// `<config dir>/funnel-deck/settings.json`, when the platform has a config dir
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("funnel-deck").join("settings.json"))
}
