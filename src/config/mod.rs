// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, loading user
//! preferences from a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[grid]` - Quantizer settings (maximum grid dimension, color depth)
//! - `[view]` - Grid view settings (initial cell size, zoom anchor)
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set `PIXEL_LENS_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use pixel_lens::config;
//! use pixel_lens::domain::QuantizationMode;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.grid.mode = Some(QuantizationMode::Bit4);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::domain::{CellSize, MaxDimension, QuantizationMode};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Enums (shared between sections)
// =============================================================================

/// Which screen point stays fixed while the grid view zooms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ZoomAnchor {
    /// Wheel zoom keeps the cell under the cursor in place; button zoom uses the center.
    #[default]
    Cursor,
    /// Always zoom around the center of the viewport.
    Center,
}

// =============================================================================
// Section Structs
// =============================================================================

/// Quantizer settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridConfig {
    /// Longest side of the produced grid, in cells.
    #[serde(
        default = "default_max_dimension",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_dimension: Option<u32>,

    /// Color depth applied to each cell.
    #[serde(
        default = "default_mode",
        with = "mode_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode: Option<QuantizationMode>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            mode: default_mode(),
        }
    }
}

impl GridConfig {
    /// Returns the configured maximum dimension, clamped to the supported range.
    #[must_use]
    pub fn max_dimension(&self) -> MaxDimension {
        self.max_dimension
            .map(MaxDimension::new)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn mode(&self) -> QuantizationMode {
        self.mode.unwrap_or_default()
    }
}

/// Grid view settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewConfig {
    /// Cell pitch in logical pixels, gap included.
    #[serde(default = "default_cell_size", skip_serializing_if = "Option::is_none")]
    pub cell_size: Option<u32>,

    /// Zoom anchor policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_anchor: Option<ZoomAnchor>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            zoom_anchor: Some(ZoomAnchor::default()),
        }
    }
}

impl ViewConfig {
    /// Returns the configured cell size, clamped to the supported range.
    #[must_use]
    pub fn cell_size(&self) -> CellSize {
        self.cell_size.map(CellSize::new).unwrap_or_default()
    }

    #[must_use]
    pub fn zoom_anchor(&self) -> ZoomAnchor {
        self.zoom_anchor.unwrap_or_default()
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// Quantizer settings.
    #[serde(default)]
    pub grid: GridConfig,

    /// Grid view settings.
    #[serde(default)]
    pub view: ViewConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_max_dimension() -> Option<u32> {
    Some(DEFAULT_MAX_DIMENSION)
}

fn default_mode() -> Option<QuantizationMode> {
    Some(QuantizationMode::default())
}

fn default_cell_size() -> Option<u32> {
    Some(DEFAULT_CELL_SIZE)
}

/// Reads and writes the color depth as its lowercase name (`bit1`, `bit4`, ...).
mod mode_format {
    use crate::domain::QuantizationMode;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        mode: &Option<QuantizationMode>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match mode {
            Some(mode) => serializer.serialize_str(mode.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> std::result::Result<Option<QuantizationMode>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let raw = String::deserialize(deserializer)?;
        raw.to_lowercase()
            .parse::<QuantizationMode>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid mode: {}", raw)))
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "falling back to default config");
                    return (
                        Config::default(),
                        Some(format!("Could not read {}: {}", path.display(), err)),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            grid: GridConfig {
                max_dimension: Some(64),
                mode: Some(QuantizationMode::Bit8),
            },
            view: ViewConfig {
                cell_size: Some(9),
                zoom_anchor: Some(ZoomAnchor::Center),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn load_with_override_falls_back_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[grid]\nmode = \"bit3\"")
            .expect("failed to write config");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));

        assert_eq!(config, Config::default());
        assert!(warning.is_some());
    }

    #[test]
    fn load_with_override_missing_file_is_silent_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn partial_sections_use_defaults() {
        let config: Config = toml::from_str("[grid]\nmode = \"bit1\"\n").expect("valid toml");
        assert_eq!(config.grid.mode(), QuantizationMode::Bit1);
        assert_eq!(config.grid.max_dimension().value(), DEFAULT_MAX_DIMENSION);
        assert_eq!(config.view.cell_size().value(), DEFAULT_CELL_SIZE);
        assert_eq!(config.view.zoom_anchor(), ZoomAnchor::Cursor);
    }

    #[test]
    fn out_of_range_values_are_clamped_on_access() {
        let config: Config =
            toml::from_str("[grid]\nmax_dimension = 500\n[view]\ncell_size = 0\n")
                .expect("valid toml");
        assert_eq!(config.grid.max_dimension().value(), MAX_MAX_DIMENSION);
        assert_eq!(config.view.cell_size().value(), MIN_CELL_SIZE);
    }

    #[test]
    fn save_with_override_and_load_with_override_round_trip() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();

        let config = Config {
            grid: GridConfig {
                max_dimension: Some(48),
                mode: Some(QuantizationMode::Bit4),
            },
            ..Config::default()
        };

        save_with_override(&config, Some(base_dir.clone())).expect("failed to save");
        let (loaded, warning) = load_with_override(Some(base_dir));

        assert!(warning.is_none());
        assert_eq!(loaded.grid.max_dimension, Some(48));
        assert_eq!(loaded.grid.mode, Some(QuantizationMode::Bit4));
    }
}
