//! Configuration management for scribe-pad.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, lazy validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{AutosaveConfig, StorageConfig},
};

use std::{fs, io::Write, panic::Location, path::PathBuf};

use crate::config::{DEFAULT_DEBOUNCE_SECS, DEFAULT_FLOOR_SECS};
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Autosave timing settings.
    pub autosave: AutosaveConfig,
    /// Transcript storage settings.
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    ///
    /// Note: This does NOT validate the timing values. Call
    /// `validate_delays()` before wiring the scheduler so a hand-edited
    /// config with a floor shorter than the debounce is caught early.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Validate the autosave delays.
    ///
    /// The debounce must be at least one second and the floor must not be
    /// shorter than the debounce, or the "floor bounds staleness" guarantee
    /// degenerates.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate_delays(&self) -> AppResult<()> {
        if self.autosave.debounce_secs == 0 {
            return Err(AppError::ConfigError {
                reason: "autosave.debounce_secs must be at least 1".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.autosave.floor_secs < self.autosave.debounce_secs {
            return Err(AppError::ConfigError {
                reason: format!(
                    "autosave.floor_secs ({}) must not be shorter than autosave.debounce_secs ({})",
                    self.autosave.floor_secs, self.autosave.debounce_secs
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Directory holding the stored transcript.
    ///
    /// The configured override wins; otherwise the platform data dir.
    #[track_caller]
    pub fn data_dir(&self) -> AppResult<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }

        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.data_dir().join("transcripts"))
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "scribe-pad", "Scribe-Pad").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let config = Config {
            autosave: AutosaveConfig {
                debounce_secs: DEFAULT_DEBOUNCE_SECS,
                floor_secs: DEFAULT_FLOOR_SECS,
            },
            storage: StorageConfig { data_dir: None },
        };

        config.save()?;

        Ok(config)
    }
}
