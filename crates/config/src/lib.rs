#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for pinst
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/pinst/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)
//!
//! It also persists the installer geometry, see [`geometry`].

pub mod geometry;

pub use geometry::{Geometry, GeometryStore};

use pinst_errors::{ConfigError, Error};
use pinst_types::ColorChoice;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory name under the user's config directory
pub const APP_DIR: &str = "pinst";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub service: ServiceConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
    /// Ask before committing the parsed actions
    #[serde(default = "default_confirm")]
    pub confirm: bool,
    /// Editor command; `$VISUAL`/`$EDITOR` when unset
    #[serde(default)]
    pub editor: Option<String>,
}

/// Privileged service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Privilege escalation command prepended to every pacman call
    #[serde(default = "default_escalation")]
    pub escalation: String,
    #[serde(default = "default_pacman")]
    pub pacman: PathBuf,
    /// Lock file held for the lifetime of a session
    #[serde(default = "default_lock_file")]
    pub lock_file: PathBuf,
    /// Pacman's own database lock
    #[serde(default = "default_db_lock")]
    pub db_lock: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
            confirm: true,
            editor: None,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            escalation: default_escalation(),
            pacman: default_pacman(),
            lock_file: default_lock_file(),
            db_lock: default_db_lock(),
        }
    }
}

// Default value functions for serde
fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_confirm() -> bool {
    true
}

fn default_escalation() -> String {
    "pkexec".to_string()
}

fn default_pacman() -> PathBuf {
    PathBuf::from("pacman")
}

fn default_lock_file() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pinst.lck")
}

fn default_db_lock() -> PathBuf {
    PathBuf::from("/var/lib/pacman/db.lck")
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join(APP_DIR).join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // PINST_COLOR
        if let Ok(color) = std::env::var("PINST_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "PINST_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // PINST_CONFIRM
        if let Ok(confirm) = std::env::var("PINST_CONFIRM") {
            self.general.confirm = match confirm.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "PINST_CONFIRM".to_string(),
                        value: confirm,
                    }
                    .into())
                }
            };
        }

        // PINST_ESCALATION
        if let Ok(escalation) = std::env::var("PINST_ESCALATION") {
            if escalation.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "PINST_ESCALATION".to_string(),
                    value: escalation,
                }
                .into());
            }
            self.service.escalation = escalation;
        }

        if let Ok(pacman) = std::env::var("PINST_PACMAN") {
            self.service.pacman = PathBuf::from(pacman);
        }

        if let Ok(lock_file) = std::env::var("PINST_LOCK_FILE") {
            self.service.lock_file = PathBuf::from(lock_file);
        }

        if let Ok(db_lock) = std::env::var("PINST_DB_LOCK") {
            self.service.db_lock = PathBuf::from(db_lock);
        }

        Ok(())
    }
}
