//! Persisted installer geometry
//!
//! Position and size are stored as a small TOML document keyed by
//! organization and application name. A missing or unreadable document is
//! not an error: callers get [`Geometry::default`].

use pinst_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const ORGANIZATION: &str = "pinst";
pub const APPLICATION: &str = "installer";

/// Last known position and size of the installer surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default = "default_position")]
    pub position: (i32, i32),
    #[serde(default = "default_size")]
    pub size: (u32, u32),
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            position: default_position(),
            size: default_size(),
        }
    }
}

fn default_position() -> (i32, i32) {
    (100, 100)
}

fn default_size() -> (u32, u32) {
    (600, 400)
}

/// File-backed geometry storage
#[derive(Debug, Clone)]
pub struct GeometryStore {
    path: PathBuf,
}

impl GeometryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under `<config dir>/pinst/installer.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_location() -> Result<Self, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(Self::new(
            config_dir
                .join(ORGANIZATION)
                .join(format!("{APPLICATION}.toml")),
        ))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored geometry, falling back to defaults
    pub async fn load(&self) -> Geometry {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "no stored geometry");
                return Geometry::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(geometry) => geometry,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable geometry");
                Geometry::default()
            }
        }
    }

    /// Write the geometry, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized or written.
    pub async fn save(&self, geometry: &Geometry) -> Result<(), Error> {
        let contents = toml::to_string(geometry).map_err(|e| ConfigError::SerializeError {
            error: e.to_string(),
        })?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }
        fs::write(&self.path, contents)
            .await
            .map_err(|e| ConfigError::WriteError {
                path: self.path.display().to_string(),
                error: e.to_string(),
            })?;
        Ok(())
    }
}
