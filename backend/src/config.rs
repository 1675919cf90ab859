//! Guide configuration file support.
//!
//! This module reads the service configuration from a TOML file and layers
//! environment overrides on top of it.
//!
//! ```toml
//! [listings]
//! file = "/srv/tvsl/listings.xml"
//! poll_interval_secs = 5
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [grid]
//! slot_count = 3
//! slot_width = 30
//! cache_capacity = 256
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GuideError, GuideResult};
use crate::models::validate_grid_shape;
use crate::services::grid::{DEFAULT_SLOT_COUNT, DEFAULT_SLOT_WIDTH};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "GUIDE_CONFIG";

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideConfig {
    #[serde(default)]
    pub listings: ListingsSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub grid: GridSettings,
}

/// Where the feed lives and how often it is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingsSettings {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

/// HTTP bind address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Grid defaults applied when a request leaves a parameter out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSettings {
    #[serde(default = "default_slot_count")]
    pub slot_count: u32,
    #[serde(default = "default_slot_width")]
    pub slot_width: u32,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_slot_count() -> u32 {
    DEFAULT_SLOT_COUNT
}

fn default_slot_width() -> u32 {
    DEFAULT_SLOT_WIDTH
}

fn default_cache_capacity() -> usize {
    256
}

impl Default for ListingsSettings {
    fn default() -> Self {
        Self {
            file: None,
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            slot_count: default_slot_count(),
            slot_width: default_slot_width(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl GuideConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(GuideConfig)` if successful
    /// * `Err(GuideError::Configuration)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> GuideResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GuideError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            GuideError::configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `guide.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when no file exists in any of them.
    pub fn from_default_location() -> GuideResult<Option<Self>> {
        let search_paths = [
            PathBuf::from("guide.toml"),
            PathBuf::from("backend/guide.toml"),
            PathBuf::from("../guide.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }

        Ok(None)
    }

    /// Resolve the process configuration: file (explicit or searched), then
    /// environment overrides, then validation.
    pub fn load() -> GuideResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LISTINGS_FILE`, `HOST`, `PORT` and `POLL_INTERVAL_SECS` from the environment.
    pub fn apply_env_overrides(&mut self) -> GuideResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> GuideResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(file) = lookup("LISTINGS_FILE") {
            self.listings.file = Some(PathBuf::from(file));
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| {
                GuideError::configuration(format!("PORT must be a port number, got '{}'", port))
            })?;
        }
        if let Some(secs) = lookup("POLL_INTERVAL_SECS") {
            self.listings.poll_interval_secs = secs.parse().map_err(|_| {
                GuideError::configuration(format!(
                    "POLL_INTERVAL_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
        }
        Ok(())
    }

    /// Check that the configuration describes a runnable service.
    pub fn validate(&self) -> GuideResult<()> {
        match &self.listings.file {
            Some(file) if !file.as_os_str().is_empty() => {}
            _ => {
                return Err(GuideError::configuration(
                    "no listings file configured (set [listings] file or LISTINGS_FILE)",
                ))
            }
        }
        if self.listings.poll_interval_secs == 0 {
            return Err(GuideError::configuration(
                "listings.poll_interval_secs must be at least 1",
            ));
        }
        validate_grid_shape(self.grid.slot_count, self.grid.slot_width)
            .map_err(|e| GuideError::configuration(format!("invalid [grid] defaults: {}", e)))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.listings.poll_interval_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
