//! Global configuration for stackman
//!
//! Located at `~/.config/stackman/config.toml`

use crate::{ConfigError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global stackman configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub docker: DockerConfig,
    pub dashboard: DashboardConfig,
    pub runtime: RuntimeConfig,
}

/// Docker connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Docker socket path or URL
    pub socket: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket: default_docker_socket(),
        }
    }
}

#[cfg(windows)]
fn default_docker_socket() -> String {
    "//./pipe/docker_engine".to_string()
}

#[cfg(not(windows))]
fn default_docker_socket() -> String {
    "/var/run/docker.sock".to_string()
}

/// Timing knobs for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Interval between status polls while containers exist
    pub refresh_interval_ms: u64,
    /// Delay after a compose stream completes before returning to the status panel
    pub settle_delay_ms: u64,
    /// Maximum wait for a single line of compose output
    pub stream_line_timeout_secs: u64,
    /// How long an error stays on screen
    pub error_display_secs: u64,
    /// Terminal event poll rate
    pub tick_rate_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 2000,
            settle_delay_ms: 1000,
            stream_line_timeout_secs: 30,
            error_display_secs: 5,
            tick_rate_ms: 250,
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn stream_line_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_line_timeout_secs)
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_secs(self.error_display_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Container runtime call limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Grace period handed to docker for stop/restart (values <= 0 mean 10)
    pub stop_timeout_secs: i64,
    pub list_timeout_secs: u64,
    pub start_timeout_secs: u64,
    pub stats_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stop_timeout_secs: 10,
            list_timeout_secs: 5,
            start_timeout_secs: 5,
            stats_timeout_secs: 3,
        }
    }
}

impl RuntimeConfig {
    /// Stop timeout with non-positive values replaced by the default
    pub fn effective_stop_timeout(&self) -> i64 {
        normalize_stop_timeout(self.stop_timeout_secs)
    }
}

/// Replace a non-positive stop timeout with the 10 second default
pub fn normalize_stop_timeout(secs: i64) -> i64 {
    if secs <= 0 {
        10
    } else {
        secs
    }
}

impl GlobalConfig {
    /// Load global configuration from the default path
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load global configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(
            "Loaded config from {:?}: refresh_interval_ms={}",
            path,
            config.dashboard.refresh_interval_ms
        );

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "stackman").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
