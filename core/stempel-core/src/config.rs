//! Device configuration loading and saving.
//!
//! The administrator UID, the registry capacity, and the confirmation
//! timings are fixed configuration values, read once at startup from
//! `~/.stempel/config.json`. A missing file yields the defaults; a
//! malformed file is an error (silently falling back would hide a broken
//! admin UID).

use crate::error::{CoreError, Result};
use crate::uid::TokenUid;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed configuration of one tracker device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// UID of the administrator token that toggles deletion mode.
    pub admin_uid: TokenUid,
    /// Maximum number of registered projects.
    pub max_projects: usize,
    /// How long confirmation screens stay up, in milliseconds.
    pub confirm_millis: u64,
    /// How long short notices ("not found", "max reached") stay up.
    pub notice_millis: u64,
    /// Reader settle time after a handled scan.
    pub settle_millis: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            admin_uid: TokenUid::from("74:8a:71:16"),
            max_projects: 10,
            confirm_millis: 3_000,
            notice_millis: 2_000,
            settle_millis: 1_000,
        }
    }
}

impl DeviceConfig {
    pub fn confirm(&self) -> Duration {
        Duration::from_millis(self.confirm_millis)
    }

    pub fn notice(&self) -> Duration {
        Duration::from_millis(self.notice_millis)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }
}

/// Returns the default configuration file path (~/.stempel/config.json).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".stempel").join("config.json"))
}

/// Loads the device configuration, returning defaults if the file doesn't
/// exist.
pub fn load_device_config(path: &Path) -> Result<DeviceConfig> {
    if !path.exists() {
        return Ok(DeviceConfig::default());
    }
    let content = fs::read_to_string(path).map_err(|source| CoreError::Io {
        context: format!("reading config {}", path.display()),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CoreError::ConfigMalformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves the device configuration to disk, creating parent directories.
pub fn save_device_config(path: &Path, config: &DeviceConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CoreError::Io {
            context: format!("creating config directory {}", parent.display()),
            source,
        })?;
    }
    let content = serde_json::to_string_pretty(config).map_err(|source| {
        CoreError::ConfigMalformed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, content).map_err(|source| CoreError::Io {
        context: format!("writing config {}", path.display()),
        source,
    })
}
