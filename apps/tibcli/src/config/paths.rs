//! Per-user settings paths

use crate::error::{CliError, CliResult};
use std::path::PathBuf;

/// Name of the settings directory under the user's home directory
pub const SETTINGS_DIR: &str = ".tibcli";

/// Settings paths for the tibcli CLI
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Base settings directory
    pub config_dir: PathBuf,
    /// Path to the profile record
    pub profile_file: PathBuf,
    /// Path to the session record
    pub session_file: PathBuf,
    /// Path to the token record
    pub token_file: PathBuf,
}

impl ConfigPaths {
    /// Get settings paths for the current user
    ///
    /// Defaults to `~/.tibcli/`; `TIBCLI_CONFIG_DIR` overrides the directory.
    pub fn new() -> CliResult<Self> {
        Ok(Self::in_dir(Self::get_config_dir()?))
    }

    /// Build paths rooted at an explicit directory
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            profile_file: config_dir.join("profile"),
            session_file: config_dir.join("session"),
            token_file: config_dir.join("token"),
            config_dir,
        }
    }

    fn get_config_dir() -> CliResult<PathBuf> {
        if let Ok(dir) = std::env::var("TIBCLI_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(SETTINGS_DIR))
    }

    /// Path of the file backing the named record
    pub fn record_file(&self, name: &str) -> PathBuf {
        self.config_dir.join(name)
    }
}
