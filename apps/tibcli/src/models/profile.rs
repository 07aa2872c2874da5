//! Profile record

use crate::config::CLI_VERSION;
use crate::credentials::SettingsRecord;
use serde::{Deserialize, Serialize};

/// Long-lived user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Client version that wrote the settings
    #[serde(rename = "tibcliVersion")]
    pub version: String,
    #[serde(rename = "idmConnectUrl")]
    pub idm_connect_url: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "knownRegion")]
    pub known_region: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            version: CLI_VERSION.to_string(),
            idm_connect_url: String::new(),
            user_email: String::new(),
            known_region: String::new(),
        }
    }
}

impl SettingsRecord for Profile {
    const FILE_NAME: &'static str = "profile";
}

impl Profile {
    /// Whether the settings were written by a different client version
    pub fn is_stale(&self) -> bool {
        self.version != CLI_VERSION
    }
}
