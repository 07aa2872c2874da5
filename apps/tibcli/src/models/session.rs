//! Session record

use crate::credentials::SettingsRecord;
use crate::error::{CliError, CliResult};
use crate::models::{IdmLoginResponse, Sandbox, StoredCookie};
use serde::{Deserialize, Serialize};

/// One organization the user can log in to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub subscription_id: String,
}

/// Platform session established by the IDM login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub cookies: Vec<StoredCookie>,

    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub user_id: String,
    pub org_name: String,
    pub ts: i64,

    pub domain_url: String,
    pub org_display_name: String,
    pub org_list: Vec<OrgEntry>,
    pub subscription_id: String,

    pub default_sandbox_name: String,
    #[serde(rename = "defaultSandboxOrgId")]
    pub default_sandbox_org_id: String,
}

impl SettingsRecord for Session {
    const FILE_NAME: &'static str = "session";

    fn map_secrets(&mut self, f: fn(&str) -> String) {
        for cookie in &mut self.cookies {
            cookie.value = f(&cookie.value);
        }
    }
}

impl Session {
    /// Build a session from an IDM login response and its cookies
    pub fn from_login(response: IdmLoginResponse, cookies: Vec<StoredCookie>) -> Self {
        Self {
            cookies,
            first_name: response.first_name,
            last_name: response.last_name,
            user_name: response.user_name,
            user_id: response.user_id,
            org_name: response.org_name,
            ts: response.ts,
            domain_url: response.domain_url,
            org_display_name: response.org_display_name,
            org_list: response.org_list,
            subscription_id: response.subscription_id,
            default_sandbox_name: String::new(),
            default_sandbox_org_id: String::new(),
        }
    }

    /// Whether there are any cookies to present
    pub fn has_cookies(&self) -> bool {
        !self.cookies.is_empty()
    }

    /// Merge refreshed cookies into the session.
    ///
    /// An empty existing set takes `incoming` wholesale. Otherwise each
    /// existing cookie matching an incoming one by name, domain and path is
    /// replaced in place; incoming cookies that match nothing are dropped.
    pub fn update_cookies(&mut self, incoming: Vec<StoredCookie>) -> CliResult<()> {
        if incoming.is_empty() {
            return Err(CliError::Protocol(
                "the given new cookies are empty".to_string(),
            ));
        }

        if self.cookies.is_empty() {
            self.cookies = incoming;
            return Ok(());
        }

        for new_cookie in incoming {
            for old_cookie in self.cookies.iter_mut() {
                if old_cookie.same_slot(&new_cookie) {
                    *old_cookie = new_cookie.clone();
                }
            }
        }
        Ok(())
    }

    /// Record the default sandbox reported by the Domain Server
    pub fn set_default_sandbox(&mut self, sandbox: &Sandbox) {
        self.default_sandbox_name = sandbox.name.clone();
        self.default_sandbox_org_id = sandbox.org_id.clone();
    }

    /// Current organization and region.
    ///
    /// The region is whatever follows the org name in the display name.
    pub fn org_and_region(&self) -> (String, String) {
        let region = self
            .org_display_name
            .strip_prefix(self.org_name.as_str())
            .map(|rest| rest.trim().to_string())
            .unwrap_or_default();
        (self.org_name.clone(), region)
    }

    /// Full display name of the user
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
