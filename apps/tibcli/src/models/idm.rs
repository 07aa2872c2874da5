//! IDM and Domain Server payloads

use crate::models::OrgEntry;
use serde::{Deserialize, Serialize};

/// Org/region hint sent with an IDM login
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgHint {
    pub account_name: Option<String>,
    pub region: Option<String>,
}

impl OrgHint {
    /// Hint for a specific org and region
    pub fn new(account_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_name: Some(account_name.into()),
            region: Some(region.into()),
        }
    }

    /// No hint: the IDM picks the user's default organization
    pub fn none() -> Self {
        Self::default()
    }
}

/// Body of `POST /idm/v2/login-oauth`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdmLoginRequest {
    pub user_name: String,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// True when the user just typed their credentials
    pub login_flag: bool,
}

/// Session fields returned by the IDM login
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdmLoginResponse {
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
}

/// Sandbox descriptor from the Domain Server
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sandbox {
    pub name: String,
    pub org_id: String,
}
