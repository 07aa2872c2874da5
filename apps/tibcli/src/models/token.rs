//! Token record and accounts-service responses

use crate::credentials::SettingsRecord;
use crate::models::StoredCookie;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Name of the cookie that carries the access token
pub const ACCESS_TOKEN_NAME: &str = "AccessToken";

/// Accounts-service access token, stored in cookie shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "AccessToken", default)]
    pub access_token: Option<StoredCookie>,
}

impl SettingsRecord for Token {
    const FILE_NAME: &'static str = "token";

    fn map_secrets(&mut self, f: fn(&str) -> String) {
        if let Some(cookie) = self.access_token.as_mut() {
            cookie.value = f(&cookie.value);
        }
    }
}

impl Token {
    /// Wrap a freshly issued access token, expiring `expires_in` seconds from now.
    ///
    /// An `expires_in` too large to represent leaves the expiry unset.
    pub fn issued(access_token: impl Into<String>, expires_in: i64) -> Self {
        let mut cookie = StoredCookie::new(ACCESS_TOKEN_NAME, access_token);
        if let Some(expires) =
            Duration::try_seconds(expires_in).and_then(|d| Utc::now().checked_add_signed(d))
        {
            cookie = cookie.with_expires(expires);
        }
        Self {
            access_token: Some(cookie),
        }
    }

    /// A missing token or one whose expiry has passed is invalid
    pub fn is_valid(&self) -> bool {
        match &self.access_token {
            Some(cookie) => !cookie.is_expired(),
            None => false,
        }
    }

    /// The access token value, if any
    pub fn value(&self) -> Option<&str> {
        self.access_token.as_ref().map(|c| c.value.as_str())
    }
}

/// Response from the accounts-service token endpoint
///
/// Every field is optional: errors arrive in the same shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Seconds until the access token expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}
