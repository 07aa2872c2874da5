//! Cookie record shared by the session and token files

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A cookie as persisted in the settings files
///
/// Keys are PascalCase so files written by earlier clients stay readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub domain: String,
    /// `None` means no expiry is tracked
    #[serde(
        default,
        deserialize_with = "deserialize_expires",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<DateTime<Utc>>,
}

impl StoredCookie {
    /// Create a cookie with no path, domain or expiry
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Builder: set the expiry
    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Builder: set domain and path
    pub fn with_scope(mut self, domain: impl Into<String>, path: impl Into<String>) -> Self {
        self.domain = domain.into();
        self.path = path.into();
        self
    }

    /// True only when an expiry is tracked and lies in the past
    pub fn is_expired(&self) -> bool {
        self.expires.is_some_and(|expires| expires < Utc::now())
    }

    /// Whether this cookie occupies the same slot as `other`
    pub fn same_slot(&self, other: &StoredCookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }

    /// `name=value` form used in a `Cookie` request header
    pub fn header_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Join cookies into a single `Cookie` header value
pub fn cookie_header(cookies: &[StoredCookie]) -> String {
    cookies
        .iter()
        .map(StoredCookie::header_pair)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Older files carry the zero timestamp `0001-01-01T00:00:00Z` for "unset".
fn deserialize_expires<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<DateTime<Utc>> = Option::deserialize(deserializer)?;
    Ok(value.filter(|expires| expires.year() > 1))
}
