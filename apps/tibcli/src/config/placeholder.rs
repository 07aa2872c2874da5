//! Branded placeholder values
//!
//! Branding overwrites a fixed-width run of one marker character with the real
//! value. A build that skipped branding still carries the markers, which is how
//! an unset value is told apart from a deliberately short one.
//!
//! Values come from `TIBCLI_BRAND_<KEY>` at compile time. At runtime
//! `TIBCLI_<KEY>` overrides the branded value.

use crate::error::{CliError, CliResult};
use crate::logging::Logger;
use std::collections::HashMap;

/// Width of an unbranded placeholder
const PLACEHOLDER_WIDTH: usize = 115;

/// Wider slots for values that hold URLs
const URL_PLACEHOLDER_WIDTH: usize = 255;

/// A branded configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Username,
    DomainServerHost,
    AccountsUrl,
    AccountsClientId,
    IdmServerHost,
    TenantId,
    Region,
    DeploymentName,
    FtlEnabled,
}

impl Placeholder {
    /// Every placeholder, in registry order
    pub const ALL: [Placeholder; 9] = [
        Placeholder::Username,
        Placeholder::DomainServerHost,
        Placeholder::AccountsUrl,
        Placeholder::AccountsClientId,
        Placeholder::IdmServerHost,
        Placeholder::TenantId,
        Placeholder::Region,
        Placeholder::DeploymentName,
        Placeholder::FtlEnabled,
    ];

    /// Name used in error messages and debug dumps
    pub fn name(self) -> &'static str {
        match self {
            Placeholder::Username => "username_placeholder",
            Placeholder::DomainServerHost => "domain_server_host_port_placeholder",
            Placeholder::AccountsUrl => "TA_server_url_placeholder",
            Placeholder::AccountsClientId => "oauth_cid",
            Placeholder::IdmServerHost => "identity_management_server_host_port_placeholder",
            Placeholder::TenantId => "tci_tenant_id_placeholder",
            Placeholder::Region => "region_placeholder",
            Placeholder::DeploymentName => "deployment_name_placeholder",
            Placeholder::FtlEnabled => "ftl_enabled_option_placeholder",
        }
    }

    /// Marker character filling the unbranded slot
    pub fn marker(self) -> char {
        match self {
            Placeholder::Username => '@',
            Placeholder::DomainServerHost => '!',
            Placeholder::AccountsUrl => '/',
            Placeholder::AccountsClientId => '&',
            Placeholder::IdmServerHost => '*',
            Placeholder::TenantId => '%',
            Placeholder::Region => '?',
            Placeholder::DeploymentName => '$',
            Placeholder::FtlEnabled => '|',
        }
    }

    /// Runtime override variable
    pub fn env_key(self) -> &'static str {
        match self {
            Placeholder::Username => "TIBCLI_USERNAME",
            Placeholder::DomainServerHost => "TIBCLI_DOMAIN_SERVER_HOST",
            Placeholder::AccountsUrl => "TIBCLI_ACCOUNTS_URL",
            Placeholder::AccountsClientId => "TIBCLI_ACCOUNTS_CLIENT_ID",
            Placeholder::IdmServerHost => "TIBCLI_IDM_SERVER_HOST",
            Placeholder::TenantId => "TIBCLI_TENANT_ID",
            Placeholder::Region => "TIBCLI_REGION",
            Placeholder::DeploymentName => "TIBCLI_DEPLOYMENT_NAME",
            Placeholder::FtlEnabled => "TIBCLI_FTL_ENABLED",
        }
    }

    fn branded(self) -> Option<&'static str> {
        match self {
            Placeholder::Username => option_env!("TIBCLI_BRAND_USERNAME"),
            Placeholder::DomainServerHost => option_env!("TIBCLI_BRAND_DOMAIN_SERVER_HOST"),
            Placeholder::AccountsUrl => option_env!("TIBCLI_BRAND_ACCOUNTS_URL"),
            Placeholder::AccountsClientId => option_env!("TIBCLI_BRAND_ACCOUNTS_CLIENT_ID"),
            Placeholder::IdmServerHost => option_env!("TIBCLI_BRAND_IDM_SERVER_HOST"),
            Placeholder::TenantId => option_env!("TIBCLI_BRAND_TENANT_ID"),
            Placeholder::Region => option_env!("TIBCLI_BRAND_REGION"),
            Placeholder::DeploymentName => option_env!("TIBCLI_BRAND_DEPLOYMENT_NAME"),
            Placeholder::FtlEnabled => option_env!("TIBCLI_BRAND_FTL_ENABLED"),
        }
    }

    /// The fixed-width marker run a build carries before branding
    pub fn unbranded(self) -> String {
        let width = match self {
            Placeholder::Username | Placeholder::DomainServerHost | Placeholder::AccountsUrl => {
                URL_PLACEHOLDER_WIDTH
            }
            _ => PLACEHOLDER_WIDTH,
        };
        self.marker().to_string().repeat(width)
    }

    /// Whether the value must stay out of debug output
    pub fn is_sensitive(self) -> bool {
        self == Placeholder::AccountsClientId
    }
}

/// Returns true if at least one character differs from the marker.
///
/// A marker run of any length, including an empty string, counts as not
/// replaced.
pub fn is_placeholder_replaced(marker: char, value: &str) -> bool {
    value.chars().any(|c| c != marker)
}

/// Source of branded configuration values
#[derive(Debug, Clone)]
pub struct PlaceholderRegistry {
    values: HashMap<Placeholder, String>,
}

impl PlaceholderRegistry {
    /// Values compiled into the binary; unbranded slots keep their markers
    pub fn branded() -> Self {
        let values = Placeholder::ALL
            .iter()
            .map(|&key| {
                let value = key
                    .branded()
                    .map(str::to_string)
                    .unwrap_or_else(|| key.unbranded());
                (key, value)
            })
            .collect();
        Self { values }
    }

    /// Branded values with `TIBCLI_<KEY>` runtime overrides applied
    pub fn from_env() -> Self {
        let mut registry = Self::branded();
        for key in Placeholder::ALL {
            if let Ok(value) = std::env::var(key.env_key()) {
                registry.values.insert(key, value);
            }
        }
        registry
    }

    /// Override one value
    pub fn with_value(mut self, key: Placeholder, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// The raw, untrimmed value
    pub fn raw(&self, key: Placeholder) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Get a placeholder value, trimmed of surrounding whitespace
    pub fn get(&self, key: Placeholder) -> CliResult<String> {
        let raw = self.raw(key);
        let trimmed = raw.trim();

        if key != Placeholder::DeploymentName && trimmed.is_empty() {
            return Err(CliError::PlaceholderEmpty { name: key.name() });
        }

        if !is_placeholder_replaced(key.marker(), raw) {
            return Err(CliError::PlaceholderNotReplaced { name: key.name() });
        }

        Ok(trimmed.to_string())
    }

    /// Whether FTL support is switched on for this brand
    pub fn ftl_enabled(&self) -> CliResult<bool> {
        let value = self.get(Placeholder::FtlEnabled)?;
        Ok(value.eq_ignore_ascii_case("true"))
    }

    /// Log every value at debug level for inspection during testing
    pub fn dump(&self, logger: &Logger, sensitive: bool) {
        for key in Placeholder::ALL {
            if key.is_sensitive() && !sensitive {
                continue;
            }
            let shown = match self.get(key) {
                Ok(value) => value,
                Err(e) => e.to_string(),
            };
            logger.debug(format!("Placeholder '{}' value: '{}'", key.name(), shown));
        }
    }
}
