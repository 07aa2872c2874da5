//! Runtime switches read from the environment

use crate::api::TransportMode;
use crate::config::{Placeholder, PlaceholderRegistry};
use crate::error::CliResult;

/// Skip persisting the OAuth token when set
pub const DONT_PERSIST_ENV: &str = "TIBCLI_DONT_PERSIST";

/// Extra debug output that includes sensitive values
pub const SENSITIVE_DEBUG_ENV: &str = "TASCLI_DBG";

/// Explicit transport selection
pub const TRANSPORT_ENV: &str = "TIBCLI_TRANSPORT";

/// Default HTTP timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process-wide settings, resolved once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    /// Do not write the OAuth token to disk
    pub dont_persist: bool,
    /// Show secrets in debug output
    pub sensitive_debug: bool,
    /// TLS transport variant for outbound calls
    pub transport: TransportMode,
    /// HTTP request timeout
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dont_persist: false,
            sensitive_debug: false,
            transport: TransportMode::Standard,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Resolve settings from the environment and the placeholder registry.
    ///
    /// `TIBCLI_TRANSPORT` wins when set. Otherwise a non-empty deployment name
    /// selects the insecure development transport.
    pub fn from_env(registry: &PlaceholderRegistry) -> CliResult<Self> {
        let transport = match env_value(TRANSPORT_ENV) {
            Some(value) => value.parse()?,
            None => {
                let deployment = registry.get(Placeholder::DeploymentName)?;
                TransportMode::for_deployment(&deployment)
            }
        };

        Ok(Self {
            dont_persist: env_value(DONT_PERSIST_ENV).is_some(),
            sensitive_debug: env_value(SENSITIVE_DEBUG_ENV).is_some(),
            transport,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }
}

/// Non-empty environment value
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
