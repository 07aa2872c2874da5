//! Client/platform version compatibility

use crate::config::CLI_VERSION;
use crate::error::{CliError, CliResult};

/// Major component of a `major.minor.patch` version
pub fn major(version: &str) -> &str {
    version.trim().split('.').next().unwrap_or("")
}

/// Fail unless the platform api shares this client's major version
pub fn ensure_compatible(platform_version: &str) -> CliResult<()> {
    if major(platform_version) != major(CLI_VERSION) {
        return Err(CliError::IncompatibleVersion {
            platform: platform_version.trim().to_string(),
            cli: CLI_VERSION.to_string(),
        });
    }
    Ok(())
}
