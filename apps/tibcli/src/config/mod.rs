//! Configuration management for the tibcli CLI

mod paths;
mod placeholder;
mod settings;

pub use paths::{ConfigPaths, SETTINGS_DIR};
pub use placeholder::{is_placeholder_replaced, Placeholder, PlaceholderRegistry};
pub use settings::{Settings, DONT_PERSIST_ENV, SENSITIVE_DEBUG_ENV, TRANSPORT_ENV};

/// Version of this client, compared against the platform api version and
/// stored in the profile
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
