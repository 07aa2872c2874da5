//! Persisted profile, session and token records

mod file;
mod obfuscation;
mod store;

pub use file::SettingsFile;
pub use obfuscation::{deobfuscate, obfuscate, OBFUSCATION_PREFIX};
pub use store::{SettingsRecord, SettingsStore};
