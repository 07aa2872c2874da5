//! Record storage on top of the settings directory

use crate::config::ConfigPaths;
use crate::credentials::file::SettingsFile;
use crate::credentials::obfuscation::{deobfuscate, obfuscate};
use crate::error::{CliError, CliResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record persisted as one JSON file in the settings directory
pub trait SettingsRecord: Serialize + DeserializeOwned + Default + Clone {
    /// File name inside the settings directory
    const FILE_NAME: &'static str;

    /// Apply `f` to every secret value held by the record.
    ///
    /// Records without secrets keep the default no-op.
    fn map_secrets(&mut self, _f: fn(&str) -> String) {}
}

/// Reads and writes settings records
#[derive(Debug, Clone)]
pub struct SettingsStore {
    paths: ConfigPaths,
}

impl SettingsStore {
    /// Create a store rooted at the given settings paths
    pub fn new(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    /// Settings paths this store writes to
    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    fn file<R: SettingsRecord>(&self) -> SettingsFile {
        SettingsFile::new(self.paths.record_file(R::FILE_NAME))
    }

    /// Load a record; an absent file yields the default record.
    ///
    /// With `reveal` set, obfuscated secrets are restored after parsing.
    pub fn load<R: SettingsRecord>(&self, reveal: bool) -> CliResult<R> {
        let Some(bytes) = self.file::<R>().read()? else {
            return Ok(R::default());
        };

        let mut record: R =
            serde_json::from_slice(&bytes).map_err(|e| CliError::CorruptSettings {
                file: R::FILE_NAME,
                message: e.to_string(),
            })?;

        if reveal {
            record.map_secrets(deobfuscate);
        }
        Ok(record)
    }

    /// Write a record, obfuscating its secrets when `conceal` is set.
    ///
    /// The caller's copy is left untouched.
    pub fn save<R: SettingsRecord>(&self, record: &R, conceal: bool) -> CliResult<()> {
        let json = if conceal {
            let mut stored = record.clone();
            stored.map_secrets(obfuscate);
            serde_json::to_vec_pretty(&stored)?
        } else {
            serde_json::to_vec_pretty(record)?
        };

        self.file::<R>().write(&json)
    }

    /// Delete a record's file if present
    pub fn delete<R: SettingsRecord>(&self) -> CliResult<()> {
        self.file::<R>().delete()
    }

    /// Check whether a record's file exists
    pub fn exists<R: SettingsRecord>(&self) -> bool {
        self.file::<R>().exists()
    }
}
