//! Owner-only settings file I/O

use crate::error::CliResult;
use std::path::{Path, PathBuf};

/// A single settings file on disk
///
/// The containing directory is created owner-only (0700) and the file itself
/// owner read/write (0600). Writes replace the file in place and are not
/// atomic: a crash mid-write can leave a truncated file behind.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    /// Create a handle for the file at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the whole file, or `None` if it does not exist
    pub fn read(&self) -> CliResult<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(&self.path)?))
    }

    /// Write the file, creating the settings directory if needed
    pub fn write(&self, contents: &[u8]) -> CliResult<()> {
        if let Some(parent) = self.path.parent() {
            create_private_dir(parent)?;
        }

        std::fs::write(&self.path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    /// Delete the file if present
    pub fn delete(&self) -> CliResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

fn create_private_dir(dir: &Path) -> CliResult<()> {
    if dir.exists() {
        return Ok(());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)?;
    }

    #[cfg(not(unix))]
    std::fs::create_dir_all(dir)?;

    Ok(())
}
