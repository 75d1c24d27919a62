use anyhow::Result;
use std::env::consts::OS;
use std::env::var;
use std::fs;
use std::path::{Path, PathBuf};

pub const VENDOR_NAME: &str = "lacodda";
pub const APP_NAME: &str = "handoff";

/// Directory holding downloaded installers waiting to be run.
pub const PENDING_UPDATES_DIR: &str = "Updates";

/// Directory holding the updater log files.
pub const LOGS_DIR: &str = "Logs";

#[derive(Debug, Clone)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
            _ => var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share",
        };
        let base_path = Path::new(&base_path).join(VENDOR_NAME).join(APP_NAME);

        Self { base_path }
    }

    /// Roots the storage at an explicit directory instead of the platform default.
    pub fn at(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }

    /// Returns a subdirectory of the storage root, creating it when missing.
    pub fn get_dir(&self, dir_name: &str) -> Result<PathBuf> {
        let dir = self.base_path.join(dir_name);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    /// Location of downloaded installers. Not created here, callers that only
    /// read from it should not leave empty directories behind.
    pub fn pending_updates_path(&self) -> PathBuf {
        self.base_path.join(PENDING_UPDATES_DIR)
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}
