//! Configuration management for the updater.
//!
//! The updater is launched without user interaction, so every setting has a
//! default and the configuration file is optional. When present, the file
//! lives next to the persisted update state in the application data directory.
//!
//! ## File Location
//!
//! - **Windows**: `%LOCALAPPDATA%\lacodda\handoff\config.json`
//! - **macOS**: `~/Library/Application Support/lacodda/handoff/config.json`
//! - **Linux**: `~/.local/share/lacodda/handoff/config.json`
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use handoff::libs::config::Config;
//!
//! let config = Config::read()?;
//! println!("Main executable: {}", config.main_executable);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::peer::PeerIdentity;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

/// Configuration file name used for storing updater settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

#[cfg(windows)]
const DEFAULT_MAIN_EXECUTABLE: &str = "Suite.exe";
#[cfg(not(windows))]
const DEFAULT_MAIN_EXECUTABLE: &str = "suite";

#[cfg(windows)]
const DEFAULT_UPDATER_COPY_NAME: &str = "handoff-update.exe";
#[cfg(not(windows))]
const DEFAULT_UPDATER_COPY_NAME: &str = "handoff-update";

const DEFAULT_TRAY_WINDOW_CLASS: &str = "SuiteTrayIconWindow";

/// Updater settings.
///
/// Missing fields fall back to their defaults, so a partial file such as
/// `{ "installer_timeout_secs": 900 }` is valid.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Owner of the repository publishing releases.
    pub release_owner: String,

    /// Repository publishing releases.
    pub release_repo: String,

    /// File name of the main application executable inside the install directory.
    ///
    /// Stage 2 launches `<install dir>/<main_executable>` after a successful
    /// install when the application was running before the update.
    pub main_executable: String,

    /// Window class of the main application's tray window.
    ///
    /// Its presence is how stage 1 detects that the main application is running.
    pub tray_window_class: String,

    /// File name of the updater copy placed in the temp directory for stage 2.
    pub updater_copy_name: String,

    /// Upper bound, in seconds, on how long stage 2 waits for a bootstrapper.
    ///
    /// `None` waits for as long as the installer runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            release_owner: APP_METADATA_OWNER.to_string(),
            release_repo: APP_METADATA_REPO.to_string(),
            main_executable: DEFAULT_MAIN_EXECUTABLE.to_string(),
            tray_window_class: DEFAULT_TRAY_WINDOW_CLASS.to_string(),
            updater_copy_name: DEFAULT_UPDATER_COPY_NAME.to_string(),
            installer_timeout_secs: None,
        }
    }
}

impl Config {
    /// Reads configuration from the application data directory.
    ///
    /// A missing file yields the default configuration. A file that exists but
    /// cannot be parsed is an error.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Identity stage 1 uses to find and close the main application.
    pub fn peer_identity(&self) -> PeerIdentity {
        PeerIdentity {
            window_class: self.tray_window_class.clone(),
            process_name: self.main_executable.clone(),
        }
    }

    pub fn installer_timeout(&self) -> Option<Duration> {
        self.installer_timeout_secs.map(Duration::from_secs)
    }

    /// Version of this updater build, compared against release tags.
    ///
    /// The updater ships inside the suite installer and is built with the
    /// suite's version, so it stands in for the installed suite version.
    pub fn current_version() -> &'static str {
        APP_METADATA_VERSION
    }

    pub fn app_name() -> &'static str {
        APP_METADATA_NAME
    }
}
