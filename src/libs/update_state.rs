//! Persisted update state shared by both update stages.
//!
//! The record survives the process boundary between stage 1 and stage 2 and
//! tells the next updater run what work remains. It is owned by one stage at a
//! time: read once at stage start, written once at stage end.
//!
//! ## Storage
//!
//! The record is a JSON file (`UpdateState.json`) in the application data
//! directory:
//!
//! ```json
//! {
//!   "state": "readyToInstall",
//!   "downloadedInstallerFilename": "suite-setup-0.4.0-x64.exe",
//!   "githubUpdateLastCheckedDate": 1760400000
//! }
//! ```
//!
//! Writes go to a sibling `.tmp` file which is renamed over the record, so a
//! crash mid-write leaves either the old or the new record on disk.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use handoff::libs::update_state::{FileStateStore, StateStore};
//! use chrono::Utc;
//!
//! let store = FileStateStore::new()?;
//! store.store(&mut |state| state.mark_up_to_date(Utc::now()))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const UPDATE_STATE_FILE: &str = "UpdateState.json";

/// Where the update process currently stands.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum State {
    ReadyToDownload,
    ErrorDownloading,
    ReadyToInstall,
    #[default]
    UpToDate,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::ReadyToDownload => "readyToDownload",
            State::ErrorDownloading => "errorDownloading",
            State::ReadyToInstall => "readyToInstall",
            State::UpToDate => "upToDate",
        };
        write!(f, "{}", name)
    }
}

/// The durable update record.
///
/// `downloaded_installer_filename` is only meaningful while `state` is
/// `ReadyToInstall`. The `mark_*` transitions rewrite every field to keep
/// that pairing intact.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateState {
    pub state: State,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded_installer_filename: Option<String>,

    #[serde(with = "chrono::serde::ts_seconds_option", skip_serializing_if = "Option::is_none")]
    pub github_update_last_checked_date: Option<DateTime<Utc>>,
}

impl UpdateState {
    /// Resets the record to the failure state stamped with `now`.
    pub fn mark_error_downloading(&mut self, now: DateTime<Utc>) {
        *self = UpdateState {
            state: State::ErrorDownloading,
            downloaded_installer_filename: None,
            github_update_last_checked_date: Some(now),
        };
    }

    /// Resets the record to the installed state stamped with `now`.
    pub fn mark_up_to_date(&mut self, now: DateTime<Utc>) {
        *self = UpdateState {
            state: State::UpToDate,
            downloaded_installer_filename: None,
            github_update_last_checked_date: Some(now),
        };
    }

    /// Records an installer sitting in the pending updates directory.
    pub fn mark_ready_to_install(&mut self, filename: impl Into<String>) {
        self.state = State::ReadyToInstall;
        self.downloaded_installer_filename = Some(filename.into());
    }
}

/// Durable store for the update record.
pub trait StateStore {
    /// Returns the current record, or the default record when none can be read.
    fn read(&self) -> UpdateState;

    /// Read-mutate-write. The mutated record is persisted before returning.
    fn store(&self, mutator: &mut dyn FnMut(&mut UpdateState)) -> Result<()>;
}

/// `StateStore` backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Store at the default location in the application data directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: DataStorage::new().get_path(UPDATE_STATE_FILE)?,
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for FileStateStore {
    fn read(&self) -> UpdateState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => {
                msg_debug!(Message::StateFileMissing);
                return UpdateState::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                msg_warning!(Message::StateFileCorrupt(e.to_string()));
                UpdateState::default()
            }
        }
    }

    fn store(&self, mutator: &mut dyn FnMut(&mut UpdateState)) -> Result<()> {
        let mut state = self.read();
        mutator(&mut state);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, serde_json::to_vec_pretty(&state)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
