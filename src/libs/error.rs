//! Failure taxonomy for the update stages.

use crate::libs::update_state::State;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("release feed query failed: {0}")]
    FeedQuery(String),

    #[error("an update was requested but the release feed reports no newer version")]
    NoUpdateAvailable,

    #[error("installer download failed: {0}")]
    Download(String),

    #[error("expected installer is missing: {}", .0.display())]
    MissingInstaller(PathBuf),

    #[error("update state {0} does not allow installing an update")]
    InvalidState(State),

    #[error("failed to copy the updater to {}: {source}", .destination.display())]
    Relocation {
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch stage 2 from {}: {source}", .updater.display())]
    Stage2Launch {
        updater: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("MSI installation failed with error code {0}")]
    MsiInstall(u32),

    #[error("failed to start bootstrapper: {0}")]
    BootstrapperSpawn(#[source] io::Error),

    #[error("bootstrapper exited with code {0}")]
    BootstrapperExit(i32),

    #[error("failed to persist update state: {0}")]
    StatePersist(String),

    #[error("installed successfully but failed to relaunch {}: {source}", .executable.display())]
    Relaunch {
        executable: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl UpdateError {
    /// True when the failure happened after the new version was committed as
    /// installed. The persisted state must not be rolled back to an error.
    pub fn is_post_commit(&self) -> bool {
        matches!(self, UpdateError::Relaunch { .. })
    }
}
