//! Resolves the installer stage 1 hands to stage 2.
//!
//! | Persisted state                          | Action                               |
//! |------------------------------------------|--------------------------------------|
//! | `readyToDownload`, `errorDownloading`    | query the feed, download the build   |
//! | `readyToInstall`                         | use the recorded file, must exist    |
//! | `upToDate`                               | fail, nothing to install             |
//!
//! The locator only reads the persisted state. Recording a failure is up to
//! the dispatcher.

use crate::api::{ReleaseFeed, VersionCheck};
use crate::libs::error::UpdateError;
use crate::libs::messages::Message;
use crate::libs::update_state::{State, StateStore};
use crate::{msg_error, msg_info};
use std::path::PathBuf;

pub struct InstallerLocator<'a> {
    store: &'a dyn StateStore,
    feed: &'a dyn ReleaseFeed,
    pending_dir: PathBuf,
}

impl<'a> InstallerLocator<'a> {
    /// `pending_dir` is where downloaded installers are kept.
    pub fn new(store: &'a dyn StateStore, feed: &'a dyn ReleaseFeed, pending_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            feed,
            pending_dir: pending_dir.into(),
        }
    }

    pub fn obtain_installer(&self) -> Result<PathBuf, UpdateError> {
        let state = self.store.read();
        msg_info!(Message::StateLoaded(state.state.to_string()));

        match state.state {
            State::ReadyToDownload | State::ErrorDownloading => self.download_installer(),
            State::ReadyToInstall => {
                let installer = match &state.downloaded_installer_filename {
                    Some(filename) => self.pending_dir.join(filename),
                    None => self.pending_dir.clone(),
                };
                if installer.is_file() {
                    msg_info!(Message::InstallerFound(installer.clone()));
                    Ok(installer)
                } else {
                    msg_error!(Message::InstallerMissing(installer.clone()));
                    Err(UpdateError::MissingInstaller(installer))
                }
            }
            State::UpToDate => {
                msg_error!(Message::UpdateStateInvalid(state.state.to_string()));
                Err(UpdateError::InvalidState(state.state))
            }
        }
    }

    fn download_installer(&self) -> Result<PathBuf, UpdateError> {
        let info = match self.feed.latest() {
            Ok(VersionCheck::Available(info)) => info,
            Ok(VersionCheck::UpToDate) => {
                msg_error!(Message::UpdateRequestedButNoneAvailable);
                return Err(UpdateError::NoUpdateAvailable);
            }
            Err(e) => {
                msg_error!(Message::FeedQueryFailed(format!("{:#}", e)));
                return Err(UpdateError::FeedQuery(format!("{:#}", e)));
            }
        };

        match self.feed.download(&info, &self.pending_dir) {
            Ok(installer) => {
                msg_info!(Message::InstallerDownloaded(installer.clone()));
                Ok(installer)
            }
            Err(e) => {
                msg_error!(Message::DownloadFailed(format!("{:#}", e)));
                Err(UpdateError::Download(format!("{:#}", e)))
            }
        }
    }
}
