//! Stage 1: prepare the install and hand off to a relocated updater.
//!
//! Runs from the install directory. Nothing destructive happens here; the
//! only side effects are the updater copy in the temp directory and the close
//! request sent to the main application.

use crate::libs::error::UpdateError;
use crate::libs::locator::InstallerLocator;
use crate::libs::messages::Message;
use crate::libs::mode::{Mode, Stage2Args};
use crate::libs::peer::{PeerIdentity, PeerShutdown};
use crate::libs::process::ProcessLauncher;
use crate::libs::relocator::SelfRelocator;
use crate::{msg_error, msg_info, msg_warning};
use std::path::PathBuf;

pub struct Stage1<'a> {
    pub locator: InstallerLocator<'a>,
    pub relocator: SelfRelocator,
    pub peer: &'a dyn PeerShutdown,
    pub peer_identity: PeerIdentity,
    pub launcher: &'a dyn ProcessLauncher,
    /// Directory the main application is installed in.
    pub install_dir: PathBuf,
}

impl<'a> Stage1<'a> {
    /// Runs stage 1 and returns the arguments stage 2 was launched with.
    pub fn run(&self) -> Result<Stage2Args, UpdateError> {
        let installer = self.locator.obtain_installer()?;
        let updater_copy = self.relocator.relocate()?;

        let relaunch = self.peer.signal_shutdown(&self.peer_identity);
        if relaunch {
            msg_info!(Message::MainAppFound);
        } else {
            msg_info!(Message::MainAppNotRunning);
        }

        let args = Stage2Args {
            installer,
            install_dir: self.install_dir.clone(),
            relaunch,
        };

        if let Err(e) = self.launcher.launch(&updater_copy, &Mode::Stage2(args.clone()).to_args()) {
            msg_error!(Message::Stage2LaunchFailed {
                updater: updater_copy.clone(),
                error: e.to_string(),
            });
            if relaunch {
                msg_warning!(Message::MainAppNotRestarted);
            }
            return Err(UpdateError::Stage2Launch {
                updater: updater_copy,
                source: e,
            });
        }

        msg_info!(Message::Stage2Launched(updater_copy));
        Ok(args)
    }
}
