//! Stage 2: run the installer from outside the install directory.
//!
//! Inputs come from the process arguments stage 1 built; the persisted state
//! is only written, after a successful install.

use crate::libs::error::UpdateError;
use crate::libs::messages::Message;
use crate::libs::mode::{Stage2Args, REPORT_SUCCESS_FLAG};
use crate::libs::msi::{MsiService, ERROR_SUCCESS};
use crate::libs::process::ProcessLauncher;
use crate::libs::update_state::StateStore;
use crate::{msg_error, msg_info, msg_success, msg_warning};
use chrono::Utc;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Flags that make a bootstrapper run unattended without rebooting.
pub const BOOTSTRAPPER_ARGS: [&str; 2] = ["/passive", "/norestart"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallerKind {
    Msi,
    Bootstrapper,
}

impl InstallerKind {
    /// `.msi` in any letter case is an MSI package, everything else a bootstrapper.
    pub fn from_path(installer: &Path) -> Self {
        match installer.extension() {
            Some(ext) if ext.to_string_lossy().eq_ignore_ascii_case("msi") => InstallerKind::Msi,
            _ => InstallerKind::Bootstrapper,
        }
    }
}

pub struct Stage2<'a> {
    pub store: &'a dyn StateStore,
    pub msi: &'a dyn MsiService,
    pub launcher: &'a dyn ProcessLauncher,
    /// File name of the main application inside the install directory.
    pub main_executable: String,
}

impl<'a> Stage2<'a> {
    pub fn run(&self, args: &Stage2Args) -> Result<(), UpdateError> {
        self.install(&args.installer)?;
        msg_success!(Message::InstallCompleted);

        if let Err(e) = fs::remove_file(&args.installer) {
            msg_warning!(Message::InstallerRemoveFailed {
                path: args.installer.clone(),
                error: e.to_string(),
            });
        }

        let now = Utc::now();
        self.store.store(&mut |state| state.mark_up_to_date(now)).map_err(|e| {
            msg_error!(Message::StateStoreFailed(format!("{:#}", e)));
            UpdateError::StatePersist(format!("{:#}", e))
        })?;
        msg_info!(Message::StateRecordedUpToDate);

        if args.relaunch {
            self.relaunch_main_app(&args.install_dir)?;
        }

        Ok(())
    }

    fn install(&self, installer: &Path) -> Result<(), UpdateError> {
        match InstallerKind::from_path(installer) {
            InstallerKind::Msi => {
                msg_info!(Message::InstallingMsi(installer.to_path_buf()));
                let code = self.msi.install_product(installer);
                if code != ERROR_SUCCESS {
                    msg_error!(Message::MsiInstallFailed(code));
                    return Err(UpdateError::MsiInstall(code));
                }
            }
            InstallerKind::Bootstrapper => {
                msg_info!(Message::RunningBootstrapper(installer.to_path_buf()));
                let args: Vec<OsString> = BOOTSTRAPPER_ARGS.iter().map(OsString::from).collect();
                let code = self.launcher.run_and_wait(installer, &args).map_err(|e| {
                    msg_error!(Message::BootstrapperSpawnFailed(e.to_string()));
                    UpdateError::BootstrapperSpawn(e)
                })?;
                if code != 0 {
                    msg_error!(Message::BootstrapperExited(code));
                    return Err(UpdateError::BootstrapperExit(code));
                }
            }
        }
        Ok(())
    }

    fn relaunch_main_app(&self, install_dir: &Path) -> Result<(), UpdateError> {
        let executable: PathBuf = install_dir.join(&self.main_executable);
        match self.launcher.launch(&executable, &[OsString::from(REPORT_SUCCESS_FLAG)]) {
            Ok(()) => {
                msg_info!(Message::MainAppRelaunched(executable));
                Ok(())
            }
            Err(e) => {
                msg_error!(Message::MainAppRelaunchFailed {
                    path: executable.clone(),
                    error: e.to_string(),
                });
                Err(UpdateError::Relaunch { executable, source: e })
            }
        }
    }
}
