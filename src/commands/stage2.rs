//! Stage 2 command: parses the handoff arguments and runs `Stage2`.

use crate::libs::config::Config;
use crate::libs::error::UpdateError;
use crate::libs::mode::{parse_relaunch_token, Stage2Args};
use crate::libs::msi::SystemMsi;
use crate::libs::process::SystemLauncher;
use crate::libs::stage2::Stage2;
use crate::libs::update_state::StateStore;
use clap::Args;
use std::path::PathBuf;

/// Arguments stage 1 passes to the relocated updater.
///
/// Values are taken verbatim, even when they start with `-`.
#[derive(Debug, Args)]
pub struct Stage2CliArgs {
    /// Installer package or bootstrapper to run
    #[arg(allow_hyphen_values = true)]
    pub installer: PathBuf,

    /// Directory the suite is installed in
    #[arg(allow_hyphen_values = true)]
    pub install_dir: PathBuf,

    /// `restart` to start the main application afterwards, anything else to leave it stopped
    #[arg(allow_hyphen_values = true)]
    pub relaunch_token: String,
}

impl From<Stage2CliArgs> for Stage2Args {
    fn from(args: Stage2CliArgs) -> Self {
        Stage2Args {
            installer: args.installer,
            install_dir: args.install_dir,
            relaunch: parse_relaunch_token(&args.relaunch_token),
        }
    }
}

pub fn cmd(store: &dyn StateStore, config: &Config, args: &Stage2Args) -> Result<(), UpdateError> {
    let launcher = SystemLauncher::new(config.installer_timeout());
    let stage = Stage2 {
        store,
        msi: &SystemMsi,
        launcher: &launcher,
        main_executable: config.main_executable.clone(),
    };
    stage.run(args)
}
