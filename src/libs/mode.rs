//! Invocation modes of the updater and their argument encoding.
//!
//! Stage 1 relaunches the updater in stage 2 mode, so the mode needs to be
//! rendered back into process arguments as well as parsed from them.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

pub const STAGE1_TAG: &str = "stage1";
pub const STAGE2_TAG: &str = "stage2";

/// Relaunch token meaning "start the main application after install".
pub const RESTART_TOKEN: &str = "restart";

/// Relaunch token meaning "leave the main application stopped".
pub const DONT_START_TOKEN: &str = "dont_start";

/// Flag passed to the relaunched main application so it reports the update.
pub const REPORT_SUCCESS_FLAG: &str = "--report-update-success";

/// Only the exact restart token enables a relaunch.
pub fn parse_relaunch_token(token: &str) -> bool {
    token == RESTART_TOKEN
}

pub fn relaunch_token(relaunch: bool) -> &'static str {
    if relaunch {
        RESTART_TOKEN
    } else {
        DONT_START_TOKEN
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage2Args {
    pub installer: PathBuf,
    pub install_dir: PathBuf,
    pub relaunch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Stage1,
    Stage2(Stage2Args),
}

impl Mode {
    /// Process arguments that reproduce this mode, mode tag first.
    pub fn to_args(&self) -> Vec<OsString> {
        match self {
            Mode::Stage1 => vec![STAGE1_TAG.into()],
            Mode::Stage2(args) => vec![
                STAGE2_TAG.into(),
                args.installer.clone().into_os_string(),
                args.install_dir.clone().into_os_string(),
                relaunch_token(args.relaunch).into(),
            ],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Stage1 => write!(f, "{}", STAGE1_TAG),
            Mode::Stage2(_) => write!(f, "{}", STAGE2_TAG),
        }
    }
}
