//! Entry dispatcher.
//!
//! Parses the invocation mode, runs the matching stage and turns the outcome
//! into the persisted state and the process exit code:
//!
//! - malformed arguments: exit 1, state untouched;
//! - stage success: exit 0;
//! - stage failure: state recorded as `errorDownloading`, exit 1;
//! - failure after the install was committed: state stays `upToDate`, exit 1.

pub mod stage1;
pub mod stage2;

use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::UpdateError;
use crate::libs::logging;
use crate::libs::messages::Message;
use crate::libs::mode::Mode;
use crate::libs::update_state::{FileStateStore, StateStore};
use crate::{msg_error, msg_error_anyhow, msg_info, msg_success, msg_warning};
use anyhow::Result;
use chrono::Utc;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Locate the installer, close the suite and hand off to stage 2")]
    Stage1,
    #[command(about = "Run the installer from a relocated updater copy")]
    Stage2(stage2::Stage2CliArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parses arguments into a `Mode`. Help and version requests come back as
    /// errors of kind `DisplayHelp` / `DisplayVersion`.
    pub fn try_mode_from<I, T>(args: I) -> Result<Mode, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Self::try_parse_from(args)?;
        Ok(match cli.command {
            Commands::Stage1 => Mode::Stage1,
            Commands::Stage2(args) => Mode::Stage2(args.into()),
        })
    }

    pub fn menu() -> ExitCode {
        Self::run_from(std::env::args_os())
    }

    /// `menu()` over explicit arguments, the program name first.
    pub fn run_from<I, T>(args: I) -> ExitCode
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let storage = DataStorage::new();
        logging::init(&storage);

        let mode = match Self::try_mode_from(args) {
            Ok(mode) => mode,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
            Err(e) => {
                msg_error!(Message::InvalidArguments(e.to_string().trim().to_string()));
                let _ = e.print();
                return ExitCode::FAILURE;
            }
        };
        msg_info!(Message::UpdaterStarted(mode.to_string()));

        let config = Config::read().unwrap_or_else(|e| {
            msg_warning!(Message::ConfigReadFailed(format!("{:#}", e)));
            Config::default()
        });

        let store = match FileStateStore::new() {
            Ok(store) => store,
            Err(e) => {
                msg_error!(Message::StateStoreFailed(format!("{:#}", e)));
                return ExitCode::FAILURE;
            }
        };

        let result = match &mode {
            Mode::Stage1 => stage1::cmd(&store, &config, &storage),
            Mode::Stage2(args) => stage2::cmd(&store, &config, args),
        };

        match finish(&store, &mode, result) {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        }
    }
}

/// Records the outcome of a stage in the persisted state.
pub fn finish(store: &dyn StateStore, mode: &Mode, result: Result<(), UpdateError>) -> Result<()> {
    let error = match result {
        Ok(()) => {
            msg_success!(Message::StageCompleted(mode.to_string()));
            return Ok(());
        }
        Err(error) => error,
    };

    msg_error!(Message::StageFailed {
        mode: mode.to_string(),
        error: error.to_string(),
    });

    if error.is_post_commit() {
        msg_warning!(Message::StateLeftUpToDate);
    } else {
        let now = Utc::now();
        match store.store(&mut |state| state.mark_error_downloading(now)) {
            Ok(()) => msg_info!(Message::StateRecordedError),
            Err(e) => msg_error!(Message::StateStoreFailed(format!("{:#}", e))),
        }
    }

    Err(msg_error_anyhow!(error))
}
