//! Tracing subscriber setup for the updater process.
//!
//! Events go to `<data dir>/Logs/update-log.txt`. In debug mode they are also
//! mirrored to stderr. `RUST_LOG` controls the filter, defaulting to `info`
//! (`debug` in debug mode).

use crate::libs::data_storage::{DataStorage, LOGS_DIR};
use crate::libs::messages::macros::is_debug_mode;
use crate::libs::messages::Message;
use crate::msg_warning;
use anyhow::Result;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_NAME: &str = "update-log.txt";

pub fn log_file_path(storage: &DataStorage) -> Result<PathBuf> {
    Ok(storage.get_dir(LOGS_DIR)?.join(LOG_FILE_NAME))
}

fn open_log_file(storage: &DataStorage) -> Result<File> {
    let path = log_file_path(storage)?;
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Filter used when `RUST_LOG` is unset. Debug mode lowers it so
/// `msg_debug!` events pass.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init(storage: &DataStorage) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(is_debug_mode())));

    let (file, file_error) = match open_log_file(storage) {
        Ok(file) => (Some(file), None),
        Err(e) => (None, Some(e)),
    };

    let file_layer = file.map(|file| fmt::layer().with_ansi(false).with_target(false).with_writer(Mutex::new(file)));
    let stderr_layer = (is_debug_mode() || file_error.is_some()).then(|| fmt::layer().with_writer(std::io::stderr));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    if let Some(e) = file_error {
        msg_warning!(Message::LogFileUnavailable(format!("{:#}", e)));
    }
}
