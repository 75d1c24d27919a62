//! Convenient macros for updater messaging and logging.
//!
//! The updater usually runs without a console, so every message is emitted as
//! a `tracing` event and ends up in the update log file. In debug mode the
//! subscriber also mirrors events to stderr (see `libs::logging`).
//!
//! ## Macro Categories
//!
//! - **`msg_info!`**: Informational messages with ℹ️ prefix
//! - **`msg_success!`**: Success notifications with ✅ prefix
//! - **`msg_warning!`**: Warning messages with ⚠️ prefix
//! - **`msg_error!`**: Error messages with ❌ prefix
//! - **`msg_debug!`**: Debug-only messages with 🔍 prefix
//! - **`msg_error_anyhow!`** / **`msg_bail_anyhow!`**: build or return an `anyhow::Error`
//!
//! ## Usage Examples
//!
//! ```rust
//! use handoff::{msg_info, msg_error};
//! use handoff::libs::messages::Message;
//!
//! msg_info!(Message::MainAppNotRunning);
//! msg_error!(Message::MsiInstallFailed(1603));
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Checks if debug mode is enabled. The result is cached for the process lifetime.
///
/// Debug mode is on when either `HANDOFF_DEBUG` or `RUST_LOG` is set.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("HANDOFF_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        tracing::info!("ℹ️ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        tracing::info!("✅ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        tracing::warn!("⚠️ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        tracing::error!("❌ {}", $msg)
    };
}

/// Debug-only message, dropped unless debug mode is enabled.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Creates an `anyhow::Error` from a message with ❌ prefix.
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

/// Early return with an error created from a message.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
