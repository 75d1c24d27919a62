//! Display implementation for updater messages.
//!
//! All user-facing and log text is defined here, so the orchestrators only
//! deal in typed `Message` values.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === STARTUP MESSAGES ===
            Message::UpdaterStarted(mode) => format!("Updater started in {} mode", mode),
            Message::InvalidArguments(error) => format!("Invalid updater arguments: {}", error),
            Message::LogFileUnavailable(error) => format!("Update log file unavailable, logging to stderr only: {}", error),
            Message::ConfigReadFailed(error) => format!("Failed to read updater configuration, using defaults: {}", error),

            // === STATE MESSAGES ===
            Message::StateLoaded(state) => format!("Persisted update state: {}", state),
            Message::StateFileMissing => "No persisted update state found, using defaults".to_string(),
            Message::StateFileCorrupt(error) => format!("Persisted update state is unreadable, using defaults: {}", error),
            Message::StateStoreFailed(error) => format!("Failed to persist update state: {}", error),
            Message::StateRecordedUpToDate => "Update state recorded as up to date".to_string(),
            Message::StateRecordedError => "Update state recorded as error downloading".to_string(),
            Message::StateLeftUpToDate => "Install already committed, keeping update state as up to date".to_string(),

            // === LOCATOR MESSAGES ===
            Message::FeedQueryFailed(cause) => format!("Couldn't obtain release version info: {}", cause),
            Message::UpdateRequestedButNoneAvailable => "Invoked to install an update, but no update was available".to_string(),
            Message::DownloadFailed(cause) => format!("Couldn't download new installer: {}", cause),
            Message::InstallerDownloaded(path) => format!("Installer downloaded to {}", path.display()),
            Message::InstallerFound(path) => format!("Using previously downloaded installer {}", path.display()),
            Message::InstallerMissing(path) => format!("Couldn't find a downloaded installer {}", path.display()),
            Message::UpdateStateInvalid(state) => {
                format!("Invoked to install an update, but update state was invalid: {}", state)
            }

            // === RELOCATION MESSAGES ===
            Message::SelfCopied(path) => format!("Updater copied to {}", path.display()),
            Message::SelfCopyFailed { destination, error } => {
                format!("Failed to copy updater to {}: {}", destination.display(), error)
            }

            // === STAGE 1 MESSAGES ===
            Message::MainAppFound => "Main application is running, requested it to close".to_string(),
            Message::MainAppNotRunning => "Main application is not running".to_string(),
            Message::Stage2Launched(path) => format!("Stage 2 launched from {}", path.display()),
            Message::Stage2LaunchFailed { updater, error } => {
                format!("Failed to launch stage 2 from {}: {}", updater.display(), error)
            }
            Message::MainAppNotRestarted => "Main application was asked to close and will not be restarted".to_string(),

            // === STAGE 2 MESSAGES ===
            Message::InstallingMsi(path) => format!("Installing MSI package {}", path.display()),
            Message::MsiInstallFailed(code) => format!("MSI installation failed with error code {}", code),
            Message::RunningBootstrapper(path) => format!("Running bootstrapper {}", path.display()),
            Message::BootstrapperNeedsElevation(path) => {
                format!("Bootstrapper {} requires elevation, retrying through the shell", path.display())
            }
            Message::BootstrapperTimedOut(path) => format!("Bootstrapper {} timed out and was terminated", path.display()),
            Message::BootstrapperSpawnFailed(error) => format!("Failed to start bootstrapper: {}", error),
            Message::BootstrapperExited(code) => format!("Bootstrapper exited with code {}", code),
            Message::InstallerRemoveFailed { path, error } => {
                format!("Failed to remove installer {}: {}", path.display(), error)
            }
            Message::InstallCompleted => "Installation completed".to_string(),
            Message::MainAppRelaunched(path) => format!("Main application relaunched from {}", path.display()),
            Message::MainAppRelaunchFailed { path, error } => {
                format!("Failed to relaunch main application {}: {}", path.display(), error)
            }

            // === PEER MESSAGES ===
            Message::PeerCloseRequested(identity) => format!("Close requested for {}", identity),
            Message::PeerSignalFailed(error) => format!("Failed to signal main application: {}", error),

            // === RELEASE FEED MESSAGES ===
            Message::ReleaseChecked { current, latest } => {
                format!("Current version v{}, latest release v{}", current, latest)
            }
            Message::ReleaseAssetMissing(version) => format!("Release v{} has no installer for this platform", version),
            Message::DownloadingInstaller(url) => format!("Downloading installer from {}", url),

            // === DISPATCH MESSAGES ===
            Message::StageCompleted(mode) => format!("{} completed successfully", mode),
            Message::StageFailed { mode, error } => format!("{} failed: {}", mode, error),
        };

        write!(f, "{}", text)
    }
}
