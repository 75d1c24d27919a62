use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Message {
    // === STARTUP MESSAGES ===
    UpdaterStarted(String), // mode
    InvalidArguments(String),
    LogFileUnavailable(String), // error
    ConfigReadFailed(String),   // error

    // === STATE MESSAGES ===
    StateLoaded(String), // state
    StateFileMissing,
    StateFileCorrupt(String), // error
    StateStoreFailed(String), // error
    StateRecordedUpToDate,
    StateRecordedError,
    StateLeftUpToDate,

    // === LOCATOR MESSAGES ===
    FeedQueryFailed(String), // cause
    UpdateRequestedButNoneAvailable,
    DownloadFailed(String), // cause
    InstallerDownloaded(PathBuf),
    InstallerFound(PathBuf),
    InstallerMissing(PathBuf),
    UpdateStateInvalid(String), // state

    // === RELOCATION MESSAGES ===
    SelfCopied(PathBuf),
    SelfCopyFailed { destination: PathBuf, error: String },

    // === STAGE 1 MESSAGES ===
    MainAppFound,
    MainAppNotRunning,
    Stage2Launched(PathBuf),
    Stage2LaunchFailed { updater: PathBuf, error: String },
    MainAppNotRestarted,

    // === STAGE 2 MESSAGES ===
    InstallingMsi(PathBuf),
    MsiInstallFailed(u32), // error code
    RunningBootstrapper(PathBuf),
    BootstrapperNeedsElevation(PathBuf),
    BootstrapperTimedOut(PathBuf),
    BootstrapperSpawnFailed(String), // error
    BootstrapperExited(i32),         // exit code
    InstallerRemoveFailed { path: PathBuf, error: String },
    InstallCompleted,
    MainAppRelaunched(PathBuf),
    MainAppRelaunchFailed { path: PathBuf, error: String },

    // === PEER MESSAGES ===
    PeerCloseRequested(String), // identity
    PeerSignalFailed(String),   // error

    // === RELEASE FEED MESSAGES ===
    ReleaseChecked { current: String, latest: String },
    ReleaseAssetMissing(String), // version
    DownloadingInstaller(String), // url

    // === DISPATCH MESSAGES ===
    StageCompleted(String), // mode
    StageFailed { mode: String, error: String },
}
