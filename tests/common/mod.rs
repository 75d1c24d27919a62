//! Fake collaborators shared by the integration tests.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use handoff::api::{DownloadInfo, ReleaseFeed, VersionCheck};
use handoff::libs::msi::MsiService;
use handoff::libs::peer::{PeerIdentity, PeerShutdown};
use handoff::libs::process::ProcessLauncher;
use handoff::libs::update_state::{FileStateStore, StateStore, UpdateState};
use std::cell::{Cell, RefCell};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Release feed answering from canned results.
pub struct FakeFeed {
    pub check: Result<VersionCheck, String>,
    pub download_fails: bool,
    pub latest_calls: Cell<usize>,
    pub download_calls: Cell<usize>,
}

impl FakeFeed {
    pub fn available() -> Self {
        Self::with(Ok(VersionCheck::Available(download_info())))
    }

    pub fn up_to_date() -> Self {
        Self::with(Ok(VersionCheck::UpToDate))
    }

    pub fn offline() -> Self {
        Self::with(Err("connection refused".to_string()))
    }

    fn with(check: Result<VersionCheck, String>) -> Self {
        Self {
            check,
            download_fails: false,
            latest_calls: Cell::new(0),
            download_calls: Cell::new(0),
        }
    }
}

pub fn download_info() -> DownloadInfo {
    DownloadInfo {
        version: "0.4.0".to_string(),
        url: "https://example.com/suite-setup-0.4.0-x64.exe".to_string(),
        file_name: "suite-setup-0.4.0-x64.exe".to_string(),
    }
}

impl ReleaseFeed for FakeFeed {
    fn latest(&self) -> Result<VersionCheck> {
        self.latest_calls.set(self.latest_calls.get() + 1);
        self.check.clone().map_err(|e| anyhow!(e))
    }

    fn download(&self, info: &DownloadInfo, dest_dir: &Path) -> Result<PathBuf> {
        self.download_calls.set(self.download_calls.get() + 1);
        if self.download_fails {
            return Err(anyhow!("download interrupted"));
        }
        fs::create_dir_all(dest_dir)?;
        let path = dest_dir.join(&info.file_name);
        fs::write(&path, b"installer")?;
        Ok(path)
    }
}

/// Process launcher recording every call.
pub struct FakeLauncher {
    /// Exit code returned by `run_and_wait`; `None` makes the spawn fail.
    pub exit_code: Option<i32>,
    pub launch_fails: bool,
    pub launched: RefCell<Vec<(PathBuf, Vec<OsString>)>>,
    pub waited: RefCell<Vec<(PathBuf, Vec<OsString>)>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self {
            exit_code: Some(0),
            launch_fails: false,
            launched: RefCell::new(Vec::new()),
            waited: RefCell::new(Vec::new()),
        }
    }

    pub fn exiting_with(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Self::new()
        }
    }

    pub fn failing_launch() -> Self {
        Self {
            launch_fails: true,
            ..Self::new()
        }
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, program: &Path, args: &[OsString]) -> io::Result<()> {
        self.launched.borrow_mut().push((program.to_path_buf(), args.to_vec()));
        if self.launch_fails {
            return Err(io::Error::new(io::ErrorKind::NotFound, "spawn failed"));
        }
        Ok(())
    }

    fn run_and_wait(&self, program: &Path, args: &[OsString]) -> io::Result<i32> {
        self.waited.borrow_mut().push((program.to_path_buf(), args.to_vec()));
        self.exit_code
            .ok_or_else(|| io::Error::new(io::ErrorKind::PermissionDenied, "spawn failed"))
    }
}

pub struct FakeMsi {
    pub code: u32,
    pub installed: RefCell<Vec<PathBuf>>,
}

impl FakeMsi {
    pub fn returning(code: u32) -> Self {
        Self {
            code,
            installed: RefCell::new(Vec::new()),
        }
    }
}

impl MsiService for FakeMsi {
    fn install_product(&self, package: &Path) -> u32 {
        self.installed.borrow_mut().push(package.to_path_buf());
        self.code
    }
}

pub struct FakePeer {
    pub running: bool,
    pub signals: Cell<usize>,
}

impl FakePeer {
    pub fn running(running: bool) -> Self {
        Self {
            running,
            signals: Cell::new(0),
        }
    }
}

impl PeerShutdown for FakePeer {
    fn signal_shutdown(&self, _peer: &PeerIdentity) -> bool {
        self.signals.set(self.signals.get() + 1);
        self.running
    }
}

/// File-backed store that counts writes.
pub struct CountingStore {
    pub inner: FileStateStore,
    pub writes: Cell<usize>,
}

impl CountingStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            inner: FileStateStore::at(path),
            writes: Cell::new(0),
        }
    }
}

impl StateStore for CountingStore {
    fn read(&self) -> UpdateState {
        self.inner.read()
    }

    fn store(&self, mutator: &mut dyn FnMut(&mut UpdateState)) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.inner.store(mutator)
    }
}

/// Temporary layout mirroring a real install: state file, pending updates
/// directory and install directory.
pub struct Workspace {
    pub dir: TempDir,
    pub store: CountingStore,
    pub pending: PathBuf,
    pub install_dir: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let pending = dir.path().join("Updates");
        let install_dir = dir.path().join("Suite");
        fs::create_dir_all(&pending).unwrap();
        fs::create_dir_all(&install_dir).unwrap();
        let store = CountingStore::new(dir.path().join("UpdateState.json"));
        Workspace {
            dir,
            store,
            pending,
            install_dir,
        }
    }

    /// Seeds the persisted state without counting it as a stage write.
    pub fn seed(&self, state: UpdateState) {
        self.store.inner.store(&mut |s| *s = state.clone()).unwrap();
    }

    /// Writes an installer into the pending updates directory.
    pub fn pending_installer(&self, name: &str) -> PathBuf {
        let path = self.pending.join(name);
        fs::write(&path, b"installer").unwrap();
        path
    }

    pub fn state(&self) -> UpdateState {
        self.store.inner.read()
    }
}
