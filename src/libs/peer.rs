//! Detecting the main application and asking it to shut down.
//!
//! Stage 1 needs the main application out of the way before the installer
//! replaces its files. The request is fire-and-forget: nothing here waits for
//! the peer to actually exit.

use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use std::fmt;

/// How the main application is recognised on each platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerIdentity {
    /// Window class of the tray window (Windows).
    pub window_class: String,
    /// Executable name of the running process (Unix).
    pub process_name: String,
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(windows)]
        return write!(f, "window class {}", self.window_class);
        #[cfg(not(windows))]
        return write!(f, "process {}", self.process_name);
    }
}

pub trait PeerShutdown {
    /// Requests the peer to close without waiting for it.
    /// Returns whether the peer was found running.
    fn signal_shutdown(&self, peer: &PeerIdentity) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPeerShutdown;

#[cfg(windows)]
mod windows {
    use super::*;
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;
    use winapi::um::winuser::{FindWindowW, PostMessageW, WM_CLOSE};

    pub(super) fn signal_shutdown(peer: &PeerIdentity) -> bool {
        let class: Vec<u16> = OsStr::new(&peer.window_class).encode_wide().chain(std::iter::once(0)).collect();

        // SAFETY: `class` is NUL-terminated and outlives both calls; the window
        // handle is only passed back to the window manager.
        unsafe {
            let window = FindWindowW(class.as_ptr(), ptr::null());
            if window.is_null() {
                return false;
            }
            if PostMessageW(window, WM_CLOSE, 0, 0) == 0 {
                msg_warning!(Message::PeerSignalFailed(std::io::Error::last_os_error().to_string()));
            }
        }
        msg_debug!(Message::PeerCloseRequested(peer.to_string()));
        true
    }
}

#[cfg(unix)]
mod unix {
    use super::*;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use std::ffi::OsStr;
    use sysinfo::{ProcessesToUpdate, System};

    pub(super) fn signal_shutdown(peer: &PeerIdentity) -> bool {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let own_pid = std::process::id();
        let mut found = false;
        for process in system.processes_by_exact_name(OsStr::new(&peer.process_name)) {
            let pid = process.pid().as_u32();
            if pid == own_pid {
                continue;
            }
            found = true;
            if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                msg_warning!(Message::PeerSignalFailed(e.to_string()));
            }
        }

        if found {
            msg_debug!(Message::PeerCloseRequested(peer.to_string()));
        }
        found
    }
}

impl PeerShutdown for SystemPeerShutdown {
    fn signal_shutdown(&self, peer: &PeerIdentity) -> bool {
        #[cfg(windows)]
        return windows::signal_shutdown(peer);
        #[cfg(unix)]
        return unix::signal_shutdown(peer);
        #[cfg(not(any(unix, windows)))]
        {
            let _ = peer;
            false
        }
    }
}
