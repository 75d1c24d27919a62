//! Process launching capability.
//!
//! Both stages start other processes: stage 1 hands off to the relocated
//! updater and stage 2 runs bootstrappers and relaunches the main application.

use crate::libs::messages::Message;
use crate::msg_warning;
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

/// Exit code reported when a process ends without one (killed by a signal,
/// or terminated after a timeout).
pub const NO_EXIT_CODE: i32 = -1;

/// `ERROR_ELEVATION_REQUIRED`: the executable's manifest asks for admin rights.
pub const ERROR_ELEVATION_REQUIRED: i32 = 740;

/// True when a spawn failed only because the program must run elevated.
pub fn requires_elevation(error: &io::Error) -> bool {
    error.raw_os_error() == Some(ERROR_ELEVATION_REQUIRED)
}

pub trait ProcessLauncher {
    /// Spawns `program` detached and returns once the OS confirms the process exists.
    fn launch(&self, program: &Path, args: &[OsString]) -> io::Result<()>;

    /// Spawns `program` and blocks until it exits, returning its exit code.
    fn run_and_wait(&self, program: &Path, args: &[OsString]) -> io::Result<i32>;
}

/// `ProcessLauncher` over `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct SystemLauncher {
    timeout: Option<Duration>,
}

impl SystemLauncher {
    /// `timeout` caps `run_and_wait`; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn command(program: &Path, args: &[OsString]) -> Command {
        let mut command = Command::new(program);
        command.args(args);
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x08000000;
            command.creation_flags(CREATE_NO_WINDOW);
        }
        command
    }

    fn wait_with_timeout(program: &Path, child: &mut Child, timeout: Duration) -> io::Result<i32> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status.code().unwrap_or(NO_EXIT_CODE));
            }
            if Instant::now() >= deadline {
                msg_warning!(Message::BootstrapperTimedOut(program.to_path_buf()));
                child.kill()?;
                child.wait()?;
                return Ok(NO_EXIT_CODE);
            }
            std::thread::sleep(Duration::from_millis(200));
        }
    }
}

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, program: &Path, args: &[OsString]) -> io::Result<()> {
        let mut command = Self::command(program, args);

        // New session, so signals aimed at the caller's session or process
        // group do not reach the child.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // SAFETY: setsid is async-signal-safe and touches no parent state.
            unsafe {
                command.pre_exec(|| {
                    nix::unistd::setsid().map_err(io::Error::from)?;
                    Ok(())
                });
            }
        }

        command.spawn()?;
        Ok(())
    }

    fn run_and_wait(&self, program: &Path, args: &[OsString]) -> io::Result<i32> {
        let mut child = match Self::command(program, args).spawn() {
            Ok(child) => child,
            #[cfg(windows)]
            Err(e) if requires_elevation(&e) => {
                crate::msg_info!(Message::BootstrapperNeedsElevation(program.to_path_buf()));
                return elevated::run_and_wait(program, args, self.timeout);
            }
            Err(e) => return Err(e),
        };
        match self.timeout {
            Some(timeout) => Self::wait_with_timeout(program, &mut child, timeout),
            None => Ok(child.wait()?.code().unwrap_or(NO_EXIT_CODE)),
        }
    }
}

/// `ShellExecuteExW` with the `runas` verb, which shows the UAC prompt that a
/// plain `CreateProcessW` cannot.
#[cfg(windows)]
mod elevated {
    use super::NO_EXIT_CODE;
    use std::ffi::{OsStr, OsString};
    use std::io;
    use std::mem;
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;
    use std::time::Duration;
    use winapi::shared::minwindef::DWORD;
    use winapi::shared::winerror::WAIT_TIMEOUT;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{GetExitCodeProcess, TerminateProcess};
    use winapi::um::shellapi::{ShellExecuteExW, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW};
    use winapi::um::synchapi::WaitForSingleObject;
    use winapi::um::winbase::INFINITE;
    use winapi::um::winuser::SW_HIDE;

    fn wide(value: &OsStr) -> Vec<u16> {
        value.encode_wide().chain(std::iter::once(0)).collect()
    }

    fn parameters(args: &[OsString]) -> OsString {
        let mut joined = OsString::new();
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                joined.push(" ");
            }
            if arg.to_string_lossy().contains(' ') {
                joined.push("\"");
                joined.push(arg);
                joined.push("\"");
            } else {
                joined.push(arg);
            }
        }
        joined
    }

    pub(super) fn run_and_wait(program: &Path, args: &[OsString], timeout: Option<Duration>) -> io::Result<i32> {
        let verb = wide(OsStr::new("runas"));
        let file = wide(program.as_os_str());
        let params = wide(&parameters(args));

        // SAFETY: SHELLEXECUTEINFOW is plain data; all-zero is its documented
        // empty value. The UTF-16 buffers outlive the call and the process
        // handle is closed exactly once.
        unsafe {
            let mut info: SHELLEXECUTEINFOW = mem::zeroed();
            info.cbSize = mem::size_of::<SHELLEXECUTEINFOW>() as DWORD;
            info.fMask = SEE_MASK_NOCLOSEPROCESS;
            info.lpVerb = verb.as_ptr();
            info.lpFile = file.as_ptr();
            info.lpParameters = params.as_ptr();
            info.nShow = SW_HIDE;

            if ShellExecuteExW(&mut info) == 0 {
                return Err(io::Error::last_os_error());
            }
            let process = info.hProcess;
            if process.is_null() {
                return Err(io::Error::new(io::ErrorKind::Other, "elevated launch returned no process handle"));
            }

            let wait_ms = timeout
                .map(|t| t.as_millis().min(u128::from(INFINITE - 1)) as DWORD)
                .unwrap_or(INFINITE);

            let result = if WaitForSingleObject(process, wait_ms) == WAIT_TIMEOUT {
                TerminateProcess(process, 1);
                Ok(NO_EXIT_CODE)
            } else {
                let mut code: DWORD = 0;
                if GetExitCodeProcess(process, &mut code) == 0 {
                    Err(io::Error::last_os_error())
                } else {
                    Ok(code as i32)
                }
            };
            CloseHandle(process);
            result
        }
    }
}
