//! Platform installer service for MSI packages.

use std::path::Path;

/// Windows installer success code.
pub const ERROR_SUCCESS: u32 = 0;

/// Returned where no Windows installer service exists.
pub const ERROR_INSTALL_PLATFORM_UNSUPPORTED: u32 = 1633;

pub trait MsiService {
    /// Installs the package synchronously and returns the installer's result
    /// code. `ERROR_SUCCESS` means the install completed.
    fn install_product(&self, package: &Path) -> u32;
}

/// The operating system's installer service.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMsi;

#[cfg(windows)]
mod windows {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;
    use winapi::shared::minwindef::UINT;
    use winapi::um::winnt::LPCWSTR;

    #[link(name = "msi")]
    extern "system" {
        fn MsiInstallProductW(szPackagePath: LPCWSTR, szCommandLine: LPCWSTR) -> UINT;
    }

    pub(super) fn install_product(package: &OsStr) -> u32 {
        let wide: Vec<u16> = package.encode_wide().chain(std::iter::once(0)).collect();
        // SAFETY: `wide` is a NUL-terminated UTF-16 buffer that outlives the call.
        unsafe { MsiInstallProductW(wide.as_ptr(), ptr::null()) }
    }
}

impl MsiService for SystemMsi {
    #[cfg(windows)]
    fn install_product(&self, package: &Path) -> u32 {
        windows::install_product(package.as_os_str())
    }

    #[cfg(not(windows))]
    fn install_product(&self, _package: &Path) -> u32 {
        ERROR_INSTALL_PLATFORM_UNSUPPORTED
    }
}
