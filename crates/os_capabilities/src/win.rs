//! Native queries against the host operating system. See [`HostQueries`].

use crate::native::{NativeError, NativeQueries, OsVersionInfo};

/// The name of the library that contains the EdgeHTML rendering engine.
pub const EDGE_HTML_LIBRARY: &str = "edgehtml.dll";

/// Issues native queries against the operating system the process runs on.
///
/// On platforms other than Windows every query fails with [`NativeError::Unsupported`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HostQueries;

#[cfg(target_os = "windows")]
impl NativeQueries for HostQueries {
    fn is_windows_nt(&self) -> bool {
        true
    }

    fn os_version(&self) -> Result<OsVersionInfo, NativeError> {
        use crate::native::ProductType;
        use windows_sys::Wdk::System::SystemServices::RtlGetVersion;
        use windows_sys::Win32::System::SystemInformation::{OSVERSIONINFOEXW, OSVERSIONINFOW};

        // SAFETY: `OSVERSIONINFOEXW` is a plain C struct for which all zeroes is a valid value.
        let mut info: OSVERSIONINFOEXW = unsafe { std::mem::zeroed() };
        info.dwOSVersionInfoSize = std::mem::size_of::<OSVERSIONINFOEXW>() as u32;

        // `RtlGetVersion` is not subject to the compatibility shim that makes `GetVersionEx`
        // report 6.2 to processes that are not manifested for newer releases.
        // SAFETY: `info` is a valid `OSVERSIONINFOEXW` and its size field is set accordingly.
        let status = unsafe {
            RtlGetVersion(std::ptr::addr_of_mut!(info).cast::<OSVERSIONINFOW>())
        };
        if status < 0 {
            return Err(NativeError::Status { code: status });
        }

        Ok(OsVersionInfo {
            major: info.dwMajorVersion,
            minor: info.dwMinorVersion,
            build: info.dwBuildNumber,
            product_type: ProductType::from_raw(info.wProductType)?,
        })
    }

    fn is_api_contract_present(
        &self,
        name: &str,
        major_version: u16,
    ) -> Result<bool, NativeError> {
        use windows::core::HSTRING;
        use windows::Foundation::Metadata::ApiInformation;

        ApiInformation::IsApiContractPresentByMajor(&HSTRING::from(name), major_version)
            .map_err(winrt_error)
    }

    fn current_package_full_name(
        &self,
        length: &mut u32,
        buffer: Option<&mut [u16]>,
    ) -> Result<u32, NativeError> {
        use windows_sys::Win32::Storage::Packaging::Appx::GetCurrentPackageFullName;

        let buffer_ptr = match buffer {
            Some(buffer) => {
                *length = (*length).min(buffer.len() as u32);
                buffer.as_mut_ptr()
            }
            None => {
                *length = 0;
                std::ptr::null_mut()
            }
        };

        // SAFETY: `buffer_ptr` is either null with a length of zero or points to at least
        // `length` writable code units.
        Ok(unsafe { GetCurrentPackageFullName(length, buffer_ptr) })
    }

    fn is_protection_policy_enabled(&self) -> Result<bool, NativeError> {
        use windows::Security::EnterpriseData::ProtectionPolicyManager;

        ProtectionPolicyManager::IsProtectionEnabled().map_err(winrt_error)
    }

    fn edge_html_present(&self) -> Result<bool, NativeError> {
        let system_root = std::env::var_os("SystemRoot")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| std::path::PathBuf::from(r"C:\Windows"));
        system_root
            .join("System32")
            .join(EDGE_HTML_LIBRARY)
            .try_exists()
            .map_err(|err| NativeError::Status {
                code: err.raw_os_error().unwrap_or(-1),
            })
    }
}

#[cfg(target_os = "windows")]
fn winrt_error(err: windows::core::Error) -> NativeError {
    NativeError::WinRt {
        code: err.code().0,
        message: err.message(),
    }
}

#[cfg(not(target_os = "windows"))]
impl NativeQueries for HostQueries {
    fn is_windows_nt(&self) -> bool {
        false
    }

    fn os_version(&self) -> Result<OsVersionInfo, NativeError> {
        Err(NativeError::Unsupported)
    }

    fn is_api_contract_present(
        &self,
        _name: &str,
        _major_version: u16,
    ) -> Result<bool, NativeError> {
        Err(NativeError::Unsupported)
    }

    fn current_package_full_name(
        &self,
        _length: &mut u32,
        _buffer: Option<&mut [u16]>,
    ) -> Result<u32, NativeError> {
        Err(NativeError::Unsupported)
    }

    fn is_protection_policy_enabled(&self) -> Result<bool, NativeError> {
        Err(NativeError::Unsupported)
    }

    fn edge_html_present(&self) -> Result<bool, NativeError> {
        Err(NativeError::Unsupported)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[cfg(target_os = "windows")]
    pub fn doesnt_crash() {
        let version = HostQueries.os_version();
        println!("Windows {version:?}");
        assert!(version.is_ok());
    }

    #[test]
    #[cfg(not(target_os = "windows"))]
    pub fn unsupported_outside_windows() {
        assert!(!HostQueries.is_windows_nt());
        assert_eq!(HostQueries.os_version(), Err(NativeError::Unsupported));
        assert_eq!(
            HostQueries.is_api_contract_present("Windows.Foundation.UniversalApiContract", 1),
            Err(NativeError::Unsupported)
        );
    }
}
