//! The queries this crate issues against the operating system. See [`NativeQueries`].
//!
//! The resolution logic in [`crate::CapabilityResolver`] only talks to the OS through this trait
//! which makes it possible to drive it with scripted answers. The implementation for the host
//! lives in [`crate::HostQueries`].

use serde::Serialize;

/// `ERROR_SUCCESS`
pub const ERROR_SUCCESS: u32 = 0;

/// `ERROR_INSUFFICIENT_BUFFER`, returned when the supplied buffer is too small.
pub const ERROR_INSUFFICIENT_BUFFER: u32 = 122;

/// `APPMODEL_ERROR_NO_PACKAGE`, returned when the process has no package identity.
pub const APPMODEL_ERROR_NO_PACKAGE: u32 = 15700;

/// The product type reported by the operating system.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
    /// `VER_NT_WORKSTATION`
    Workstation,

    /// `VER_NT_DOMAIN_CONTROLLER`
    DomainController,

    /// `VER_NT_SERVER`
    Server,
}

impl ProductType {
    /// Converts the raw `wProductType` value of `OSVERSIONINFOEXW`.
    pub fn from_raw(value: u8) -> Result<Self, NativeError> {
        match value {
            1 => Ok(ProductType::Workstation),
            2 => Ok(ProductType::DomainController),
            3 => Ok(ProductType::Server),
            other => Err(NativeError::UnexpectedProductType(other)),
        }
    }

    /// Returns true for server and domain controller installations.
    pub const fn is_server(self) -> bool {
        matches!(self, ProductType::Server | ProductType::DomainController)
    }
}

/// Version information as reported by the operating system.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct OsVersionInfo {
    /// The major version, `10` for Windows 10 and 11.
    pub major: u32,

    /// The minor version.
    pub minor: u32,

    /// The build number.
    pub build: u32,

    /// Whether this is a workstation or a server installation.
    pub product_type: ProductType,
}

/// An error reported by a native query.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum NativeError {
    /// The query is not available on the current platform.
    #[error("the query is not supported on this platform")]
    Unsupported,

    /// The call returned a failure status (`NTSTATUS` or a Win32 error code).
    #[error("the call failed with status {code:#010x}")]
    Status {
        /// The raw status value.
        code: i32,
    },

    /// A Windows Runtime call failed.
    #[error("{message} ({code:#010x})")]
    WinRt {
        /// The `HRESULT` of the failure.
        code: i32,
        /// The message associated with the failure.
        message: String,
    },

    /// The OS reported a product type this crate does not know about.
    #[error("unexpected product type {0}")]
    UnexpectedProductType(u8),
}

/// The set of queries the resolver issues against the operating system.
///
/// Implementations should be thin wrappers around the platform APIs; all caching and
/// interpretation happens in [`crate::CapabilityResolver`].
pub trait NativeQueries {
    /// Returns true if the current platform is a Windows NT platform.
    fn is_windows_nt(&self) -> bool;

    /// Returns the true version of the operating system.
    ///
    /// Implementations must not use an API that is subject to the application compatibility shim
    /// (like `GetVersionEx`) because that reports Windows 8 to processes that are not manifested
    /// for newer releases.
    fn os_version(&self) -> Result<OsVersionInfo, NativeError>;

    /// Returns true if the API contract with the given name and major version is present.
    fn is_api_contract_present(&self, name: &str, major_version: u16)
        -> Result<bool, NativeError>;

    /// Calls `GetCurrentPackageFullName` and returns the raw Win32 error code of the call.
    ///
    /// `length` is the size of `buffer` in UTF-16 code units on input, and the required size
    /// (including the terminating NUL) on output. `buffer` is `None` to only query the length.
    fn current_package_full_name(
        &self,
        length: &mut u32,
        buffer: Option<&mut [u16]>,
    ) -> Result<u32, NativeError>;

    /// Returns true if Windows Information Protection is enabled for the current device.
    fn is_protection_policy_enabled(&self) -> Result<bool, NativeError>;

    /// Returns true if the EdgeHTML rendering engine is installed in the system directory.
    fn edge_html_present(&self) -> Result<bool, NativeError>;
}

impl<T: NativeQueries + ?Sized> NativeQueries for &T {
    fn is_windows_nt(&self) -> bool {
        (**self).is_windows_nt()
    }

    fn os_version(&self) -> Result<OsVersionInfo, NativeError> {
        (**self).os_version()
    }

    fn is_api_contract_present(
        &self,
        name: &str,
        major_version: u16,
    ) -> Result<bool, NativeError> {
        (**self).is_api_contract_present(name, major_version)
    }

    fn current_package_full_name(
        &self,
        length: &mut u32,
        buffer: Option<&mut [u16]>,
    ) -> Result<u32, NativeError> {
        (**self).current_package_full_name(length, buffer)
    }

    fn is_protection_policy_enabled(&self) -> Result<bool, NativeError> {
        (**self).is_protection_policy_enabled()
    }

    fn edge_html_present(&self) -> Result<bool, NativeError> {
        (**self).edge_html_present()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_product_type_from_raw() {
        assert_eq!(ProductType::from_raw(1), Ok(ProductType::Workstation));
        assert_eq!(ProductType::from_raw(2), Ok(ProductType::DomainController));
        assert_eq!(ProductType::from_raw(3), Ok(ProductType::Server));
        assert_eq!(
            ProductType::from_raw(0),
            Err(NativeError::UnexpectedProductType(0))
        );
    }

    #[test]
    fn test_is_server() {
        assert!(!ProductType::Workstation.is_server());
        assert!(ProductType::Server.is_server());
        assert!(ProductType::DomainController.is_server());
    }
}
