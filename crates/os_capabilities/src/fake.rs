//! A scripted implementation of [`NativeQueries`] that records the queries it receives.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::native::{
    NativeError, NativeQueries, OsVersionInfo, ProductType, APPMODEL_ERROR_NO_PACKAGE,
    ERROR_INSUFFICIENT_BUFFER, ERROR_SUCCESS,
};
use crate::Windows10Release;

#[derive(Debug)]
pub struct FakeHost {
    is_windows_nt: bool,
    version: OsVersionInfo,
    highest_contract: u16,
    fail_version_query: bool,
    fail_contract_query: bool,
    package: Option<String>,
    package_status: Option<u32>,
    pub protection_enabled: AtomicBool,

    pub version_queries: AtomicUsize,
    pub contract_queries: Mutex<Vec<u16>>,
    pub package_queries: AtomicUsize,
    pub protection_queries: AtomicUsize,
}

impl FakeHost {
    /// A Windows host with the given version on which all universal API contract versions up to
    /// and including `highest_contract` are present.
    pub fn windows(major: u32, minor: u32, highest_contract: u16) -> Self {
        Self {
            is_windows_nt: true,
            version: OsVersionInfo {
                major,
                minor,
                build: 0,
                product_type: ProductType::Workstation,
            },
            highest_contract,
            fail_version_query: false,
            fail_contract_query: false,
            package: None,
            package_status: None,
            protection_enabled: AtomicBool::new(false),
            version_queries: AtomicUsize::new(0),
            contract_queries: Mutex::new(Vec::new()),
            package_queries: AtomicUsize::new(0),
            protection_queries: AtomicUsize::new(0),
        }
    }

    /// A Windows 10 host whose build matches the release that introduced `highest_contract`.
    pub fn windows10(highest_contract: u16) -> Self {
        let mut host = Self::windows(10, 0, highest_contract);
        host.version.build = Windows10Release::from_contract_version(highest_contract)
            .and_then(Windows10Release::build_number)
            .unwrap_or(10240);
        host
    }

    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.version.product_type = product_type;
        self
    }

    pub fn with_package(mut self, name: &str) -> Self {
        self.package = Some(name.to_string());
        self
    }

    pub fn with_package_status(mut self, status: u32) -> Self {
        self.package_status = Some(status);
        self
    }

    pub fn with_protection(self, enabled: bool) -> Self {
        self.protection_enabled.store(enabled, Ordering::SeqCst);
        self
    }

    pub fn failing_version_query(mut self) -> Self {
        self.fail_version_query = true;
        self
    }

    pub fn failing_contract_query(mut self) -> Self {
        self.fail_contract_query = true;
        self
    }

    pub fn not_nt(mut self) -> Self {
        self.is_windows_nt = false;
        self
    }
}

impl NativeQueries for FakeHost {
    fn is_windows_nt(&self) -> bool {
        self.is_windows_nt
    }

    fn os_version(&self) -> Result<OsVersionInfo, NativeError> {
        self.version_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_version_query {
            return Err(NativeError::Status { code: -1 });
        }
        Ok(self.version)
    }

    fn is_api_contract_present(
        &self,
        name: &str,
        major_version: u16,
    ) -> Result<bool, NativeError> {
        assert_eq!(name, "Windows.Foundation.UniversalApiContract");
        self.contract_queries.lock().unwrap().push(major_version);
        if self.fail_contract_query {
            return Err(NativeError::WinRt {
                code: -2_147_221_164,
                message: "Class not registered".to_string(),
            });
        }
        Ok(major_version <= self.highest_contract)
    }

    fn current_package_full_name(
        &self,
        length: &mut u32,
        buffer: Option<&mut [u16]>,
    ) -> Result<u32, NativeError> {
        self.package_queries.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.package_status {
            return Ok(status);
        }
        let Some(package) = &self.package else {
            *length = 0;
            return Ok(APPMODEL_ERROR_NO_PACKAGE);
        };

        let encoded = package
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect::<Vec<_>>();
        let required = encoded.len() as u32;
        match buffer {
            Some(buffer) if *length >= required && buffer.len() >= encoded.len() => {
                buffer[..encoded.len()].copy_from_slice(&encoded);
                *length = required;
                Ok(ERROR_SUCCESS)
            }
            _ => {
                *length = required;
                Ok(ERROR_INSUFFICIENT_BUFFER)
            }
        }
    }

    fn is_protection_policy_enabled(&self) -> Result<bool, NativeError> {
        self.protection_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.protection_enabled.load(Ordering::SeqCst))
    }

    fn edge_html_present(&self) -> Result<bool, NativeError> {
        Ok(true)
    }
}
