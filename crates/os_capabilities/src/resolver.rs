//! Resolves the capabilities of the operating system. See [`CapabilityResolver`].

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::native::{
    NativeError, NativeQueries, OsVersionInfo, APPMODEL_ERROR_NO_PACKAGE,
    ERROR_INSUFFICIENT_BUFFER, ERROR_SUCCESS,
};
use crate::overrides::{CapabilityOverrides, ParseOverrideError};
use crate::{CapabilityError, Windows10Release, WindowsFamily};

/// The API contract whose major version identifies the Windows 10 release.
pub const UNIVERSAL_API_CONTRACT: &str = "Windows.Foundation.UniversalApiContract";

const QUERY_OS_VERSION: &str = "RtlGetVersion";
const QUERY_API_CONTRACT: &str = "ApiInformation.IsApiContractPresent";
const QUERY_PACKAGE_FULL_NAME: &str = "GetCurrentPackageFullName";
const QUERY_PROTECTION_POLICY: &str = "ProtectionPolicyManager.IsProtectionEnabled";
const QUERY_EDGE_HTML: &str = "EdgeHTML lookup";

/// Determines facts about the operating system through a set of [`NativeQueries`].
///
/// Every fact is queried at most once and cached for the lifetime of the resolver, with the
/// exception of [`CapabilityResolver::protection_api_usable`] which asks the OS every time.
/// Failed queries are not cached; a later call issues the query again.
///
/// The resolver for the current process is returned by [`crate::current`].
#[derive(Debug)]
pub struct CapabilityResolver<Q> {
    queries: Q,
    release_override: Option<Windows10Release>,
    os_version: OnceCell<OsVersionInfo>,
    release: OnceCell<Windows10Release>,
    package_full_name: OnceCell<Option<String>>,
    edge_html_present: OnceCell<bool>,
}

/// A snapshot of every fact determined by a [`CapabilityResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityFacts {
    /// The version reported by the operating system.
    pub os_version: OsVersionInfo,

    /// Whether the OS is a Windows NT platform.
    pub is_windows_nt: bool,

    /// Whether the OS is Windows 10 or newer.
    pub is_windows10: bool,

    /// The resolved Windows 10 release.
    pub release: Windows10Release,

    /// For every named release whether the OS is at least that release.
    pub at_least: BTreeMap<Windows10Release, bool>,

    /// Whether this is a workstation installation.
    pub is_workstation: bool,

    /// Whether the process has a package identity.
    pub has_package_identity: bool,

    /// The full name of the package the process runs in.
    pub package_full_name: Option<String>,

    /// Whether Windows Information Protection APIs can be used.
    pub protection_api_usable: bool,

    /// Whether the EdgeHTML rendering engine is installed.
    pub edge_html_present: bool,
}

impl<Q: NativeQueries> CapabilityResolver<Q> {
    /// Constructs a resolver that detects everything through `queries`.
    pub fn new(queries: Q) -> Self {
        Self {
            queries,
            release_override: None,
            os_version: OnceCell::new(),
            release: OnceCell::new(),
            package_full_name: OnceCell::new(),
            edge_html_present: OnceCell::new(),
        }
    }

    /// Constructs a resolver that applies the given overrides.
    pub fn with_overrides(
        queries: Q,
        overrides: &CapabilityOverrides,
    ) -> Result<Self, ParseOverrideError> {
        Ok(Self {
            release_override: overrides.release()?,
            ..Self::new(queries)
        })
    }

    /// Returns the version of the operating system.
    pub fn os_version(&self) -> Result<OsVersionInfo, CapabilityError> {
        self.os_version
            .get_or_try_init(|| {
                let version = self
                    .queries
                    .os_version()
                    .map_err(query_failed(QUERY_OS_VERSION))?;
                tracing::debug!(
                    "detected Windows {}.{}.{} ({:?})",
                    version.major,
                    version.minor,
                    version.build,
                    version.product_type
                );
                Ok(version)
            })
            .copied()
    }

    /// Returns true if the operating system is a Windows NT platform.
    pub fn is_windows_nt(&self) -> bool {
        self.queries.is_windows_nt()
    }

    /// Returns true if the operating system is at least the given family.
    pub fn is_since(&self, family: WindowsFamily) -> Result<bool, CapabilityError> {
        let version = self.os_version()?;
        Ok(family.is_satisfied_by(version.major, version.minor))
    }

    /// Same as [`CapabilityResolver::is_since`] but takes the name of the family.
    ///
    /// Returns [`CapabilityError::InvalidArgument`] if the name is not a known family.
    pub fn is_since_named(&self, family: &str) -> Result<bool, CapabilityError> {
        self.is_since(family.parse()?)
    }

    /// Returns true if the operating system is Windows 10 or newer.
    pub fn is_windows10(&self) -> Result<bool, CapabilityError> {
        Ok(self.is_windows_nt() && self.is_since(WindowsFamily::Win10)?)
    }

    /// Returns the Windows 10 release of the operating system.
    ///
    /// Returns [`Windows10Release::Unknown`] if the OS is older than Windows 10 or if none of the
    /// known universal API contract versions is present.
    pub fn release(&self) -> Result<Windows10Release, CapabilityError> {
        self.release
            .get_or_try_init(|| self.resolve_release())
            .copied()
    }

    fn resolve_release(&self) -> Result<Windows10Release, CapabilityError> {
        if !self.is_windows10()? {
            return Ok(Windows10Release::Unknown);
        }

        // Overrides only replace contract detection.
        if let Some(release) = self.release_override {
            tracing::debug!("using overridden Windows 10 release {release}");
            return Ok(release);
        }

        // Contract versions are cumulative so the newest present version identifies the release.
        let candidates = Windows10Release::iter_named()
            .rev()
            .filter_map(|release| release.contract_version().map(|version| (release, version)));
        for (release, version) in candidates {
            if self
                .queries
                .is_api_contract_present(UNIVERSAL_API_CONTRACT, version)
                .map_err(query_failed(QUERY_API_CONTRACT))?
            {
                tracing::debug!(
                    "{UNIVERSAL_API_CONTRACT} v{version} is present, release is {release}"
                );
                return Ok(release);
            }
        }

        tracing::debug!("no known version of {UNIVERSAL_API_CONTRACT} is present");
        Ok(Windows10Release::Unknown)
    }

    /// Returns true if the operating system is Windows 10 and at least the given release.
    ///
    /// Always false if the release could not be determined.
    pub fn is_at_least(&self, release: Windows10Release) -> Result<bool, CapabilityError> {
        if !self.is_windows10()? {
            return Ok(false);
        }
        let resolved = self.release()?;
        Ok(resolved.is_known() && resolved >= release)
    }

    /// Returns true if this is a server or domain controller installation.
    pub fn is_server(&self) -> Result<bool, CapabilityError> {
        Ok(self.os_version()?.product_type.is_server())
    }

    /// Returns true if this is a workstation installation.
    pub fn is_workstation(&self) -> Result<bool, CapabilityError> {
        Ok(!self.is_server()?)
    }

    /// Returns the full name of the package the current process runs in, or `None` if the process
    /// has no package identity.
    pub fn package_full_name(&self) -> Result<Option<&str>, CapabilityError> {
        Ok(self
            .package_full_name
            .get_or_try_init(|| self.resolve_package_full_name())?
            .as_deref())
    }

    /// Returns true if the process has a package identity and can call APIs that require one.
    pub fn has_package_identity(&self) -> Result<bool, CapabilityError> {
        Ok(self.package_full_name()?.is_some())
    }

    fn resolve_package_full_name(&self) -> Result<Option<String>, CapabilityError> {
        // Package identities only exist as of Windows 8.
        if !self.is_windows_nt() || !self.is_since(WindowsFamily::Win8)? {
            return Ok(None);
        }

        // Query the required length first.
        let mut length = 0;
        match self
            .queries
            .current_package_full_name(&mut length, None)
            .map_err(query_failed(QUERY_PACKAGE_FULL_NAME))?
        {
            ERROR_INSUFFICIENT_BUFFER | ERROR_SUCCESS | APPMODEL_ERROR_NO_PACKAGE => {}
            code => return Err(unexpected_status(QUERY_PACKAGE_FULL_NAME, code)),
        }

        let mut buffer = vec![0u16; length as usize];
        match self
            .queries
            .current_package_full_name(&mut length, Some(&mut buffer))
            .map_err(query_failed(QUERY_PACKAGE_FULL_NAME))?
        {
            APPMODEL_ERROR_NO_PACKAGE => {
                tracing::debug!("the process has no package identity");
                Ok(None)
            }
            ERROR_SUCCESS => {
                let end = buffer
                    .iter()
                    .position(|&c| c == 0)
                    .unwrap_or(buffer.len());
                let name = String::from_utf16_lossy(&buffer[..end]);
                tracing::debug!("the process runs in package '{name}'");
                Ok(Some(name))
            }
            code => Err(unexpected_status(QUERY_PACKAGE_FULL_NAME, code)),
        }
    }

    /// Returns true if the Windows Information Protection APIs are available and enabled.
    ///
    /// Whether protection is enabled is queried on every call.
    pub fn protection_api_usable(&self) -> Result<bool, CapabilityError> {
        if !self.is_at_least(Windows10Release::Anniversary)? {
            return Ok(false);
        }
        self.queries
            .is_protection_policy_enabled()
            .map_err(query_failed(QUERY_PROTECTION_POLICY))
    }

    /// Returns true if the EdgeHTML rendering engine is installed.
    pub fn edge_html_present(&self) -> Result<bool, CapabilityError> {
        self.edge_html_present
            .get_or_try_init(|| {
                self.queries
                    .edge_html_present()
                    .map_err(query_failed(QUERY_EDGE_HTML))
            })
            .copied()
    }

    /// Resolves every fact and returns them as a single snapshot.
    pub fn facts(&self) -> Result<CapabilityFacts, CapabilityError> {
        let at_least = Windows10Release::iter_named()
            .map(|release| Ok((release, self.is_at_least(release)?)))
            .collect::<Result<BTreeMap<_, _>, CapabilityError>>()?;
        let package_full_name = self.package_full_name()?.map(ToOwned::to_owned);

        Ok(CapabilityFacts {
            os_version: self.os_version()?,
            is_windows_nt: self.is_windows_nt(),
            is_windows10: self.is_windows10()?,
            release: self.release()?,
            at_least,
            is_workstation: self.is_workstation()?,
            has_package_identity: package_full_name.is_some(),
            package_full_name,
            protection_api_usable: self.protection_api_usable()?,
            edge_html_present: self.edge_html_present()?,
        })
    }
}

fn query_failed(query: &'static str) -> impl Fn(NativeError) -> CapabilityError {
    move |source| {
        tracing::warn!("{query} failed: {source}");
        CapabilityError::PlatformQueryFailed { query, source }
    }
}

fn unexpected_status(query: &'static str, code: u32) -> CapabilityError {
    query_failed(query)(NativeError::Status { code: code as i32 })
}
