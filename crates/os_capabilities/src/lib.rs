#![deny(missing_docs)]

//! A library to detect the capabilities of the Windows version the current process runs on.
//!
//! Applications should branch on what the operating system can do rather than on hardcoded
//! version numbers. This library resolves the Windows 10 release of the host from the versions of
//! the universal API contract that are present, and derives a set of "is at least release X"
//! facts from it. It also reports whether the installation is a workstation, whether the process
//! runs with a package identity and whether Windows Information Protection can be used.
//!
//! To query the host use [`current`] which returns a memoized [`CapabilityResolver`]. Every fact
//! is determined at most once per process:
//!
//! ```no_run
//! use os_capabilities::Windows10Release;
//!
//! let host = os_capabilities::current()?;
//! if host.is_at_least(Windows10Release::October2018)? {
//!     // use APIs introduced in the October 2018 update
//! }
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! The resolver only talks to the operating system through the [`NativeQueries`] trait. Construct
//! a [`CapabilityResolver`] yourself to resolve facts from a different source.

mod family;
pub mod native;
mod overrides;
mod release;
mod resolver;
mod win;

#[cfg(test)]
mod fake;

use once_cell::sync::OnceCell;

pub use family::WindowsFamily;
pub use native::{NativeError, NativeQueries, OsVersionInfo, ProductType};
pub use overrides::{
    CapabilityOverrides, Override, ParseOverrideError, RELEASE_OVERRIDE_ENV_VAR,
};
pub use release::Windows10Release;
pub use resolver::{CapabilityFacts, CapabilityResolver, UNIVERSAL_API_CONTRACT};
pub use win::{HostQueries, EDGE_HTML_LIBRARY};

/// Returns the resolver for the current process.
///
/// The overrides are read from the environment (see [`CapabilityOverrides::from_env`]) the first
/// time this function succeeds. Returns an error if the environment contains an invalid override.
pub fn current() -> Result<&'static CapabilityResolver<HostQueries>, ParseOverrideError> {
    static HOST_RESOLVER: OnceCell<CapabilityResolver<HostQueries>> = OnceCell::new();
    HOST_RESOLVER.get_or_try_init(|| {
        CapabilityResolver::with_overrides(HostQueries, &CapabilityOverrides::from_env())
    })
}

/// An error that might be returned when resolving a capability.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CapabilityError {
    /// An identifier passed by the caller does not name a known family or release.
    #[error("unrecognized {kind} '{value}'")]
    InvalidArgument {
        /// What kind of identifier was expected.
        kind: &'static str,
        /// The value that was passed.
        value: String,
    },

    /// The operating system could not answer a query.
    #[error("failed to query {query}")]
    PlatformQueryFailed {
        /// The query that failed.
        query: &'static str,
        /// The reason the query failed.
        #[source]
        source: NativeError,
    },
}

impl CapabilityError {
    pub(crate) fn invalid_argument(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            kind,
            value: value.into(),
        }
    }
}
