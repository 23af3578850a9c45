//! Base Windows families and the minimum version that identifies them.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use strum::{EnumIter, IntoEnumIterator};

use crate::CapabilityError;

/// A family of Windows releases that share the same major and minor version.
#[allow(missing_docs)]
#[derive(EnumIter, Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum WindowsFamily {
    Win7,
    Server2008R2,
    Win8,
    Server2012,
    Win81,
    Server2012R2,
    Win10,
    Server2016,
    Server2019,
}

impl WindowsFamily {
    /// Returns the `(major, minor)` version the family starts at.
    pub const fn min_version(self) -> (u32, u32) {
        match self {
            WindowsFamily::Win7 | WindowsFamily::Server2008R2 => (6, 1),
            WindowsFamily::Win8 | WindowsFamily::Server2012 => (6, 2),
            WindowsFamily::Win81 | WindowsFamily::Server2012R2 => (6, 3),
            WindowsFamily::Win10 | WindowsFamily::Server2016 | WindowsFamily::Server2019 => {
                (10, 0)
            }
        }
    }

    /// Returns true if an OS reporting `major.minor` is this family or newer.
    pub const fn is_satisfied_by(self, major: u32, minor: u32) -> bool {
        let (min_major, min_minor) = self.min_version();
        if major > min_major {
            return true;
        }
        if major == min_major {
            return minor >= min_minor;
        }
        false
    }

    /// Returns the canonical name of the family.
    pub const fn as_str(self) -> &'static str {
        match self {
            WindowsFamily::Win7 => "Win7",
            WindowsFamily::Server2008R2 => "Server2008R2",
            WindowsFamily::Win8 => "Win8",
            WindowsFamily::Server2012 => "Server2012",
            WindowsFamily::Win81 => "Win81",
            WindowsFamily::Server2012R2 => "Server2012R2",
            WindowsFamily::Win10 => "Win10",
            WindowsFamily::Server2016 => "Server2016",
            WindowsFamily::Server2019 => "Server2019",
        }
    }
}

impl Display for WindowsFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for WindowsFamily {
    type Err = CapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CapabilityError::invalid_argument("operating system", s))
    }
}
