//! The ladder of named Windows 10 releases. See [`Windows10Release`].

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use strum::{EnumIter, IntoEnumIterator};

use crate::CapabilityError;

/// Identifies a Windows 10 release.
///
/// Every variant carries a rank (its `YYMM` release id) that never changes. Releases are ordered
/// by rank, so `a >= b` reads as "`a` is at least as recent as `b`". [`Windows10Release::Unknown`]
/// has rank `0` and means the release could not be determined.
#[derive(EnumIter, Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum Windows10Release {
    /// The release could not be determined.
    Unknown,

    /// 10.0.10240
    Threshold1,

    /// 10.0.10586
    Threshold2,

    /// 10.0.14393 (Redstone 1)
    Anniversary,

    /// 10.0.15063 (Redstone 2)
    Creators,

    /// 10.0.16299 (Redstone 3)
    FallCreators,

    /// 10.0.17134 (Redstone 4)
    April2018,

    /// 10.0.17763 (Redstone 5)
    October2018,

    /// 10.0.18362 (19H1)
    May2019,

    /// 10.0.18363 (19H2)
    November2019,

    /// 10.0.19041 (20H1)
    May2020,

    /// 10.0.19042 (20H2)
    September2020,
}

impl Windows10Release {
    /// Returns the stable rank of this release.
    pub const fn rank(self) -> u16 {
        match self {
            Windows10Release::Unknown => 0,
            Windows10Release::Threshold1 => 1507,
            Windows10Release::Threshold2 => 1511,
            Windows10Release::Anniversary => 1607,
            Windows10Release::Creators => 1703,
            Windows10Release::FallCreators => 1709,
            Windows10Release::April2018 => 1803,
            Windows10Release::October2018 => 1809,
            Windows10Release::May2019 => 1903,
            Windows10Release::November2019 => 1909,
            Windows10Release::May2020 => 2004,
            Windows10Release::September2020 => 2009,
        }
    }

    /// Returns the major version of `Windows.Foundation.UniversalApiContract` that first shipped
    /// with this release.
    pub const fn contract_version(self) -> Option<u16> {
        match self {
            Windows10Release::Unknown => None,
            Windows10Release::Threshold1 => Some(1),
            Windows10Release::Threshold2 => Some(2),
            Windows10Release::Anniversary => Some(3),
            Windows10Release::Creators => Some(4),
            Windows10Release::FallCreators => Some(5),
            Windows10Release::April2018 => Some(6),
            Windows10Release::October2018 => Some(7),
            Windows10Release::May2019 => Some(8),
            Windows10Release::November2019 => Some(9),
            Windows10Release::May2020 => Some(10),
            Windows10Release::September2020 => Some(11),
        }
    }

    /// Returns the release that introduced the given universal API contract version.
    pub fn from_contract_version(version: u16) -> Option<Self> {
        Self::iter_named().find(|release| release.contract_version() == Some(version))
    }

    /// Returns the build number the release shipped with.
    pub const fn build_number(self) -> Option<u32> {
        match self {
            Windows10Release::Unknown => None,
            Windows10Release::Threshold1 => Some(10240),
            Windows10Release::Threshold2 => Some(10586),
            Windows10Release::Anniversary => Some(14393),
            Windows10Release::Creators => Some(15063),
            Windows10Release::FallCreators => Some(16299),
            Windows10Release::April2018 => Some(17134),
            Windows10Release::October2018 => Some(17763),
            Windows10Release::May2019 => Some(18362),
            Windows10Release::November2019 => Some(18363),
            Windows10Release::May2020 => Some(19041),
            Windows10Release::September2020 => Some(19042),
        }
    }

    /// Iterates over all named releases, oldest first. [`Windows10Release::Unknown`] is skipped.
    pub fn iter_named() -> impl DoubleEndedIterator<Item = Self> {
        Self::iter().filter(|release| *release != Windows10Release::Unknown)
    }

    /// Returns true if this release is known.
    pub const fn is_known(self) -> bool {
        !matches!(self, Windows10Release::Unknown)
    }

    /// Returns the name of the release.
    pub const fn as_str(self) -> &'static str {
        match self {
            Windows10Release::Unknown => "Unknown",
            Windows10Release::Threshold1 => "Threshold1",
            Windows10Release::Threshold2 => "Threshold2",
            Windows10Release::Anniversary => "Anniversary",
            Windows10Release::Creators => "Creators",
            Windows10Release::FallCreators => "FallCreators",
            Windows10Release::April2018 => "April2018",
            Windows10Release::October2018 => "October2018",
            Windows10Release::May2019 => "May2019",
            Windows10Release::November2019 => "November2019",
            Windows10Release::May2020 => "May2020",
            Windows10Release::September2020 => "September2020",
        }
    }
}

impl PartialOrd for Windows10Release {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Windows10Release {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl Display for Windows10Release {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Windows10Release {
    type Err = CapabilityError;

    /// Parses either the name of a release (`October2018`) or its rank (`1809`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(rank) = s.parse::<u16>() {
            return Self::iter()
                .find(|release| release.rank() == rank)
                .ok_or_else(|| CapabilityError::invalid_argument("release", s));
        }
        Self::iter()
            .find(|release| release.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CapabilityError::invalid_argument("release", s))
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_ranks_are_stable() {
        let ranks = Windows10Release::iter()
            .map(|release| (release.as_str(), release.rank()))
            .collect::<Vec<_>>();
        assert_eq!(
            ranks,
            vec![
                ("Unknown", 0),
                ("Threshold1", 1507),
                ("Threshold2", 1511),
                ("Anniversary", 1607),
                ("Creators", 1703),
                ("FallCreators", 1709),
                ("April2018", 1803),
                ("October2018", 1809),
                ("May2019", 1903),
                ("November2019", 1909),
                ("May2020", 2004),
                ("September2020", 2009),
            ]
        );
    }

    #[test]
    fn test_ordering_follows_rank() {
        for a in Windows10Release::iter() {
            for b in Windows10Release::iter() {
                assert_eq!(a.cmp(&b), a.rank().cmp(&b.rank()), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_unknown_is_below_every_named_release() {
        for release in Windows10Release::iter_named() {
            assert!(Windows10Release::Unknown < release);
        }
        assert_eq!(Windows10Release::iter_named().count(), 11);
    }

    #[test]
    fn test_contract_versions_round_trip() {
        for version in 1..=11 {
            let release = Windows10Release::from_contract_version(version).unwrap();
            assert_eq!(release.contract_version(), Some(version));
        }
        assert_eq!(Windows10Release::from_contract_version(0), None);
        assert_eq!(Windows10Release::from_contract_version(12), None);
    }

    #[rstest]
    #[case("October2018", Windows10Release::October2018)]
    #[case("october2018", Windows10Release::October2018)]
    #[case("1809", Windows10Release::October2018)]
    #[case(" 1607 ", Windows10Release::Anniversary)]
    #[case("0", Windows10Release::Unknown)]
    #[case("September2020", Windows10Release::September2020)]
    fn test_parse(#[case] input: &str, #[case] expected: Windows10Release) {
        assert_eq!(input.parse::<Windows10Release>().unwrap(), expected);
    }

    #[rstest]
    #[case("Redstone5")]
    #[case("1810")]
    #[case("")]
    fn test_parse_invalid(#[case] input: &str) {
        let err = input.parse::<Windows10Release>().unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArgument { .. }));
    }
}
