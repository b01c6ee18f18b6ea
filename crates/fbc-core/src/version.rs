//! Semantic versions attached to catalog bundles.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};

/// A bundle's semantic version backed by semver.
///
/// Ordering follows semver precedence, with build metadata as a final
/// tie-breaker so that the order is total.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleVersion(Version);

impl BundleVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Dot-joined pre-release identifiers, empty for a release version.
    pub fn pre_release(&self) -> &str {
        self.0.pre.as_str()
    }

    /// Dot-joined build metadata identifiers, empty when absent.
    pub fn build(&self) -> &str {
        self.0.build.as_str()
    }

    pub fn is_pre_release(&self) -> bool {
        !self.0.pre.is_empty()
    }

    /// The underlying semver value, as consumed by range evaluation.
    pub fn as_semver(&self) -> &Version {
        &self.0
    }
}

impl fmt::Display for BundleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BundleVersion {
    type Err = semver::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s.trim()).map(Self)
    }
}

impl From<Version> for BundleVersion {
    fn from(v: Version) -> Self {
        Self(v)
    }
}
