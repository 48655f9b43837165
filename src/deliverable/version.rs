//! Release version tokens
//!
//! Versions are opaque: no ordering is derived from their structure. The
//! only structure recognised is a trailing pre-release marker (`aN`, `bN`,
//! `rcN`, optionally written as `.0rcN` after a three-part version) so that
//! a final release can be matched with its candidates.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

static WELL_FORMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+)*((\.0)?(a|b|rc)\d+)?$").expect("version pattern is valid")
});

static PRERELEASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<final>.+?)(?P<marker>(a|b|rc)\d+)$").expect("pre-release pattern is valid")
});

static PBR_PRERELEASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<final>\d+\.\d+\.\d+)\.0(a|b|rc)\d+$").expect("pbr pattern is valid")
});

/// An opaque release version such as `2.0.0` or `2.0.0.0rc1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Wrap a version string
    #[must_use]
    pub fn new(version: &str) -> Self {
        Self(version.to_string())
    }

    /// The version as written
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the version matches the accepted dotted-numeric form
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        WELL_FORMED.is_match(&self.0)
    }

    /// Whether the version carries an alpha, beta or release-candidate marker
    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        PRERELEASE.is_match(&self.0)
    }

    /// The final version a pre-release leads to, or the version itself.
    ///
    /// `1.5.1.0rc1` and `1.5.1rc1` both map to `1.5.1`.
    #[must_use]
    pub fn final_version(&self) -> Self {
        if let Some(caps) = PBR_PRERELEASE.captures(&self.0) {
            return Self::new(&caps["final"]);
        }
        PRERELEASE
            .captures(&self.0)
            .map_or_else(|| self.clone(), |caps| Self::new(&caps["final"]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

struct VersionVisitor;

impl Visitor<'_> for VersionVisitor {
    type Value = Version;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a version string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Version, E> {
        Ok(Version::new(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Version, E> {
        Ok(Version(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Version, E> {
        Ok(Version(v.to_string()))
    }

    // A YAML float has already lost its spelling (`1.10` reads as 1.1).
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Version, E> {
        Err(E::custom(format!(
            "version {v} was read as a number; quote it to keep its exact spelling"
        )))
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(VersionVisitor)
    }
}
