use crate::error::{HookError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Semantic version as defined by SemVer 2.0.0.
///
/// Wraps [`semver::Version`] but compares without build metadata: two versions
/// that differ only in `+build` are equal, and ordering is major, minor,
/// patch, then prerelease precedence (a release ranks above its prereleases).
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    inner: semver::Version,
}

impl SemanticVersion {
    /// Create a release version with no prerelease or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            inner: semver::Version::new(major, minor, patch),
        }
    }

    /// Parse a strict SemVer string (e.g., "1.2.3-rc.1+build.5")
    pub fn parse(text: &str) -> Result<Self> {
        let inner = semver::Version::parse(text).map_err(|e| {
            HookError::version(format!("'{}' is not a semantic version: {}", text, e))
        })?;
        Ok(SemanticVersion { inner })
    }

    /// Parse, returning `None` instead of an error for non-SemVer input
    pub fn try_parse(text: &str) -> Option<Self> {
        semver::Version::parse(text)
            .ok()
            .map(|inner| SemanticVersion { inner })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Prerelease identifiers, `None` for a release
    pub fn prerelease(&self) -> Option<&str> {
        if self.inner.pre.is_empty() {
            None
        } else {
            Some(self.inner.pre.as_str())
        }
    }

    /// Build metadata, `None` when absent
    pub fn build(&self) -> Option<&str> {
        if self.inner.build.is_empty() {
            None
        } else {
            Some(self.inner.build.as_str())
        }
    }

    fn precedence(&self) -> (u64, u64, u64, &semver::Prerelease) {
        (
            self.inner.major,
            self.inner.minor,
            self.inner.patch,
            &self.inner.pre,
        )
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.precedence() == other.precedence()
    }
}

impl Eq for SemanticVersion {}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // semver::Prerelease already ranks the empty prerelease highest
        self.precedence().cmp(&other.precedence())
    }
}

impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.major.hash(state);
        self.inner.minor.hash(state);
        self.inner.patch.hash(state);
        self.inner.pre.as_str().hash(state);
    }
}

impl FromStr for SemanticVersion {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}
