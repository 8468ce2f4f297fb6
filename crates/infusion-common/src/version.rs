//! Version types for recipe file compatibility.

use serde::{Deserialize, Serialize};

/// Schema version using semantic versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u16,
    /// Minor version (backwards-compatible additions)
    pub minor: u16,
    /// Patch version (bug fixes)
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Current recipe pack file version.
    pub const RECIPE_FILE: Self = Self::new(1, 0, 0);

    /// Current item registry file version.
    pub const REGISTRY_FILE: Self = Self::new(1, 0, 0);

    /// Parses a `major.minor.patch` string. Missing components default to 0.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(major, minor, patch))
    }

    /// Checks if this version is compatible with another version.
    /// Compatible means same major version and this minor >= other minor.
    #[must_use]
    pub const fn is_compatible_with(&self, other: &Self) -> bool {
        self.major == other.major && self.minor >= other.minor
    }

    /// Checks if this version can read data from another version.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        assert_eq!(SchemaVersion::parse("1.2.3"), Some(SchemaVersion::new(1, 2, 3)));
    }

    #[test]
    fn test_parse_partial() {
        assert_eq!(SchemaVersion::parse("2"), Some(SchemaVersion::new(2, 0, 0)));
        assert_eq!(SchemaVersion::parse(" 1.4 "), Some(SchemaVersion::new(1, 4, 0)));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(SchemaVersion::parse(""), None);
        assert_eq!(SchemaVersion::parse("1.x"), None);
        assert_eq!(SchemaVersion::parse("1.2.3.4"), None);
    }

    #[test]
    fn test_can_read_same_major() {
        let current = SchemaVersion::RECIPE_FILE;
        assert!(current.can_read(&SchemaVersion::new(1, 9, 0)));
        assert!(!current.can_read(&SchemaVersion::new(2, 0, 0)));
    }
}
