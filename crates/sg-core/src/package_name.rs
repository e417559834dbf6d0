//! Strongly-typed package identifier.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A non-empty identifier of an externally versioned package
/// (for example `acme/blog`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Create a package name, panicking if the value is empty.
    ///
    /// Prefer [`parse`](Self::parse) when handling untrusted input.
    pub fn new(value: impl Into<String>) -> Self {
        let s = value.into();
        assert!(!s.is_empty(), "PackageName must not be empty");
        Self(s)
    }

    /// Try to create a package name, returning `None` if the value is empty.
    pub fn try_new(value: impl Into<String>) -> Option<Self> {
        let s = value.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Parse a package name from untrusted input, trimming whitespace.
    pub fn parse(value: &str) -> CoreResult<Self> {
        Self::try_new(value.trim()).ok_or_else(|| CoreError::InvalidPackageName {
            reason: "package name must not be empty".to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PackageName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_display() {
        let name = PackageName::new("acme/blog");
        assert_eq!(name.to_string(), "acme/blog");
        assert_eq!(name, "acme/blog");
    }

    #[test]
    fn test_package_name_rejects_empty() {
        assert!(PackageName::try_new("").is_none());
        assert!(PackageName::parse("   ").is_err());
    }

    #[test]
    fn test_package_name_parse_trims() {
        let name = PackageName::parse("  acme/shop ").unwrap();
        assert_eq!(name.as_str(), "acme/shop");
    }

    #[test]
    fn test_package_name_borrow_lookup() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(PackageName::new("acme/blog"), 1);
        assert_eq!(map.get("acme/blog"), Some(&1));
    }

    #[test]
    fn test_package_name_deserialize_rejects_empty() {
        let err = serde_json::from_str::<PackageName>(r#""""#);
        assert!(err.is_err());
        let ok: PackageName = serde_json::from_str(r#""acme/blog""#).unwrap();
        assert_eq!(ok, "acme/blog");
    }
}
