//! Sources of the currently installed package version.
//!
//! An install migration has no target version of its own. After it runs,
//! the version recorded for the package is whatever the package manager
//! reports as installed, normalized the same way stored versions are.

use crate::error::{CoreError, CoreResult};
use crate::package_name::PackageName;
use std::collections::BTreeMap;

/// Looks up the installed version of a package.
pub trait InstalledVersionResolver {
    /// Return the installed version of `package` as reported by the
    /// package manager (not yet normalized).
    fn resolve_installed_version(&self, package: &PackageName) -> CoreResult<String>;
}

impl<F> InstalledVersionResolver for F
where
    F: Fn(&PackageName) -> CoreResult<String>,
{
    fn resolve_installed_version(&self, package: &PackageName) -> CoreResult<String> {
        self(package)
    }
}

/// Resolver backed by a fixed map of package versions.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    versions: BTreeMap<PackageName, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, package: impl Into<String>, version: impl Into<String>) -> Self {
        self.insert(package, version);
        self
    }

    /// Register (or replace) the installed version of a package.
    pub fn insert(&mut self, package: impl Into<String>, version: impl Into<String>) {
        self.versions
            .insert(PackageName::new(package), version.into());
    }
}

impl InstalledVersionResolver for StaticResolver {
    fn resolve_installed_version(&self, package: &PackageName) -> CoreResult<String> {
        self.versions
            .get(package)
            .cloned()
            .ok_or_else(|| CoreError::PackageNotInstalled {
                package: package.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_resolver_lookup() {
        let resolver = StaticResolver::new().with("acme/blog", "1.2.0-dev");
        let version = resolver
            .resolve_installed_version(&PackageName::new("acme/blog"))
            .unwrap();
        assert_eq!(version, "1.2.0-dev");
    }

    #[test]
    fn test_static_resolver_missing_package() {
        let resolver = StaticResolver::new();
        let err = resolver
            .resolve_installed_version(&PackageName::new("acme/blog"))
            .unwrap_err();
        assert!(matches!(err, CoreError::PackageNotInstalled { .. }));
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |_: &PackageName| -> CoreResult<String> { Ok("3.1".to_string()) };
        let version = resolver
            .resolve_installed_version(&PackageName::new("acme/shop"))
            .unwrap();
        assert_eq!(version, "3.1");
    }
}
