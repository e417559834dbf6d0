//! Static metadata declared by each gated migration.
//!
//! A [`MigrationDescriptor`] is an immutable value: the owning package, the
//! schema version the migration brings the package to, and the version to
//! record when the migration is reversed. Descriptors are handed to the gate
//! explicitly by the caller; there is no global registry.

use crate::error::{CoreError, CoreResult};
use crate::package_name::PackageName;
use crate::version::validate_version;
use std::sync::Arc;

/// The version a package returns to when a migration is reversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviousVersion {
    /// A literal version string.
    Literal(String),

    /// Another migration of the same package; its own target version is
    /// recorded on reversal. Resolved exactly one level deep.
    Migration(Arc<MigrationDescriptor>),
}

impl PreviousVersion {
    /// The version this pointer stands for. `None` when it refers to an
    /// install migration.
    pub fn resolve(&self) -> Option<&str> {
        match self {
            PreviousVersion::Literal(version) => Some(version),
            PreviousVersion::Migration(descriptor) => descriptor.target_version(),
        }
    }
}

/// Declared metadata of one migration unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationDescriptor {
    name: String,
    package: PackageName,
    target_version: Option<String>,
    previous: Option<PreviousVersion>,
}

impl MigrationDescriptor {
    /// An install migration: first-time setup with no target version.
    pub fn install(package: PackageName) -> Self {
        Self {
            name: format!("{package}@install"),
            package,
            target_version: None,
            previous: None,
        }
    }

    /// An update migration bringing `package` to `target_version`.
    pub fn update(package: PackageName, target_version: impl Into<String>) -> Self {
        let target_version = target_version.into();
        Self {
            name: format!("{package}@{target_version}"),
            package,
            target_version: Some(target_version),
            previous: None,
        }
    }

    /// Override the generated display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Record `version` when this migration is reversed.
    pub fn with_previous_version(mut self, version: impl Into<String>) -> Self {
        self.previous = Some(PreviousVersion::Literal(version.into()));
        self
    }

    /// Record the target of `migration` when this migration is reversed.
    pub fn with_previous_migration(mut self, migration: Arc<MigrationDescriptor>) -> Self {
        self.previous = Some(PreviousVersion::Migration(migration));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &PackageName {
        &self.package
    }

    pub fn target_version(&self) -> Option<&str> {
        self.target_version.as_deref()
    }

    pub fn previous(&self) -> Option<&PreviousVersion> {
        self.previous.as_ref()
    }

    /// True for the install migration (no target version).
    pub fn is_install(&self) -> bool {
        self.target_version.is_none()
    }

    /// The version to record after reversal, following at most one pointer.
    pub fn resolved_previous_version(&self) -> Option<&str> {
        self.previous.as_ref().and_then(PreviousVersion::resolve)
    }

    /// Check declared versions and that a previous-migration pointer stays
    /// within the same package.
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(target) = &self.target_version {
            validate_version(target).map_err(|e| self.invalid(e.to_string()))?;
        }

        match &self.previous {
            Some(PreviousVersion::Literal(version)) => {
                validate_version(version).map_err(|e| self.invalid(e.to_string()))?;
            }
            Some(PreviousVersion::Migration(other)) if other.package != self.package => {
                return Err(self.invalid(format!(
                    "previous migration '{}' belongs to package '{}'",
                    other.name, other.package
                )));
            }
            _ => {}
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> CoreError {
        CoreError::InvalidDescriptor {
            name: self.name.clone(),
            reason,
        }
    }
}

#[cfg(test)]
#[path = "descriptor_test.rs"]
mod tests;
