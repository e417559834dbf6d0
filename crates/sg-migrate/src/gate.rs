//! The lifecycle hooks a runner calls around each gated migration.
//!
//! ```text
//! prepare(migration, direction) -> ExecutionDecision
//! operations(migration, &decision) -> Vec<Operation>   (empty when skipped)
//! finish(migration, &decision, success)                 (records the version)
//! ```

use crate::decision::{Direction, ExecutionDecision};
use crate::error::{MigrateError, MigrateResult};
use crate::migration::GatedMigration;
use crate::operation::Operation;
use crate::rules;
use sg_core::version::{normalize_version, validate_version};
use sg_core::{CoreError, InstalledVersionResolver, MigrationDescriptor, PackageName, Policy};
use sg_store::VersionStore;

/// Decides and records gated migrations against one version store.
pub struct MigrationGate<'a> {
    store: &'a dyn VersionStore,
    policy: Policy,
    resolver: Option<&'a dyn InstalledVersionResolver>,
}

impl<'a> MigrationGate<'a> {
    pub fn new(store: &'a dyn VersionStore, policy: Policy) -> Self {
        Self {
            store,
            policy,
            resolver: None,
        }
    }

    /// Source of installed package versions, required by install migrations
    /// under [`Policy::Normalized`].
    pub fn with_resolver(mut self, resolver: &'a dyn InstalledVersionResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Recorded version of `package` as the policy reads it.
    pub fn status(&self, package: &PackageName) -> MigrateResult<Option<String>> {
        let stored = self.store.get_version(package)?;
        Ok(rules::read_version(self.policy, stored))
    }

    /// Read the stored state and fix the decision for this run.
    ///
    /// Fails before any operation is produced when the descriptor is
    /// invalid or the store cannot be read. Under the normalized policy it
    /// also fails when an install migration about to run has no resolvable
    /// installed version, or when an update migration without a previous
    /// version is being reversed.
    pub fn prepare(
        &self,
        migration: &dyn GatedMigration,
        direction: Direction,
    ) -> MigrateResult<ExecutionDecision> {
        let descriptor = migration.descriptor();
        self.validate(descriptor)?;

        match direction {
            Direction::Up => {
                let current = self.status(descriptor.package())?;
                let verdict =
                    rules::forward_verdict(self.policy, descriptor, current.as_deref());

                if verdict.ambiguous {
                    log::warn!(
                        "Skipping '{}': {} has no recorded version and update migrations need an install migration to run first",
                        descriptor.name(),
                        descriptor.package()
                    );
                }
                log::debug!(
                    "'{}' ({}): current {}, target {} -> {}",
                    descriptor.name(),
                    self.policy,
                    current.as_deref().unwrap_or("<none>"),
                    descriptor.target_version().unwrap_or("<install>"),
                    if verdict.skip { "skip" } else { "run" }
                );

                let decision =
                    ExecutionDecision::forward(verdict.skip, verdict.ambiguous, current);
                if verdict.skip || !descriptor.is_install() {
                    return Ok(decision);
                }
                // The recorded version of an install comes from the package
                // manager; it must be known before the payload runs.
                let installed = self.installed_version(descriptor)?;
                Ok(decision.with_installed_version(installed))
            }
            Direction::Down => {
                if rules::is_irreversible(self.policy, descriptor) {
                    return Err(MigrateError::IrreversibleOperation {
                        migration: descriptor.name().to_string(),
                        target: descriptor
                            .target_version()
                            .unwrap_or_default()
                            .to_string(),
                    });
                }
                Ok(ExecutionDecision::reverse())
            }
        }
    }

    /// The payload for this run; empty when the decision is to skip.
    pub fn operations(
        &self,
        migration: &dyn GatedMigration,
        decision: &ExecutionDecision,
    ) -> Vec<Operation> {
        if decision.skip() {
            return Vec::new();
        }
        match decision.direction() {
            Direction::Up => migration.up(),
            Direction::Down => migration.down(),
        }
    }

    /// Record the outcome of a run.
    ///
    /// Nothing is written when the payload failed or was skipped. A write
    /// failure after a successful payload is reported as
    /// [`MigrateError::Persistence`]: the schema has changed but the stored
    /// version has not.
    pub fn finish(
        &self,
        migration: &dyn GatedMigration,
        decision: &ExecutionDecision,
        success: bool,
    ) -> MigrateResult<()> {
        let descriptor = migration.descriptor();

        if !success {
            log::warn!(
                "'{}' ({}) failed; version record left unchanged",
                descriptor.name(),
                decision.direction()
            );
            return Ok(());
        }
        if decision.skip() {
            return Ok(());
        }

        let version = match decision.direction() {
            Direction::Up => Some(forward_version(descriptor, decision)?),
            Direction::Down => descriptor.resolved_previous_version().map(str::to_string),
        };

        self.store
            .set_version(descriptor.package(), version.as_deref())
            .map_err(|source| {
                log::error!(
                    "'{}' ran but recording {} failed; schema and recorded version may disagree: {source}",
                    descriptor.name(),
                    version.as_deref().unwrap_or("<uninstalled>")
                );
                MigrateError::Persistence {
                    migration: descriptor.name().to_string(),
                    version: version.clone().unwrap_or_else(|| "<uninstalled>".to_string()),
                    source,
                }
            })?;

        match decision.direction() {
            Direction::Up => log::info!(
                "Applied '{}': {} now at {}",
                descriptor.name(),
                descriptor.package(),
                version.as_deref().unwrap_or_default()
            ),
            Direction::Down => log::info!(
                "Reverted '{}': {} now at {}",
                descriptor.name(),
                descriptor.package(),
                version.as_deref().unwrap_or("<uninstalled>")
            ),
        }
        Ok(())
    }

    /// Resolve and normalize the installed version of an install
    /// migration's package.
    fn installed_version(&self, descriptor: &MigrationDescriptor) -> MigrateResult<String> {
        let resolved = match self.resolver {
            Some(resolver) => resolver
                .resolve_installed_version(descriptor.package())
                .map(|installed| normalize_version(&installed))
                .and_then(|normalized| validate_version(&normalized).map(|_| normalized)),
            None => Err(CoreError::PackageNotInstalled {
                package: descriptor.package().to_string(),
            }),
        };

        resolved.map_err(|source| {
            log::error!(
                "Cannot run '{}': installed version of {} is unknown: {source}",
                descriptor.name(),
                descriptor.package()
            );
            MigrateError::Resolver {
                migration: descriptor.name().to_string(),
                source,
            }
        })
    }

    fn validate(&self, descriptor: &MigrationDescriptor) -> MigrateResult<()> {
        descriptor
            .validate()
            .map_err(MigrateError::InvalidDescriptor)?;

        if self.policy == Policy::Monotonic && descriptor.is_install() {
            return Err(MigrateError::InvalidDescriptor(
                CoreError::InvalidDescriptor {
                    name: descriptor.name().to_string(),
                    reason: "the monotonic policy requires a target version".to_string(),
                },
            ));
        }
        Ok(())
    }
}

/// The version recorded after a successful forward run.
fn forward_version(
    descriptor: &MigrationDescriptor,
    decision: &ExecutionDecision,
) -> MigrateResult<String> {
    if let Some(target) = descriptor.target_version() {
        return Ok(target.to_string());
    }
    decision
        .installed_version()
        .map(str::to_string)
        .ok_or_else(|| {
            log::error!(
                "'{}' ran without a resolved installed version; nothing recorded",
                descriptor.name()
            );
            MigrateError::Resolver {
                migration: descriptor.name().to_string(),
                source: CoreError::PackageNotInstalled {
                    package: descriptor.package().to_string(),
                },
            }
        })
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
