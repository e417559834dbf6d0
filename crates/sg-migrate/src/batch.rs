//! Sequencing helpers for an externally ordered list of gated migrations.
//!
//! Ordering and discovery stay with the caller: these functions walk the
//! slice they are given, run each migration through its [`Lifecycle`], and
//! hand the produced operations to an [`OperationExecutor`].

use crate::decision::Direction;
use crate::error::{MigrateError, MigrateResult};
use crate::gate::MigrationGate;
use crate::lifecycle::Lifecycle;
use crate::migration::GatedMigration;
use crate::operation::Operation;
use sg_core::{CoreError, MigrationDescriptor, PackageName};

/// Executes change operations on behalf of the gate (the SQL engine).
pub trait OperationExecutor {
    /// Apply `operations` for `migration`. An `Err` carries the engine's
    /// failure message; nothing is recorded for the migration.
    fn execute(
        &mut self,
        migration: &MigrationDescriptor,
        operations: &[Operation],
    ) -> Result<(), String>;
}

/// A package shipping its own gated migrations.
pub trait MigrationProvider {
    fn package(&self) -> &PackageName;

    /// The package's migrations in the order they must be applied.
    fn migrations(&self) -> Vec<&dyn GatedMigration>;
}

/// What a batch did, by migration name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    pub reverted: Vec<String>,
}

/// Apply `migrations` in order, stopping at the first failure.
pub fn apply_all(
    gate: &MigrationGate<'_>,
    migrations: &[&dyn GatedMigration],
    executor: &mut dyn OperationExecutor,
) -> MigrateResult<BatchReport> {
    let mut report = BatchReport::default();

    for &migration in migrations {
        let descriptor = migration.descriptor();
        let mut lifecycle = Lifecycle::new(gate, migration);
        let decision = lifecycle.prepare(Direction::Up)?;
        let operations = lifecycle.operations(&decision)?;

        if !decision.skip() {
            if let Err(message) = executor.execute(descriptor, &operations) {
                lifecycle.finish(&decision, false)?;
                return Err(MigrateError::Execution {
                    migration: descriptor.name().to_string(),
                    message,
                });
            }
        }
        lifecycle.finish(&decision, true)?;

        if decision.skip() {
            report.skipped.push(descriptor.name().to_string());
        } else {
            report.applied.push(descriptor.name().to_string());
        }
    }
    Ok(report)
}

/// Reverse `migrations`, last first, stopping at the first failure.
///
/// An irreversible migration halts the chain before its operations run or
/// its version is touched; migrations already reversed stay reversed.
pub fn revert_all(
    gate: &MigrationGate<'_>,
    migrations: &[&dyn GatedMigration],
    executor: &mut dyn OperationExecutor,
) -> MigrateResult<BatchReport> {
    let mut report = BatchReport::default();

    for &migration in migrations.iter().rev() {
        let descriptor = migration.descriptor();
        let mut lifecycle = Lifecycle::applied(gate, migration);
        let decision = lifecycle.prepare(Direction::Down)?;
        let operations = lifecycle.operations(&decision)?;

        if let Err(message) = executor.execute(descriptor, &operations) {
            lifecycle.finish(&decision, false)?;
            return Err(MigrateError::Execution {
                migration: descriptor.name().to_string(),
                message,
            });
        }
        lifecycle.finish(&decision, true)?;
        report.reverted.push(descriptor.name().to_string());
    }
    Ok(report)
}

/// Apply every migration of `provider`, checking they all belong to it.
pub fn apply_provider(
    gate: &MigrationGate<'_>,
    provider: &dyn MigrationProvider,
    executor: &mut dyn OperationExecutor,
) -> MigrateResult<BatchReport> {
    let migrations = provider.migrations();

    if let Some(foreign) = migrations
        .iter()
        .map(|m| m.descriptor())
        .find(|d| d.package() != provider.package())
    {
        return Err(MigrateError::InvalidDescriptor(CoreError::InvalidDescriptor {
            name: foreign.name().to_string(),
            reason: format!(
                "provided by '{}' but belongs to '{}'",
                provider.package(),
                foreign.package()
            ),
        }));
    }

    log::debug!(
        "Applying {} migration(s) for {}",
        migrations.len(),
        provider.package()
    );
    apply_all(gate, &migrations, executor)
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
