//! A gated migration paired with its visible lifecycle state.
//!
//! [`Lifecycle`] drives the gate's hooks for one migration and advances the
//! [`MigrationState`] machine, so hooks called out of order are rejected
//! instead of silently recording the wrong version.

use crate::decision::{Direction, ExecutionDecision};
use crate::error::{MigrateError, MigrateResult};
use crate::gate::MigrationGate;
use crate::migration::GatedMigration;
use crate::operation::Operation;
use crate::state::MigrationState;

pub struct Lifecycle<'g, 'm> {
    gate: &'g MigrationGate<'g>,
    migration: &'m dyn GatedMigration,
    state: MigrationState,
}

impl<'g, 'm> Lifecycle<'g, 'm> {
    /// A migration not yet run in this process.
    pub fn new(gate: &'g MigrationGate<'g>, migration: &'m dyn GatedMigration) -> Self {
        Self::with_state(gate, migration, MigrationState::Pending)
    }

    /// A migration known to have been applied earlier, about to be reversed.
    pub fn applied(gate: &'g MigrationGate<'g>, migration: &'m dyn GatedMigration) -> Self {
        Self::with_state(gate, migration, MigrationState::Applied { skipped: false })
    }

    fn with_state(
        gate: &'g MigrationGate<'g>,
        migration: &'m dyn GatedMigration,
        state: MigrationState,
    ) -> Self {
        Self {
            gate,
            migration,
            state,
        }
    }

    pub fn state(&self) -> MigrationState {
        self.state
    }

    pub fn migration(&self) -> &'m dyn GatedMigration {
        self.migration
    }

    /// Ask the gate for a decision. An irreversible reversal moves the
    /// migration to [`MigrationState::Blocked`] and returns the error.
    pub fn prepare(&mut self, direction: Direction) -> MigrateResult<ExecutionDecision> {
        if self.state.is_terminal() {
            return Err(MigrateError::InvalidTransition {
                state: self.state.to_string(),
                event: format!("prepare {direction}"),
            });
        }

        match self.gate.prepare(self.migration, direction) {
            Ok(decision) => {
                self.state = self.state.prepare(&decision)?;
                Ok(decision)
            }
            Err(err @ MigrateError::IrreversibleOperation { .. }) => {
                self.state = self.state.block()?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Operations for the current decision.
    pub fn operations(&self, decision: &ExecutionDecision) -> MigrateResult<Vec<Operation>> {
        if self.state != decision.state() {
            return Err(MigrateError::InvalidTransition {
                state: self.state.to_string(),
                event: "request operations".to_string(),
            });
        }
        Ok(self.gate.operations(self.migration, decision))
    }

    /// Report the payload outcome and record the version.
    pub fn finish(
        &mut self,
        decision: &ExecutionDecision,
        success: bool,
    ) -> MigrateResult<MigrationState> {
        if self.state != decision.state() {
            return Err(MigrateError::InvalidTransition {
                state: self.state.to_string(),
                event: "finish".to_string(),
            });
        }
        let next = self.state.finish(success)?;
        self.gate.finish(self.migration, decision, success)?;
        self.state = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::SqlMigration;
    use sg_core::{MigrationDescriptor, PackageName, Policy};
    use sg_store::{MemoryVersionStore, VersionStore};

    fn update(target: &str) -> SqlMigration {
        SqlMigration::new(MigrationDescriptor::update(PackageName::new("p"), target))
            .with_up("SELECT 1")
    }

    #[test]
    fn test_forward_lifecycle() {
        let store = MemoryVersionStore::new();
        let gate = MigrationGate::new(&store, Policy::Monotonic);
        let m = update("1.0");
        let mut lifecycle = Lifecycle::new(&gate, &m);

        assert_eq!(lifecycle.state(), MigrationState::Pending);
        let decision = lifecycle.prepare(Direction::Up).unwrap();
        assert_eq!(lifecycle.operations(&decision).unwrap().len(), 1);
        let state = lifecycle.finish(&decision, true).unwrap();
        assert_eq!(state, MigrationState::Applied { skipped: false });
        assert_eq!(
            store.get_version(&PackageName::new("p")).unwrap().as_deref(),
            Some("1.0")
        );
    }

    #[test]
    fn test_finish_twice_rejected() {
        let store = MemoryVersionStore::new();
        let gate = MigrationGate::new(&store, Policy::Monotonic);
        let m = update("1.0");
        let mut lifecycle = Lifecycle::new(&gate, &m);

        let decision = lifecycle.prepare(Direction::Up).unwrap();
        lifecycle.finish(&decision, true).unwrap();
        assert!(lifecycle.finish(&decision, true).is_err());
    }

    #[test]
    fn test_stale_decision_rejected() {
        let store = MemoryVersionStore::with_versions([("p", "0.5")]);
        let gate = MigrationGate::new(&store, Policy::Monotonic);
        let m = update("1.0");
        let mut lifecycle = Lifecycle::new(&gate, &m);

        let decision = lifecycle.prepare(Direction::Up).unwrap();
        lifecycle.finish(&decision, true).unwrap();
        assert!(lifecycle.operations(&decision).is_err());
    }

    #[test]
    fn test_irreversible_blocks() {
        let store = MemoryVersionStore::with_versions([("p", "2.0.0")]);
        let gate = MigrationGate::new(&store, Policy::Normalized);
        let m = update("2.0.0");
        let mut lifecycle = Lifecycle::applied(&gate, &m);

        let err = lifecycle.prepare(Direction::Down).unwrap_err();
        assert!(matches!(err, MigrateError::IrreversibleOperation { .. }));
        assert_eq!(lifecycle.state(), MigrationState::Blocked);

        let err = lifecycle.prepare(Direction::Down).unwrap_err();
        assert!(matches!(err, MigrateError::InvalidTransition { .. }));
        assert_eq!(
            store.get_version(&PackageName::new("p")).unwrap().as_deref(),
            Some("2.0.0")
        );
    }

    #[test]
    fn test_reverse_lifecycle() {
        let store = MemoryVersionStore::with_versions([("p", "1.0")]);
        let gate = MigrationGate::new(&store, Policy::Monotonic);
        let m = SqlMigration::new(
            MigrationDescriptor::update(PackageName::new("p"), "1.0").with_previous_version("0.9"),
        );
        let mut lifecycle = Lifecycle::applied(&gate, &m);

        let decision = lifecycle.prepare(Direction::Down).unwrap();
        assert_eq!(
            lifecycle.finish(&decision, true).unwrap(),
            MigrationState::Reversed
        );
        assert_eq!(
            store.get_version(&PackageName::new("p")).unwrap().as_deref(),
            Some("0.9")
        );
    }
}
