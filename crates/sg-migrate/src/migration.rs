//! The capability interface implemented by every gated migration.

use crate::operation::Operation;
use sg_core::MigrationDescriptor;

/// A migration whose execution is gated on the recorded package version.
///
/// Implementors supply the static descriptor and the payload in each
/// direction. Whether the payload actually runs is decided by the gate.
pub trait GatedMigration {
    fn descriptor(&self) -> &MigrationDescriptor;

    /// Operations applying the change.
    fn up(&self) -> Vec<Operation>;

    /// Operations undoing the change.
    fn down(&self) -> Vec<Operation> {
        Vec::new()
    }
}

/// A gated migration made of literal SQL statements.
#[derive(Debug, Clone)]
pub struct SqlMigration {
    descriptor: MigrationDescriptor,
    up: Vec<Operation>,
    down: Vec<Operation>,
}

impl SqlMigration {
    pub fn new(descriptor: MigrationDescriptor) -> Self {
        Self {
            descriptor,
            up: Vec::new(),
            down: Vec::new(),
        }
    }

    /// Append a forward statement.
    pub fn with_up(mut self, sql: impl Into<String>) -> Self {
        self.up.push(Operation::sql(sql));
        self
    }

    /// Append a reverse statement.
    pub fn with_down(mut self, sql: impl Into<String>) -> Self {
        self.down.push(Operation::sql(sql));
        self
    }
}

impl GatedMigration for SqlMigration {
    fn descriptor(&self) -> &MigrationDescriptor {
        &self.descriptor
    }

    fn up(&self) -> Vec<Operation> {
        self.up.clone()
    }

    fn down(&self) -> Vec<Operation> {
        self.down.clone()
    }
}
