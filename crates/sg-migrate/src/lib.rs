//! sg-migrate - Gated migrations for Schemagate
//!
//! A gated migration belongs to a package and targets one schema version of
//! that package. Right before it runs, the [`MigrationGate`] consults the
//! version store and decides whether the payload executes or is a no-op;
//! after it runs (or is reversed) the gate records the resulting version.
//!
//! The SQL engine, migration discovery and ordering stay with the caller:
//! this crate only produces the decision, the operations to run, and the
//! state to persist.

pub mod batch;
pub mod decision;
pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod migration;
pub mod operation;
pub(crate) mod rules;
pub mod state;

pub use batch::{apply_all, apply_provider, revert_all, BatchReport, MigrationProvider, OperationExecutor};
pub use decision::{Direction, ExecutionDecision};
pub use error::{MigrateError, MigrateResult};
pub use gate::MigrationGate;
pub use lifecycle::Lifecycle;
pub use migration::{GatedMigration, SqlMigration};
pub use operation::Operation;
pub use state::MigrationState;
