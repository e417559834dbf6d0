//! End-to-end tests: gated migrations executed against DuckDB, with the
//! version table living in the same database as the migrated schema.

use duckdb::Connection;
use sg_core::{MigrationDescriptor, PackageName, Policy, StaticResolver, StoreConfig};
use sg_migrate::{
    apply_all, revert_all, Direction, GatedMigration, MigrateError, MigrationGate, Operation,
    OperationExecutor, SqlMigration,
};
use sg_store::{DuckDbVersionStore, VersionStore};
use std::sync::Arc;

// ── Helpers ────────────────────────────────────────────────────────────

struct DuckDbExecutor<'c> {
    conn: &'c Connection,
}

impl OperationExecutor for DuckDbExecutor<'_> {
    fn execute(
        &mut self,
        _migration: &MigrationDescriptor,
        operations: &[Operation],
    ) -> Result<(), String> {
        for op in operations {
            self.conn
                .execute_batch(op.as_sql())
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

fn table_exists(conn: &Connection, name: &str) -> bool {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
            duckdb::params![name],
            |row| row.get(0),
        )
        .unwrap();
    count > 0
}

fn shop() -> PackageName {
    PackageName::new("acme/shop")
}

fn shop_migrations() -> Vec<SqlMigration> {
    let v1 = Arc::new(MigrationDescriptor::update(shop(), "1.0.0"));
    vec![
        SqlMigration::new((*v1).clone())
            .with_up("CREATE TABLE shop_orders (id INTEGER)")
            .with_down("DROP TABLE shop_orders"),
        SqlMigration::new(MigrationDescriptor::update(shop(), "1.1.0").with_previous_migration(v1))
            .with_up("CREATE TABLE shop_refunds (id INTEGER)")
            .with_down("DROP TABLE shop_refunds"),
    ]
}

fn refs(migrations: &[SqlMigration]) -> Vec<&dyn GatedMigration> {
    migrations.iter().map(|m| m as &dyn GatedMigration).collect()
}

// ── Tests ──────────────────────────────────────────────────────────────

#[test]
fn monotonic_apply_and_revert() {
    let store = DuckDbVersionStore::open_memory().unwrap();
    let gate = MigrationGate::new(&store, Policy::Monotonic);
    let migrations = shop_migrations();
    let mut executor = DuckDbExecutor { conn: store.conn() };

    let report = apply_all(&gate, &refs(&migrations), &mut executor).unwrap();
    assert_eq!(report.applied.len(), 2);
    assert!(table_exists(store.conn(), "shop_orders"));
    assert!(table_exists(store.conn(), "shop_refunds"));
    assert_eq!(store.get_version(&shop()).unwrap().as_deref(), Some("1.1.0"));

    let report = revert_all(&gate, &refs(&migrations), &mut executor).unwrap();
    assert_eq!(report.reverted.len(), 2);
    assert!(!table_exists(store.conn(), "shop_orders"));
    assert_eq!(store.get_version(&shop()).unwrap(), None);
}

#[test]
fn repeated_runs_across_reopen_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    let migrations = shop_migrations();

    {
        let store = DuckDbVersionStore::open(&path).unwrap();
        let gate = MigrationGate::new(&store, Policy::Monotonic);
        let mut executor = DuckDbExecutor { conn: store.conn() };
        apply_all(&gate, &refs(&migrations[..1]), &mut executor).unwrap();
    }

    // A later release ships the second migration; the first must not rerun
    // (it would fail with "table already exists").
    let store = DuckDbVersionStore::open(&path).unwrap();
    let gate = MigrationGate::new(&store, Policy::Monotonic);
    let mut executor = DuckDbExecutor { conn: store.conn() };
    let report = apply_all(&gate, &refs(&migrations), &mut executor).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.applied.len(), 1);
    assert_eq!(store.get_version(&shop()).unwrap().as_deref(), Some("1.1.0"));
}

#[test]
fn failing_payload_leaves_version_untouched() {
    let store = DuckDbVersionStore::open_memory().unwrap();
    let gate = MigrationGate::new(&store, Policy::Monotonic);
    let broken = SqlMigration::new(MigrationDescriptor::update(shop(), "2.0.0"))
        .with_up("CREATE TABLE (");
    let mut executor = DuckDbExecutor { conn: store.conn() };

    let err = apply_all(&gate, &[&broken as &dyn GatedMigration], &mut executor).unwrap_err();
    assert!(matches!(err, MigrateError::Execution { .. }));
    assert_eq!(store.get_version(&shop()).unwrap(), None);
}

#[test]
fn normalized_install_in_custom_table() {
    let config = StoreConfig {
        schema: Some("meta".to_string()),
        table: "composer_versions".to_string(),
        ..StoreConfig::memory()
    };
    let store = DuckDbVersionStore::from_config(&config).unwrap();
    let resolver = StaticResolver::new().with("acme/shop", "v3.x-dev");
    let gate = MigrationGate::new(&store, Policy::Normalized).with_resolver(&resolver);
    let install = SqlMigration::new(MigrationDescriptor::install(shop()))
        .with_up("CREATE TABLE shop_products (id INTEGER)");

    let decision = gate.prepare(&install, Direction::Up).unwrap();
    assert!(!decision.skip());
    let mut executor = DuckDbExecutor { conn: store.conn() };
    executor
        .execute(install.descriptor(), &gate.operations(&install, &decision))
        .unwrap();
    gate.finish(&install, &decision, true).unwrap();

    let stored: String = store
        .conn()
        .query_row(
            "SELECT version FROM meta.composer_versions WHERE package = 'acme/shop'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "3.99999");
    assert!(gate.prepare(&install, Direction::Up).unwrap().skip());
}
