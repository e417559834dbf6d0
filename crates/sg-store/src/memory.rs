//! In-memory version store
//!
//! Keeps records in a `BTreeMap` for the lifetime of the value. Used by tests
//! and by callers that persist package versions through another channel.

use crate::error::StoreResult;
use crate::record::PackageVersionRecord;
use crate::traits::VersionStore;
use sg_core::PackageName;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Non-durable [`VersionStore`].
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    records: RefCell<BTreeMap<PackageName, PackageVersionRecord>>,
    schema_ready: Cell<bool>,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing versions.
    pub fn with_versions<'a>(versions: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut records = store.records.borrow_mut();
            for (package, version) in versions {
                let package = PackageName::new(package);
                records.insert(package.clone(), record(package, version));
            }
        }
        store.schema_ready.set(true);
        store
    }

    /// Whether [`VersionStore::ensure_schema`] has run.
    pub fn schema_ready(&self) -> bool {
        self.schema_ready.get()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

fn record(package: PackageName, version: &str) -> PackageVersionRecord {
    PackageVersionRecord {
        package,
        version: version.to_string(),
        applied_at: chrono::Utc::now().naive_utc(),
    }
}

impl VersionStore for MemoryVersionStore {
    fn ensure_schema(&self) -> StoreResult<()> {
        self.schema_ready.set(true);
        Ok(())
    }

    fn get_version(&self, package: &PackageName) -> StoreResult<Option<String>> {
        self.ensure_schema()?;
        Ok(self
            .records
            .borrow()
            .get(package)
            .map(|r| r.version.clone()))
    }

    fn set_version(&self, package: &PackageName, version: Option<&str>) -> StoreResult<()> {
        self.ensure_schema()?;
        let mut records = self.records.borrow_mut();
        records.remove(package);
        if let Some(version) = version {
            records.insert(package.clone(), record(package.clone(), version));
        }
        Ok(())
    }

    fn list_versions(&self) -> StoreResult<Vec<PackageVersionRecord>> {
        self.ensure_schema()?;
        Ok(self.records.borrow().values().cloned().collect())
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}
