//! Version store trait definition

use crate::error::StoreResult;
use crate::record::PackageVersionRecord;
use sg_core::PackageName;

/// Durable mapping from package to its last applied schema version.
///
/// Access is synchronous and single-threaded: one migration at a time.
pub trait VersionStore {
    /// Create the backing table if it does not exist. Safe to call on every
    /// access.
    fn ensure_schema(&self) -> StoreResult<()>;

    /// Stored version for `package`, or `None` if nothing was ever applied.
    fn get_version(&self, package: &PackageName) -> StoreResult<Option<String>>;

    /// Replace the stored state for `package`.
    ///
    /// `None` removes the record (the package is uninstalled). `Some`
    /// replaces the record atomically so there is never more than one
    /// record per package.
    fn set_version(&self, package: &PackageName, version: Option<&str>) -> StoreResult<()>;

    /// All records, ordered by package.
    fn list_versions(&self) -> StoreResult<Vec<PackageVersionRecord>>;

    /// Backend identifier for logging
    fn store_type(&self) -> &'static str;
}
