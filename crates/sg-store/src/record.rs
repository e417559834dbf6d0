//! `PackageVersionRecord` - one row of the version table

use chrono::NaiveDateTime;
use serde::Serialize;
use sg_core::PackageName;

/// Last applied schema version of a package.
///
/// A package without a record has never had a migration applied; records
/// never hold an empty version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageVersionRecord {
    pub package: PackageName,
    pub version: String,
    /// When the record was last replaced (UTC)
    pub applied_at: NaiveDateTime,
}
