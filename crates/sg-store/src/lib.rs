//! sg-store - Version store for Schemagate
//!
//! Durable, package-keyed storage of the last applied schema version. The
//! [`VersionStore`] trait is implemented by a DuckDB-backed store that
//! provisions its own table on first use, and by an in-memory store for
//! tests and callers that keep state elsewhere.

pub mod duckdb;
pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

pub use crate::duckdb::DuckDbVersionStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryVersionStore;
pub use record::PackageVersionRecord;
pub use traits::VersionStore;
