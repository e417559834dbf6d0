//! Error types for sg-store

use thiserror::Error;

/// Version store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing database could not be opened or the version table created (S001)
    #[error("[S001] Version store unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing a version record failed (S002)
    #[error("[S002] Version store query failed: {0}")]
    Query(String),

    /// BEGIN / COMMIT of a replace failed (S003)
    #[error("[S003] Version store transaction failed: {0}")]
    Transaction(String),

    /// Store configuration rejected (S004)
    #[error("[S004] Invalid version store config: {0}")]
    Config(#[from] sg_core::CoreError),

    /// DuckDB driver error with preserved source chain (S005)
    #[error("[S005] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for StoreError
pub type StoreResult<T> = Result<T, StoreError>;

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        StoreError::DuckDb(err)
    }
}
