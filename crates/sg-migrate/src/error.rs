//! Error types for sg-migrate

use sg_core::CoreError;
use sg_store::StoreError;
use thiserror::Error;

/// Gated migration errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Stored version could not be read while deciding (G001).
    ///
    /// Raised before any operation is produced.
    #[error("[G001] Could not read package version state: {0}")]
    Storage(#[from] StoreError),

    /// Reversal requested for an update migration with no previous version (G002)
    #[error("[G002] Migration '{migration}' cannot be reversed: it targets {target} and declares no previous version")]
    IrreversibleOperation { migration: String, target: String },

    /// Descriptor rejected before running (G003)
    #[error("[G003] {0}")]
    InvalidDescriptor(#[source] CoreError),

    /// Installed package version unavailable for an install migration (G004)
    #[error("[G004] Migration '{migration}': installed version could not be resolved: {source}")]
    Resolver {
        migration: String,
        #[source]
        source: CoreError,
    },

    /// Payload succeeded but the new version was not recorded (G005).
    ///
    /// The schema may no longer match the stored version.
    #[error("[G005] Migration '{migration}' ran but recording version {version} failed: {source}")]
    Persistence {
        migration: String,
        version: String,
        #[source]
        source: StoreError,
    },

    /// Lifecycle hook called out of order (G006)
    #[error("[G006] Invalid lifecycle transition: cannot {event} while {state}")]
    InvalidTransition { state: String, event: String },

    /// Operation executor reported a failure (G007)
    #[error("[G007] Migration '{migration}' failed: {message}")]
    Execution { migration: String, message: String },
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
