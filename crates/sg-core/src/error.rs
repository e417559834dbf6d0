//! Error types for sg-core

use thiserror::Error;

/// Core error type for Schemagate
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Package identifier is empty
    #[error("[C004] Invalid package name: {reason}")]
    InvalidPackageName { reason: String },

    /// C005: Version string cannot be compared
    #[error("[C005] Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// C006: No installed version known for a package
    #[error("[C006] No installed version found for package '{package}'")]
    PackageNotInstalled { package: String },

    /// C007: Migration descriptor is malformed
    #[error("[C007] Invalid migration descriptor '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    /// C008: IO error with file path context
    #[error("[C008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
