//! sg-core - Core library for Schemagate
//!
//! This crate provides the shared types used by the version store and the
//! gated migration lifecycle: package names, version normalization and
//! ordering, migration descriptors, configuration parsing, and the
//! installed-version resolvers used by install migrations.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod package_name;
pub mod policy;
pub mod resolver;
pub mod sql_utils;
pub mod version;

pub use config::{Config, StoreConfig};
pub use descriptor::{MigrationDescriptor, PreviousVersion};
pub use error::{CoreError, CoreResult};
pub use package_name::PackageName;
pub use policy::Policy;
pub use resolver::{InstalledVersionResolver, StaticResolver};
pub use version::{compare_versions, normalize_version};
