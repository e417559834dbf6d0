//! Configuration types and parsing for schemagate.yml

use crate::error::{CoreError, CoreResult};
use crate::package_name::PackageName;
use crate::policy::Policy;
use crate::resolver::StaticResolver;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable overriding [`StoreConfig::path`].
pub const STORE_PATH_ENV: &str = "SCHEMAGATE_STORE_PATH";

/// Path value selecting an in-memory store.
pub const MEMORY_PATH: &str = ":memory:";

/// Top-level configuration from schemagate.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Decision policy applied to every gated migration
    #[serde(default)]
    pub policy: Policy,

    /// Where package versions are recorded
    #[serde(default)]
    pub store: StoreConfig,

    /// Installed package versions, consulted by install migrations under
    /// the normalized policy
    #[serde(default)]
    pub installed: BTreeMap<String, String>,
}

/// Version store location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Optional schema holding the version table
    #[serde(default)]
    pub schema: Option<String>,

    /// Name of the version table
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            schema: None,
            table: default_table(),
        }
    }
}

fn default_store_path() -> String {
    "target/schema.duckdb".to_string()
}

fn default_table() -> String {
    "package_schema_version".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for schemagate.yml or schemagate.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("schemagate.yml");
        let yaml_path = dir.join("schemagate.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.store.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "store.path cannot be empty".to_string(),
            });
        }
        if self.store.table.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "store.table cannot be empty".to_string(),
            });
        }
        if matches!(&self.store.schema, Some(s) if s.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "store.schema cannot be empty when set".to_string(),
            });
        }
        for (package, version) in &self.installed {
            if package.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "installed: package name cannot be empty".to_string(),
                });
            }
            crate::version::validate_version(version).map_err(|e| CoreError::ConfigInvalid {
                message: format!("installed.{package}: {e}"),
            })?;
        }
        Ok(())
    }

    /// Build a resolver from the `installed` map
    pub fn resolver(&self) -> CoreResult<StaticResolver> {
        self.installed
            .iter()
            .try_fold(StaticResolver::new(), |resolver, (package, version)| {
                let package = PackageName::parse(package)?;
                Ok(resolver.with(package.as_str(), version.as_str()))
            })
    }

    /// Resolve the store path from an explicit override, the
    /// SCHEMAGATE_STORE_PATH environment variable, or the config file
    ///
    /// Priority: explicit > env var > config
    pub fn resolve_store_path(&self, explicit: Option<&str>) -> String {
        explicit
            .map(String::from)
            .or_else(|| std::env::var(STORE_PATH_ENV).ok())
            .unwrap_or_else(|| self.store.path.clone())
    }
}

impl StoreConfig {
    /// An in-memory store using the default table name
    pub fn memory() -> Self {
        Self {
            path: MEMORY_PATH.to_string(),
            ..Self::default()
        }
    }

    /// True when the store should not touch the filesystem
    pub fn is_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
