//! TOML configuration for a [`CodecRegistry`](crate::CodecRegistry).
//!
//! ```toml
//! cache_limit = 128
//!
//! [defaults]
//! naming = "camel_case"
//!
//! [types.Permissions]
//! strategy = "flags"
//! separator = " | "
//! ```
//!
//! `[defaults]` and each `[types.<Name>]` table hold the same optional keys
//! as [`CodecConfig`]. Keys left out keep the type's declared value.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::cache::DEFAULT_CACHE_LIMIT;
use crate::error::ConfigError;
use crate::naming::NamingPolicy;
use crate::resolver::Comparison;
use crate::strategy::{CodecConfig, Strategy};

/// Partial codec configuration; set fields replace those of a base config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigPatch {
    pub strategy: Option<Strategy>,
    pub naming: Option<NamingPolicy>,
    pub separator: Option<String>,
    pub comparison: Option<Comparison>,
    pub allow_numbers: Option<bool>,
}

impl ConfigPatch {
    pub fn apply(&self, config: &mut CodecConfig) {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(naming) = self.naming {
            config.naming = naming;
        }
        if let Some(separator) = &self.separator {
            config.separator.clone_from(separator);
        }
        if let Some(comparison) = self.comparison {
            config.comparison = comparison;
        }
        if let Some(allow) = self.allow_numbers {
            config.allow_numbers = allow;
        }
    }

    fn validate(&self, table: &str) -> Result<(), ConfigError> {
        if self.separator.as_deref() == Some("") {
            return Err(ConfigError::Validation(format!(
                "[{}]: separator must not be empty",
                table
            )));
        }
        Ok(())
    }
}

/// Parsed configuration file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireConfig {
    /// Soft limit for every lookup cache map
    pub cache_limit: usize,
    pub defaults: ConfigPatch,
    /// Overrides keyed by `WireEnum::NAME`
    pub types: BTreeMap<String, ConfigPatch>,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            cache_limit: DEFAULT_CACHE_LIMIT,
            defaults: ConfigPatch::default(),
            types: BTreeMap::new(),
        }
    }
}

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWireConfig {
    cache_limit: Option<usize>,
    #[serde(default)]
    defaults: ConfigPatch,
    #[serde(default)]
    types: BTreeMap<String, ConfigPatch>,
}

impl WireConfig {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    /// Effective configuration for the type named `name`, starting from `base`.
    pub fn config_for(&self, name: &str, base: CodecConfig) -> CodecConfig {
        let mut config = base;
        self.defaults.apply(&mut config);
        if let Some(patch) = self.types.get(name) {
            patch.apply(&mut config);
        }
        config
    }
}

impl FromStr for WireConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawWireConfig = toml::from_str(content)?;

        let cache_limit = raw.cache_limit.unwrap_or(DEFAULT_CACHE_LIMIT);
        if cache_limit == 0 {
            return Err(ConfigError::Validation("cache_limit must be at least 1".into()));
        }

        raw.defaults.validate("defaults")?;
        for (name, patch) in &raw.types {
            if name.is_empty() {
                return Err(ConfigError::Validation("empty type name".into()));
            }
            patch.validate(&format!("types.{}", name))?;
        }

        Ok(Self {
            cache_limit,
            defaults: raw.defaults,
            types: raw.types,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
