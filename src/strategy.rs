//! Conversion strategies and the per-type codec configuration.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::naming::NamingPolicy;
use crate::resolver::{Comparison, NameSource, NameStyle};

/// Separator used between flag member names unless configured otherwise.
pub const DEFAULT_SEPARATOR: &str = ", ";

/// How a value is represented on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// String token: policy applied to the identifier, aliases ignored.
    StringByName,
    /// String token: alias if declared, otherwise policy applied to the identifier.
    #[default]
    StringByAlias,
    /// String token: description if declared, otherwise policy applied to the identifier.
    StringByDescription,
    /// String token holding the decimal value.
    NumericString,
    /// Number token.
    Numeric,
    /// String token listing single-bit member names joined by the separator.
    Flags,
}

impl Strategy {
    /// Metadata consulted before the naming policy.
    pub const fn name_source(self) -> NameSource {
        match self {
            Self::StringByName => NameSource::Identifier,
            Self::StringByDescription => NameSource::Description,
            Self::StringByAlias | Self::NumericString | Self::Numeric | Self::Flags => {
                NameSource::Alias
            }
        }
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Numeric | Self::NumericString)
    }
}

/// Explicit codec configuration, fixed when a codec is obtained for a type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    pub strategy: Strategy,
    pub naming: NamingPolicy,
    /// Separator between flag member names.
    pub separator: String,
    pub comparison: Comparison,
    /// Accept numeric tokens under name strategies, and write numbers for
    /// values that have no name.
    pub allow_numbers: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            naming: NamingPolicy::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            comparison: Comparison::default(),
            allow_numbers: true,
        }
    }
}

impl CodecConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn with_allow_numbers(mut self, allow: bool) -> Self {
        self.allow_numbers = allow;
        self
    }

    /// Name style implied by the strategy and naming policy.
    #[inline]
    pub fn style(&self) -> NameStyle {
        NameStyle::new(self.naming, self.strategy.name_source())
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if self.separator.is_empty() {
            return Err(CodecError::InvalidSeparator);
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
