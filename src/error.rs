//! Error types for codec operations and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::numeric::IntWidth;

/// Errors raised while building descriptors or converting values.
///
/// Decode failures are always surfaced; the codec never substitutes a
/// default value for input it cannot interpret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A text token did not match any declared name.
    #[error("'{text}' is not a member of {type_name}")]
    UnknownMember { type_name: String, text: String },

    /// A numeric-string token did not parse as the underlying integer type.
    #[error("'{text}' is not a valid {width} value")]
    InvalidNumericFormat { text: String, width: IntWidth },

    /// The wire token is of a kind the strategy cannot read.
    #[error("unsupported token: expected {expected}, found {found}")]
    UnsupportedToken {
        expected: &'static str,
        found: &'static str,
    },

    /// A numeric token does not fit the enum's underlying width.
    #[error("{value} does not fit in {width}")]
    NumberOutOfRange { value: i128, width: IntWidth },

    /// A raw value has no declared name, or the Rust type cannot hold it.
    #[error("{value:#x} is not a declared value of {type_name}")]
    UndefinedValue { type_name: String, value: u64 },

    /// Two variants share an identifier.
    #[error("duplicate identifier '{identifier}' in {type_name}")]
    DuplicateIdentifier {
        type_name: String,
        identifier: String,
    },

    /// Two variants share an underlying value.
    #[error("'{first}' and '{second}' in {type_name} share the value {value:#x}")]
    DuplicateValue {
        type_name: String,
        first: String,
        second: String,
        value: u64,
    },

    /// A declared value has bits outside the enum's width.
    #[error("'{identifier}' in {type_name} has value {value:#x} outside {width}")]
    ValueOutOfWidth {
        type_name: String,
        identifier: String,
        value: u64,
        width: IntWidth,
    },

    /// Flag separators must be non-empty.
    #[error("flag separator must not be empty")]
    InvalidSeparator,
}

/// Errors while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML was malformed or named an unknown strategy/policy.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The TOML parsed but describes an unusable configuration.
    #[error("validation error: {0}")]
    Validation(String),
}
