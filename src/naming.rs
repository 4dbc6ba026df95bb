//! Naming policies: stateless identifier transforms.
//!
//! A policy is applied to a variant's identifier when no explicit alias
//! takes precedence. Aliases are never transformed.

use std::borrow::Cow;
use std::fmt;

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

/// Identifier-to-wire-name transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// Identifier is used unchanged.
    #[default]
    None,
    /// `FirstValue` → `firstValue`
    CamelCase,
    /// `FirstValue` → `first_value`
    SnakeLower,
    /// `FirstValue` → `FIRST_VALUE`
    SnakeUpper,
    /// `FirstValue` → `first-value`
    KebabLower,
    /// `FirstValue` → `FIRST-VALUE`
    KebabUpper,
}

impl NamingPolicy {
    /// Number of distinct policies.
    pub const COUNT: usize = 6;

    /// All policies in discriminator order.
    pub const ALL: [NamingPolicy; Self::COUNT] = [
        Self::None,
        Self::CamelCase,
        Self::SnakeLower,
        Self::SnakeUpper,
        Self::KebabLower,
        Self::KebabUpper,
    ];

    /// Dense discriminator, stable for the lifetime of the process.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::None => 0,
            Self::CamelCase => 1,
            Self::SnakeLower => 2,
            Self::SnakeUpper => 3,
            Self::KebabLower => 4,
            Self::KebabUpper => 5,
        }
    }

    /// Apply the transform.
    pub fn apply<'a>(self, identifier: &'a str) -> Cow<'a, str> {
        match self {
            Self::None => Cow::Borrowed(identifier),
            Self::CamelCase => Cow::Owned(identifier.to_lower_camel_case()),
            Self::SnakeLower => Cow::Owned(identifier.to_snake_case()),
            Self::SnakeUpper => Cow::Owned(identifier.to_shouty_snake_case()),
            Self::KebabLower => Cow::Owned(identifier.to_kebab_case()),
            Self::KebabUpper => Cow::Owned(identifier.to_shouty_kebab_case()),
        }
    }

    /// Name as written in configuration files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CamelCase => "camel_case",
            Self::SnakeLower => "snake_lower",
            Self::SnakeUpper => "snake_upper",
            Self::KebabLower => "kebab_lower",
            Self::KebabUpper => "kebab_upper",
        }
    }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_borrows_identifier() {
        assert!(matches!(NamingPolicy::None.apply("FirstValue"), Cow::Borrowed("FirstValue")));
    }

    #[test]
    fn transforms_pascal_identifier() {
        let cases = [
            (NamingPolicy::CamelCase, "firstValue"),
            (NamingPolicy::SnakeLower, "first_value"),
            (NamingPolicy::SnakeUpper, "FIRST_VALUE"),
            (NamingPolicy::KebabLower, "first-value"),
            (NamingPolicy::KebabUpper, "FIRST-VALUE"),
        ];
        for (policy, expected) in cases {
            assert_eq!(policy.apply("FirstValue"), expected, "policy {}", policy);
        }
    }

    #[test]
    fn indices_are_dense() {
        for (i, policy) in NamingPolicy::ALL.iter().enumerate() {
            assert_eq!(policy.index(), i);
        }
    }

    #[test]
    fn deserializes_snake_case_names() {
        let policy: NamingPolicy = serde_json::from_str("\"kebab_upper\"").unwrap();
        assert_eq!(policy, NamingPolicy::KebabUpper);
        assert!(serde_json::from_str::<NamingPolicy>("\"Pascal\"").is_err());
    }
}
