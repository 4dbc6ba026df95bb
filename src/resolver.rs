//! Name resolver: canonical text for a single declared value, and back.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::descriptor::{EnumDescriptor, VariantDef};
use crate::naming::NamingPolicy;

/// String comparison used when matching wire text against resolved names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Byte-for-byte equality.
    #[default]
    Ordinal,
    /// Equality after Unicode lowercasing.
    IgnoreCase,
}

impl Comparison {
    pub const COUNT: usize = 2;

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Ordinal => 0,
            Self::IgnoreCase => 1,
        }
    }

    /// Compare two strings under this comparison.
    pub fn matches(self, a: &str, b: &str) -> bool {
        self.fold(a) == self.fold(b)
    }

    /// Canonical form of `text`: two strings match iff their folded forms are equal.
    pub fn fold(self, text: &str) -> Cow<'_, str> {
        match self {
            Self::Ordinal => Cow::Borrowed(text),
            Self::IgnoreCase => Cow::Owned(text.to_lowercase()),
        }
    }
}

/// Which per-variant metadata takes precedence over the naming policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NameSource {
    /// Always derive the name from the identifier.
    Identifier,
    /// Prefer the variant's alias.
    #[default]
    Alias,
    /// Prefer the variant's description.
    Description,
}

impl NameSource {
    pub const COUNT: usize = 3;

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Identifier => 0,
            Self::Alias => 1,
            Self::Description => 2,
        }
    }
}

/// Everything the resolved text of a variant depends on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NameStyle {
    pub policy: NamingPolicy,
    pub source: NameSource,
}

impl NameStyle {
    /// Number of distinct styles; one lookup cache exists per style.
    pub const COUNT: usize = NamingPolicy::COUNT * NameSource::COUNT;

    pub const fn new(policy: NamingPolicy, source: NameSource) -> Self {
        Self { policy, source }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.policy.index() * NameSource::COUNT + self.source.index()
    }
}

/// Resolves names against one descriptor under one style.
#[derive(Clone, Copy, Debug)]
pub struct NameResolver<'a> {
    descriptor: &'a EnumDescriptor,
    style: NameStyle,
}

impl<'a> NameResolver<'a> {
    pub fn new(descriptor: &'a EnumDescriptor, style: NameStyle) -> Self {
        Self { descriptor, style }
    }

    #[inline]
    pub fn style(&self) -> NameStyle {
        self.style
    }

    /// Resolved text of a variant.
    ///
    /// An explicit name from the style's source is returned unchanged;
    /// otherwise the policy is applied to the identifier.
    pub fn name_of(&self, variant: &VariantDef) -> Cow<'static, str> {
        let explicit = match self.style.source {
            NameSource::Identifier => None,
            NameSource::Alias => variant.alias,
            NameSource::Description => variant.description,
        };
        match explicit {
            Some(name) => Cow::Borrowed(name),
            None => self.style.policy.apply(variant.identifier),
        }
    }

    /// Resolved text of a declared value, `None` if the value is undeclared.
    pub fn resolve(&self, value: u64) -> Option<Cow<'static, str>> {
        self.descriptor.variant_of(value).map(|v| self.name_of(v))
    }

    /// Value whose resolved text matches `text`.
    ///
    /// Variants are scanned in declaration order, so the first declared
    /// match wins when several values resolve to the same text.
    pub fn reverse_resolve(&self, text: &str, comparison: Comparison) -> Option<u64> {
        self.descriptor
            .variants()
            .iter()
            .find(|v| comparison.matches(&self.name_of(v), text))
            .map(|v| v.value)
    }
}

// =============================================================================
// Tests
// =============================================================================
