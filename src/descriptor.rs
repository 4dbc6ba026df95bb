//! Value descriptor table: the declared variants of one enum type.
//!
//! A descriptor is built once per type from a static [`VariantDef`] slice
//! (usually generated by `#[derive(WireEnum)]`) and is immutable afterwards.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::CodecError;
use crate::numeric::IntWidth;

/// One declared variant (used for descriptor building from the derive macro).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantDef {
    /// Raw value, zero-extended from the enum's width.
    pub value: u64,
    pub identifier: &'static str,
    /// Explicit wire name; bypasses the naming policy.
    pub alias: Option<&'static str>,
    /// Human-readable description; also usable as a wire name.
    pub description: Option<&'static str>,
}

impl VariantDef {
    pub const fn new(value: u64, identifier: &'static str) -> Self {
        Self {
            value,
            identifier,
            alias: None,
            description: None,
        }
    }

    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// True for members that take part in flag decomposition.
    #[inline]
    pub const fn is_single_bit(&self) -> bool {
        self.value.is_power_of_two()
    }
}

/// Immutable, ordered table of an enum's declared variants.
///
/// Provides:
/// - Declaration-ordered iteration (the reverse-lookup tie-break)
/// - Value → variant lookup
/// - Ascending-bit iteration over single-bit members
#[derive(Clone, Debug, PartialEq)]
pub struct EnumDescriptor {
    type_name: &'static str,
    width: IntWidth,
    is_flags: bool,
    variants: Vec<VariantDef>,
    value_to_idx: FxHashMap<u64, usize>,
    /// OR of all single-bit member values.
    flag_mask: u64,
}

impl EnumDescriptor {
    /// Build a descriptor, validating that identifiers and values are unique
    /// and that every value fits `width`.
    pub fn build(
        type_name: &'static str,
        width: IntWidth,
        is_flags: bool,
        defs: &[VariantDef],
    ) -> Result<Self, CodecError> {
        let mut identifiers = FxHashSet::default();
        let mut value_to_idx = FxHashMap::default();
        let mut flag_mask = 0u64;

        for (idx, def) in defs.iter().enumerate() {
            if def.value & !width.mask() != 0 {
                return Err(CodecError::ValueOutOfWidth {
                    type_name: type_name.to_string(),
                    identifier: def.identifier.to_string(),
                    value: def.value,
                    width,
                });
            }
            if !identifiers.insert(def.identifier) {
                return Err(CodecError::DuplicateIdentifier {
                    type_name: type_name.to_string(),
                    identifier: def.identifier.to_string(),
                });
            }
            if let Some(&existing) = value_to_idx.get(&def.value) {
                let first: &VariantDef = &defs[existing];
                return Err(CodecError::DuplicateValue {
                    type_name: type_name.to_string(),
                    first: first.identifier.to_string(),
                    second: def.identifier.to_string(),
                    value: def.value,
                });
            }
            value_to_idx.insert(def.value, idx);
            if def.is_single_bit() {
                flag_mask |= def.value;
            }
        }

        Ok(Self {
            type_name,
            width,
            is_flags,
            variants: defs.to_vec(),
            value_to_idx,
            flag_mask,
        })
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn width(&self) -> IntWidth {
        self.width
    }

    /// Whether the type was declared as a bitflag enum.
    #[inline]
    pub fn is_flags(&self) -> bool {
        self.is_flags
    }

    /// All variants in declaration order.
    #[inline]
    pub fn variants(&self) -> &[VariantDef] {
        &self.variants
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Raw value → declaration index.
    #[inline]
    pub fn index_of(&self, value: u64) -> Option<usize> {
        self.value_to_idx.get(&value).copied()
    }

    /// Raw value → variant.
    #[inline]
    pub fn variant_of(&self, value: u64) -> Option<&VariantDef> {
        self.index_of(value).map(|i| &self.variants[i])
    }

    /// OR of every single-bit member.
    #[inline]
    pub fn flag_mask(&self) -> u64 {
        self.flag_mask
    }

    /// True if every set bit of `value` belongs to a declared single-bit member.
    #[inline]
    pub fn covers(&self, value: u64) -> bool {
        value & !self.flag_mask == 0
    }

    /// Single-bit members in ascending bit order, regardless of declaration order.
    pub fn flag_members(&self) -> impl Iterator<Item = (usize, &VariantDef)> + '_ {
        let mask = self.flag_mask;
        (0..self.width.bits())
            .map(|shift| 1u64 << shift)
            .filter(move |bit| mask & bit != 0)
            .filter_map(move |bit| self.index_of(bit).map(|i| (i, &self.variants[i])))
    }
}

// =============================================================================
// Tests
// =============================================================================
