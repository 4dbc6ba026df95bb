//! Flag codec: combined bitflag values ↔ separated member-name lists.
//!
//! Encoding walks the set bits of a value from the lowest upward, so output
//! order is ascending by bit and independent of declaration order. Bits with
//! no declared single-bit member are dropped from the text; callers that
//! need a lossless form check [`EnumDescriptor::covers`] first.

use crate::descriptor::EnumDescriptor;
use crate::error::CodecError;
use crate::resolver::{Comparison, NameResolver};

/// Join the names of the single-bit members set in `value`.
///
/// `name_of` receives each set bit that is a declared member. Returns `None`
/// when no member matched (zero, or only undeclared bits).
pub fn encode_flags_with<N, F>(
    descriptor: &EnumDescriptor,
    value: u64,
    separator: &str,
    mut name_of: F,
) -> Option<String>
where
    N: AsRef<str>,
    F: FnMut(u64) -> Option<N>,
{
    let mut out = String::new();
    let mut matched = false;
    let mut cursor: u64 = 1;

    // Doubling scan up to the highest set bit; the shift past bit 63 yields 0.
    while cursor != 0 && cursor <= value {
        if value & cursor != 0 && descriptor.index_of(cursor).is_some() {
            if let Some(name) = name_of(cursor) {
                if matched {
                    out.push_str(separator);
                }
                out.push_str(name.as_ref());
                matched = true;
            }
        }
        cursor <<= 1;
    }

    matched.then_some(out)
}

/// Split `text` on `separator`, map every token to a value and OR them.
///
/// Text without the separator is a single token. A token is looked up as
/// written first, then with surrounding whitespace trimmed. Any token
/// `value_of` rejects fails the whole decode.
pub fn decode_flags_with<F>(
    descriptor: &EnumDescriptor,
    text: &str,
    separator: &str,
    mut value_of: F,
) -> Result<u64, CodecError>
where
    F: FnMut(&str) -> Option<u64>,
{
    if separator.is_empty() {
        return Err(CodecError::InvalidSeparator);
    }

    let mut value = 0u64;
    for token in text.split(separator) {
        let trimmed = token.trim();
        let bits = match value_of(token) {
            Some(bits) => Some(bits),
            None if trimmed.len() != token.len() => value_of(trimmed),
            None => None,
        };
        let bits = bits.ok_or_else(|| CodecError::UnknownMember {
            type_name: descriptor.type_name().to_string(),
            text: trimmed.to_string(),
        })?;
        value |= bits;
    }
    Ok(value)
}

/// Uncached flag codec over a [`NameResolver`].
#[derive(Clone, Copy, Debug)]
pub struct FlagCodec<'a> {
    descriptor: &'a EnumDescriptor,
    resolver: NameResolver<'a>,
    separator: &'a str,
}

impl<'a> FlagCodec<'a> {
    pub fn new(
        descriptor: &'a EnumDescriptor,
        resolver: NameResolver<'a>,
        separator: &'a str,
    ) -> Self {
        Self {
            descriptor,
            resolver,
            separator,
        }
    }

    pub fn encode(&self, value: u64) -> Option<String> {
        encode_flags_with(self.descriptor, value, self.separator, |bit| {
            self.resolver.resolve(bit)
        })
    }

    /// Tokens may name any declared member, including declared combinations.
    pub fn decode(&self, text: &str, comparison: Comparison) -> Result<u64, CodecError> {
        decode_flags_with(self.descriptor, text, self.separator, |token| {
            self.resolver.reverse_resolve(token, comparison)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::VariantDef;
    use crate::naming::NamingPolicy;
    use crate::numeric::IntWidth;
    use crate::resolver::{NameSource, NameStyle};

    const FLAGS: &[VariantDef] = &[
        VariantDef::new(2, "Value1"),
        VariantDef::new(4, "Value2"),
        VariantDef::new(8, "Value3"),
    ];

    // Same members, declared highest first, plus a combination alias
    const SHUFFLED: &[VariantDef] = &[
        VariantDef::new(12, "Upper"),
        VariantDef::new(8, "Value3"),
        VariantDef::new(2, "Value1"),
        VariantDef::new(4, "Value2"),
    ];

    fn descriptor(defs: &[VariantDef]) -> EnumDescriptor {
        EnumDescriptor::build("Sample", IntWidth::I32, true, defs).unwrap()
    }

    fn style() -> NameStyle {
        NameStyle::new(NamingPolicy::None, NameSource::Alias)
    }

    #[test]
    fn encode_with_default_and_custom_separator() {
        let desc = descriptor(FLAGS);
        let resolver = NameResolver::new(&desc, style());

        let codec = FlagCodec::new(&desc, resolver, ", ");
        assert_eq!(codec.encode(2 | 4).as_deref(), Some("Value1, Value2"));

        let codec = FlagCodec::new(&desc, resolver, "|");
        assert_eq!(codec.encode(2 | 4).as_deref(), Some("Value1|Value2"));
    }

    #[test]
    fn encode_order_ignores_declaration_order() {
        let desc = descriptor(SHUFFLED);
        let codec = FlagCodec::new(&desc, NameResolver::new(&desc, style()), ", ");
        assert_eq!(codec.encode(2 | 4 | 8).as_deref(), Some("Value1, Value2, Value3"));
    }

    #[test]
    fn encode_nothing_matched_is_none() {
        let desc = descriptor(FLAGS);
        let codec = FlagCodec::new(&desc, NameResolver::new(&desc, style()), ", ");
        assert_eq!(codec.encode(0), None);
        assert_eq!(codec.encode(1), None);
        assert_eq!(codec.encode(1 << 40), None);
    }

    #[test]
    fn encode_drops_undeclared_bits() {
        let desc = descriptor(FLAGS);
        let codec = FlagCodec::new(&desc, NameResolver::new(&desc, style()), ", ");
        assert_eq!(codec.encode(1 | 4 | 16).as_deref(), Some("Value2"));
    }

    #[test]
    fn encode_top_bit() {
        let defs = [VariantDef::new(1, "Low"), VariantDef::new(1 << 63, "High")];
        let desc = EnumDescriptor::build("Wide", IntWidth::U64, true, &defs).unwrap();
        let codec = FlagCodec::new(&desc, NameResolver::new(&desc, style()), ", ");
        assert_eq!(codec.encode(u64::MAX).as_deref(), Some("Low, High"));
    }

    #[test]
    fn decode_single_and_combined() {
        let desc = descriptor(FLAGS);
        let codec = FlagCodec::new(&desc, NameResolver::new(&desc, style()), ", ");

        assert_eq!(codec.decode("Value2", Comparison::Ordinal).unwrap(), 4);
        assert_eq!(codec.decode("Value1, Value3", Comparison::Ordinal).unwrap(), 10);
        assert_eq!(codec.decode("value1, VALUE3", Comparison::IgnoreCase).unwrap(), 10);
    }

    #[test]
    fn decode_accepts_combination_alias_token() {
        let desc = descriptor(SHUFFLED);
        let codec = FlagCodec::new(&desc, NameResolver::new(&desc, style()), "|");
        assert_eq!(codec.decode("Upper|Value1", Comparison::Ordinal).unwrap(), 14);
    }

    #[test]
    fn decode_unknown_member_fails_whole_value() {
        let desc = descriptor(FLAGS);
        let codec = FlagCodec::new(&desc, NameResolver::new(&desc, style()), ", ");

        let err = codec.decode("Value1, Bogus", Comparison::Ordinal).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownMember {
                type_name: "Sample".into(),
                text: "Bogus".into()
            }
        );
        assert!(codec.decode("", Comparison::Ordinal).is_err());
    }

    #[test]
    fn padded_alias_decodes_as_written() {
        let defs = [
            VariantDef::new(1, "A").with_alias(" padded"),
            VariantDef::new(2, "B").with_alias("b"),
        ];
        let desc = descriptor(&defs);
        let codec = FlagCodec::new(&desc, NameResolver::new(&desc, style()), ", ");

        assert_eq!(codec.encode(1).as_deref(), Some(" padded"));
        assert_eq!(codec.decode(" padded", Comparison::Ordinal).unwrap(), 1);
        assert_eq!(codec.encode(3).as_deref(), Some(" padded, b"));
        assert_eq!(codec.decode(" padded, b", Comparison::Ordinal).unwrap(), 3);
        // Untrimmed lookup first, trimmed only on a miss
        assert_eq!(codec.decode(" b ", Comparison::Ordinal).unwrap(), 2);
        assert!(codec.decode("padded", Comparison::Ordinal).is_err());
    }

    #[test]
    fn decode_rejects_empty_separator() {
        let desc = descriptor(FLAGS);
        let codec = FlagCodec::new(&desc, NameResolver::new(&desc, style()), "");
        assert_eq!(codec.decode("Value1", Comparison::Ordinal), Err(CodecError::InvalidSeparator));
    }

    #[test]
    fn every_subset_round_trips() {
        let desc = descriptor(FLAGS);
        let codec = FlagCodec::new(&desc, NameResolver::new(&desc, style()), " | ");
        for subset in 1u64..8 {
            let value = subset << 1;
            let text = codec.encode(value).unwrap();
            assert_eq!(codec.decode(&text, Comparison::Ordinal).unwrap(), value, "{}", text);
        }
    }
}
