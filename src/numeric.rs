//! Numeric codec: direct integer ↔ wire-number mapping.
//!
//! Raw values are normalized to `u64` as the zero-extended bit pattern of the
//! underlying integer (an `i8` of `-1` is stored as `0xFF`). Conversions in
//! and out of the wire form are checked per width, selected by [`IntWidth`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Underlying integral representation of an enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntWidth {
    /// Width in bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::I8 | Self::U8 => 8,
            Self::I16 | Self::U16 => 16,
            Self::I32 | Self::U32 => 32,
            Self::I64 | Self::U64 => 64,
        }
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Mask covering every bit of the width.
    #[inline]
    pub const fn mask(self) -> u64 {
        match self.bits() {
            64 => u64::MAX,
            bits => (1u64 << bits) - 1,
        }
    }

    /// Normalize a discriminant to its raw bit pattern.
    ///
    /// Used by generated code, where `Variant as i128` carries the declared
    /// discriminant with its sign.
    #[inline]
    pub const fn truncate(self, value: i128) -> u64 {
        (value as u64) & self.mask()
    }

    /// Encode a raw value as a wire number, restoring the sign for signed widths.
    pub const fn to_wire_number(self, raw: u64) -> WireNumber {
        if self.is_signed() {
            let shift = 64 - self.bits();
            WireNumber::Signed(((raw << shift) as i64) >> shift)
        } else {
            WireNumber::Unsigned(raw & self.mask())
        }
    }

    /// Decode a wire number; fails if it does not fit the width.
    pub fn from_wire_number(self, number: WireNumber) -> Result<u64, CodecError> {
        let value = number.as_i128();
        let raw = match self {
            Self::I8 => i8::try_from(value).ok().map(|v| u64::from(v as u8)),
            Self::I16 => i16::try_from(value).ok().map(|v| u64::from(v as u16)),
            Self::I32 => i32::try_from(value).ok().map(|v| u64::from(v as u32)),
            Self::I64 => i64::try_from(value).ok().map(|v| v as u64),
            Self::U8 => u8::try_from(value).ok().map(u64::from),
            Self::U16 => u16::try_from(value).ok().map(u64::from),
            Self::U32 => u32::try_from(value).ok().map(u64::from),
            Self::U64 => u64::try_from(value).ok(),
        };
        raw.ok_or(CodecError::NumberOutOfRange { value, width: self })
    }

    /// Parse a numeric-string token.
    ///
    /// The whole text must parse as the underlying integer type: no
    /// surrounding whitespace, no fractional or exponent forms.
    pub fn parse_str(self, text: &str) -> Result<u64, CodecError> {
        let raw = match self {
            Self::I8 => text.parse::<i8>().ok().map(|v| u64::from(v as u8)),
            Self::I16 => text.parse::<i16>().ok().map(|v| u64::from(v as u16)),
            Self::I32 => text.parse::<i32>().ok().map(|v| u64::from(v as u32)),
            Self::I64 => text.parse::<i64>().ok().map(|v| v as u64),
            Self::U8 => text.parse::<u8>().ok().map(u64::from),
            Self::U16 => text.parse::<u16>().ok().map(u64::from),
            Self::U32 => text.parse::<u32>().ok().map(u64::from),
            Self::U64 => text.parse::<u64>().ok(),
        };
        raw.ok_or_else(|| CodecError::InvalidNumericFormat {
            text: text.to_string(),
            width: self,
        })
    }

    /// Decimal text of a raw value, as written by the numeric-string strategy.
    pub fn format(self, raw: u64) -> String {
        self.to_wire_number(raw).to_string()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
        }
    }
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer as it appears on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum WireNumber {
    Signed(i64),
    Unsigned(u64),
}

impl WireNumber {
    #[inline]
    pub const fn as_i128(self) -> i128 {
        match self {
            Self::Signed(v) => v as i128,
            Self::Unsigned(v) => v as i128,
        }
    }
}

impl From<i64> for WireNumber {
    fn from(value: i64) -> Self {
        Self::Signed(value)
    }
}

impl From<u64> for WireNumber {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl fmt::Display for WireNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(v) => write!(f, "{}", v),
            Self::Unsigned(v) => write!(f, "{}", v),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [IntWidth; 8] = [
        IntWidth::I8,
        IntWidth::I16,
        IntWidth::I32,
        IntWidth::I64,
        IntWidth::U8,
        IntWidth::U16,
        IntWidth::U32,
        IntWidth::U64,
    ];

    fn bounds(width: IntWidth) -> (i128, i128) {
        match width {
            IntWidth::I8 => (i8::MIN as i128, i8::MAX as i128),
            IntWidth::I16 => (i16::MIN as i128, i16::MAX as i128),
            IntWidth::I32 => (i32::MIN as i128, i32::MAX as i128),
            IntWidth::I64 => (i64::MIN as i128, i64::MAX as i128),
            IntWidth::U8 => (0, u8::MAX as i128),
            IntWidth::U16 => (0, u16::MAX as i128),
            IntWidth::U32 => (0, u32::MAX as i128),
            IntWidth::U64 => (0, u64::MAX as i128),
        }
    }

    #[test]
    fn boundary_values_round_trip() {
        for width in ALL {
            let (min, max) = bounds(width);
            for value in [min, max, 0] {
                let raw = width.truncate(value);
                let wire = width.to_wire_number(raw);
                assert_eq!(wire.as_i128(), value, "{} {}", width, value);
                assert_eq!(width.from_wire_number(wire).unwrap(), raw);

                let text = width.format(raw);
                assert_eq!(text, value.to_string());
                assert_eq!(width.parse_str(&text).unwrap(), raw);
            }
        }
    }

    #[test]
    fn signed_raw_is_zero_extended() {
        assert_eq!(IntWidth::I8.truncate(-1), 0xFF);
        assert_eq!(IntWidth::I16.truncate(-2), 0xFFFE);
        assert_eq!(IntWidth::I8.to_wire_number(0x80), WireNumber::Signed(-128));
        assert_eq!(IntWidth::U8.to_wire_number(0x80), WireNumber::Unsigned(128));
    }

    #[test]
    fn out_of_range_numbers_fail() {
        assert!(matches!(
            IntWidth::I8.from_wire_number(WireNumber::Signed(128)),
            Err(CodecError::NumberOutOfRange { value: 128, width: IntWidth::I8 })
        ));
        assert!(IntWidth::U16.from_wire_number(WireNumber::Signed(-1)).is_err());
        assert!(IntWidth::I64.from_wire_number(WireNumber::Unsigned(u64::MAX)).is_err());
        assert_eq!(
            IntWidth::U64.from_wire_number(WireNumber::Unsigned(u64::MAX)).unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn numeric_strings_must_parse_exactly() {
        for text in ["", " 1", "1 ", "1.0", "1e3", "0x10", "12abc", "256"] {
            assert!(
                matches!(
                    IntWidth::U8.parse_str(text),
                    Err(CodecError::InvalidNumericFormat { .. })
                ),
                "should reject {:?}",
                text
            );
        }
        assert_eq!(IntWidth::I32.parse_str("-42").unwrap(), IntWidth::I32.truncate(-42));
        assert_eq!(IntWidth::U32.parse_str("42").unwrap(), 42);
    }
}
