//! Typed bridge between Rust enum types and their raw values.

use bitflags::Flags;

use crate::descriptor::{EnumDescriptor, VariantDef};
use crate::error::CodecError;
use crate::numeric::IntWidth;
use crate::strategy::CodecConfig;

/// A Rust type with a wire codec.
///
/// Implemented by `#[derive(WireEnum)]` for fieldless enums and by
/// [`impl_wire_flags!`](crate::impl_wire_flags) for `bitflags` types.
pub trait WireEnum: Sized + Send + Sync + 'static {
    /// Type name used in errors and as the key for per-type configuration.
    const NAME: &'static str;

    /// Build the variant table. Called once per registry, on first use.
    fn descriptor() -> Result<EnumDescriptor, CodecError>;

    /// Declared codec configuration.
    fn config() -> CodecConfig {
        CodecConfig::default()
    }

    /// Raw bit pattern, zero-extended to `u64`.
    fn to_raw(&self) -> u64;

    /// Typed value for a raw bit pattern, `None` if the type cannot hold it.
    fn from_raw(raw: u64) -> Option<Self>;
}

/// Integer types usable as `bitflags` storage.
pub trait RawBits: Copy {
    const WIDTH: IntWidth;

    fn to_raw(self) -> u64;

    /// Bits outside the width are discarded.
    fn from_raw(raw: u64) -> Self;
}

macro_rules! impl_raw_bits {
    ($($ty:ty => $unsigned:ty, $width:ident);* $(;)?) => {
        $(
            impl RawBits for $ty {
                const WIDTH: IntWidth = IntWidth::$width;

                #[inline]
                fn to_raw(self) -> u64 {
                    self as $unsigned as u64
                }

                #[inline]
                fn from_raw(raw: u64) -> Self {
                    raw as $ty
                }
            }
        )*
    };
}

impl_raw_bits! {
    u8 => u8, U8;
    u16 => u16, U16;
    u32 => u32, U32;
    u64 => u64, U64;
    i8 => u8, I8;
    i16 => u16, I16;
    i32 => u32, I32;
    i64 => u64, I64;
}

/// Descriptor for a `bitflags` type: one variant per named flag, in
/// declaration order, marked as a flags type.
pub fn flags_descriptor<F>(type_name: &'static str) -> Result<EnumDescriptor, CodecError>
where
    F: Flags,
    F::Bits: RawBits,
{
    let defs: Vec<VariantDef> = F::FLAGS
        .iter()
        .filter(|flag| flag.is_named())
        .map(|flag| VariantDef::new(flag.value().bits().to_raw(), flag.name()))
        .collect();
    EnumDescriptor::build(type_name, <F::Bits as RawBits>::WIDTH, true, &defs)
}

/// Implement [`WireEnum`] for a type declared with `bitflags!`.
///
/// The default configuration is the flags strategy; pass a
/// [`CodecConfig`] expression to change it.
///
/// ```ignore
/// bitflags::bitflags! {
///     #[derive(Clone, Copy, Debug, PartialEq, Eq)]
///     pub struct Permissions: u8 {
///         const READ = 1;
///         const WRITE = 2;
///     }
/// }
/// enum_wire::impl_wire_flags!(Permissions);
/// ```
#[macro_export]
macro_rules! impl_wire_flags {
    ($ty:ty) => {
        $crate::impl_wire_flags!($ty, $crate::CodecConfig::new($crate::Strategy::Flags));
    };
    ($ty:ty, $config:expr) => {
        impl $crate::WireEnum for $ty {
            const NAME: &'static str = stringify!($ty);

            fn descriptor() -> ::core::result::Result<$crate::EnumDescriptor, $crate::CodecError> {
                $crate::flags_descriptor::<$ty>(<Self as $crate::WireEnum>::NAME)
            }

            fn config() -> $crate::CodecConfig {
                $config
            }

            fn to_raw(&self) -> u64 {
                $crate::RawBits::to_raw($crate::__private::bitflags::Flags::bits(self))
            }

            fn from_raw(raw: u64) -> ::core::option::Option<Self> {
                let bits: <$ty as $crate::__private::bitflags::Flags>::Bits =
                    $crate::RawBits::from_raw(raw);
                ::core::option::Option::Some(
                    <$ty as $crate::__private::bitflags::Flags>::from_bits_retain(bits),
                )
            }
        }
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    bitflags::bitflags! {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        struct Mode: i8 {
            const LOW = 1;
            const SIGN = -128;
        }
    }

    #[test]
    fn signed_bits_zero_extend() {
        assert_eq!(RawBits::to_raw(-1i8), 0xFF);
        assert_eq!(<i8 as RawBits>::from_raw(0xFF), -1);
        assert_eq!(<u16 as RawBits>::from_raw(0x1_0001), 1);
    }

    #[test]
    fn descriptor_from_flags() {
        let desc = flags_descriptor::<Mode>("Mode").unwrap();
        assert!(desc.is_flags());
        assert_eq!(desc.width(), IntWidth::I8);
        assert_eq!(desc.variant_of(0x80).unwrap().identifier, "SIGN");
        assert_eq!(desc.flag_mask(), 0x81);
    }
}
