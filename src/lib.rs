//! # Enum wire codec (enum-wire)
//!
//! Converts enum values, including bitflag combinations, to and from wire
//! tokens: a string name, a decimal string, or a number.
//!
//! ## Design
//!
//! ```text
//!  typed value ──to_raw──▶ u64 ──EnumCodec──▶ WireToken
//!                              │
//!                ┌─────────────┼──────────────┐
//!           NameResolver   flag codec    numeric codec
//!                │             │
//!                └── LookupCache (per type, per name style)
//! ```
//!
//! - Names come from an explicit alias (or description) when declared,
//!   otherwise from a [`NamingPolicy`] applied to the identifier.
//! - Flag combinations are written as single-bit member names, lowest bit
//!   first, joined by a configurable separator (`", "` by default).
//! - Descriptors and caches live in a [`CodecRegistry`] slot per type,
//!   created on first use. Reads never block; cache growth stops at a soft
//!   limit instead of evicting.
//!
//! ```ignore
//! use enum_wire::{WireEnum, WireToken};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, WireEnum)]
//! #[wire(naming = "snake_lower")]
//! enum Color {
//!     #[wire(alias = "crimson")]
//!     Red,
//!     DarkBlue,
//! }
//!
//! assert_eq!(enum_wire::encode(&Color::DarkBlue)?, WireToken::from("dark_blue"));
//! assert_eq!(enum_wire::decode::<Color>(&"crimson".into())?, Color::Red);
//! ```

extern crate self as enum_wire;

pub mod adapter;
pub mod cache;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod flags;
pub mod naming;
pub mod numeric;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod strategy;
pub mod traits;
pub mod wire;

pub use adapter::Wire;
pub use cache::{DEFAULT_CACHE_LIMIT, LookupCache, SoftCache};
pub use codec::EnumCodec;
pub use config::{ConfigPatch, WireConfig};
pub use descriptor::{EnumDescriptor, VariantDef};
pub use error::{CodecError, ConfigError};
pub use flags::FlagCodec;
pub use naming::NamingPolicy;
pub use numeric::{IntWidth, WireNumber};
pub use registry::{CodecRegistry, TypeSlot, install, registry};
pub use resolver::{Comparison, NameResolver, NameSource, NameStyle};
pub use schema::{EnumSchema, SchemaMember};
pub use strategy::{CodecConfig, DEFAULT_SEPARATOR, Strategy};
pub use traits::{RawBits, WireEnum, flags_descriptor};
pub use wire::WireToken;

pub use enum_wire_macro::WireEnum;

#[doc(hidden)]
pub mod __private {
    pub use bitflags;
}

/// Encode `value` with the process-wide registry.
pub fn encode<E: WireEnum>(value: &E) -> Result<WireToken, CodecError> {
    registry().encode(value)
}

/// Decode a token with the process-wide registry.
pub fn decode<E: WireEnum>(token: &WireToken) -> Result<E, CodecError> {
    registry().decode(token)
}

/// Codec for `E` from the process-wide registry.
pub fn codec<E: WireEnum>() -> Result<EnumCodec, CodecError> {
    registry().codec::<E>()
}
