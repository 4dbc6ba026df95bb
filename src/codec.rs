//! Enum codec: conversions for one type under one configuration.
//!
//! An [`EnumCodec`] pairs a type's shared slot (descriptor and caches) with
//! a fixed [`CodecConfig`]. Codecs are cheap to clone; every codec for the
//! same type and name style shares one lookup cache.

use std::sync::Arc;

use crate::cache::{DEFAULT_CACHE_LIMIT, LookupCache};
use crate::descriptor::EnumDescriptor;
use crate::error::CodecError;
use crate::flags::{decode_flags_with, encode_flags_with};
use crate::numeric::WireNumber;
use crate::registry::TypeSlot;
use crate::resolver::NameResolver;
use crate::schema::{EnumSchema, SchemaMember};
use crate::strategy::{CodecConfig, Strategy};
use crate::wire::WireToken;

#[derive(Clone, Debug)]
pub struct EnumCodec {
    slot: Arc<TypeSlot>,
    config: CodecConfig,
}

impl EnumCodec {
    pub fn new(slot: Arc<TypeSlot>, config: CodecConfig) -> Result<Self, CodecError> {
        config.validate()?;
        Ok(Self { slot, config })
    }

    /// Codec over a descriptor that is not tied to a Rust type or registry.
    pub fn standalone(descriptor: EnumDescriptor, config: CodecConfig) -> Result<Self, CodecError> {
        Self::new(Arc::new(TypeSlot::new(descriptor, DEFAULT_CACHE_LIMIT)), config)
    }

    #[inline]
    pub fn descriptor(&self) -> &EnumDescriptor {
        self.slot.descriptor()
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Lookup cache for this codec's name style.
    #[inline]
    pub fn cache(&self) -> &LookupCache {
        self.slot.cache(self.config.style())
    }

    #[inline]
    fn resolver(&self) -> NameResolver<'_> {
        NameResolver::new(self.slot.descriptor(), self.config.style())
    }

    fn unknown(&self, text: &str) -> CodecError {
        tracing::trace!(type_name = self.descriptor().type_name(), text, "unknown member");
        CodecError::UnknownMember {
            type_name: self.descriptor().type_name().to_string(),
            text: text.to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Single values
    // -------------------------------------------------------------------------

    /// Resolved name of a declared value.
    pub fn resolve_single(&self, raw: u64) -> Option<Arc<str>> {
        self.cache().get_or_compute(raw, || {
            self.resolver()
                .resolve(raw)
                .map(|name| Arc::<str>::from(name.as_ref()))
        })
    }

    /// Value whose resolved name matches `text` under the configured comparison.
    pub fn parse_single(&self, text: &str) -> Result<u64, CodecError> {
        let comparison = self.config.comparison;
        self.cache()
            .get_or_compute_reverse(text, comparison, || {
                self.resolver().reverse_resolve(text, comparison)
            })
            .ok_or_else(|| self.unknown(text))
    }

    // -------------------------------------------------------------------------
    // Flag combinations
    // -------------------------------------------------------------------------

    /// Separated names of the single-bit members set in `raw`, lowest bit first.
    ///
    /// `None` when no declared member bit is set. Undeclared bits are dropped.
    pub fn resolve_flags(&self, raw: u64) -> Option<String> {
        encode_flags_with(self.descriptor(), raw, &self.config.separator, |bit| {
            self.resolve_single(bit)
        })
    }

    /// OR of the members named in a separated list.
    pub fn parse_flags(&self, text: &str) -> Result<u64, CodecError> {
        let comparison = self.config.comparison;
        decode_flags_with(self.descriptor(), text, &self.config.separator, |token| {
            self.cache().get_or_compute_reverse(token, comparison, || {
                self.resolver().reverse_resolve(token, comparison)
            })
        })
    }

    // -------------------------------------------------------------------------
    // Numbers
    // -------------------------------------------------------------------------

    #[inline]
    pub fn resolve_numeric(&self, raw: u64) -> WireNumber {
        self.descriptor().width().to_wire_number(raw)
    }

    /// Accepts a number token or a numeric-string token.
    pub fn parse_numeric(&self, token: &WireToken) -> Result<u64, CodecError> {
        let width = self.descriptor().width();
        match token {
            WireToken::Number(number) => width.from_wire_number(*number),
            WireToken::String(text) => width.parse_str(text),
        }
    }

    // -------------------------------------------------------------------------
    // Strategy dispatch
    // -------------------------------------------------------------------------

    /// Wire token for `raw` under the configured strategy.
    pub fn encode(&self, raw: u64) -> Result<WireToken, CodecError> {
        match self.config.strategy {
            Strategy::Numeric => Ok(WireToken::Number(self.resolve_numeric(raw))),
            Strategy::NumericString => Ok(WireToken::String(self.descriptor().width().format(raw))),
            Strategy::Flags => {
                if let Some(name) = self.resolve_single(raw) {
                    return Ok(WireToken::String(name.to_string()));
                }
                if self.config.allow_numbers && !self.descriptor().covers(raw) {
                    return self.encode_unnamed(raw);
                }
                match self.resolve_flags(raw) {
                    Some(text) => Ok(WireToken::String(text)),
                    None => self.encode_unnamed(raw),
                }
            }
            Strategy::StringByName | Strategy::StringByAlias | Strategy::StringByDescription => {
                match self.resolve_single(raw) {
                    Some(name) => Ok(WireToken::String(name.to_string())),
                    None => self.encode_unnamed(raw),
                }
            }
        }
    }

    fn encode_unnamed(&self, raw: u64) -> Result<WireToken, CodecError> {
        if self.config.allow_numbers {
            tracing::trace!(
                type_name = self.descriptor().type_name(),
                value = raw,
                "no name for value, writing number"
            );
            return Ok(WireToken::Number(self.resolve_numeric(raw)));
        }
        Err(CodecError::UndefinedValue {
            type_name: self.descriptor().type_name().to_string(),
            value: raw,
        })
    }

    /// Raw value for a wire token under the configured strategy.
    pub fn decode(&self, token: &WireToken) -> Result<u64, CodecError> {
        if self.config.strategy.is_numeric() {
            return self.parse_numeric(token);
        }

        match token {
            WireToken::String(text) => {
                let parsed = if self.config.strategy == Strategy::Flags {
                    self.parse_flags(text)
                } else {
                    self.parse_single(text)
                };
                match parsed {
                    Err(err @ CodecError::UnknownMember { .. }) if self.config.allow_numbers => {
                        self.descriptor().width().parse_str(text).map_err(|_| err)
                    }
                    other => other,
                }
            }
            WireToken::Number(number) if self.config.allow_numbers => {
                self.descriptor().width().from_wire_number(*number)
            }
            WireToken::Number(_) => Err(CodecError::UnsupportedToken {
                expected: "string",
                found: token.kind(),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Capability query
    // -------------------------------------------------------------------------

    /// Whether values are written as flag combinations.
    pub fn is_flags(&self) -> bool {
        self.config.strategy == Strategy::Flags || self.descriptor().is_flags()
    }

    /// Single-bit members in ascending bit order, with their resolved names.
    pub fn flag_members(&self) -> Vec<(u64, Arc<str>)> {
        self.descriptor()
            .flag_members()
            .filter_map(|(_, variant)| {
                self.resolve_single(variant.value)
                    .map(|name| (variant.value, name))
            })
            .collect()
    }

    /// Wire form of every declared value, in declaration order.
    pub fn schema(&self) -> Result<EnumSchema, CodecError> {
        let descriptor = self.descriptor();
        let mut members = Vec::with_capacity(descriptor.len());
        for variant in descriptor.variants() {
            members.push(SchemaMember {
                value: self.encode(variant.value)?,
                identifier: variant.identifier,
            });
        }
        Ok(EnumSchema {
            type_name: descriptor.type_name(),
            is_flags: self.is_flags(),
            strategy: self.config.strategy,
            members,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
