//! Codec registry: per-type descriptor and cache slots keyed by `TypeId`.
//!
//! Slots are created on first use and live as long as the registry. The slot
//! map is an immutable snapshot behind an [`ArcSwap`]: lookups never block,
//! and a missing slot is built outside any lock and then installed with a
//! compare-and-swap. If two threads race on the same type, both may build a
//! descriptor but only the first install is kept, and every caller gets that
//! one.

use std::any::TypeId;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;

use crate::cache::{DEFAULT_CACHE_LIMIT, LookupCache};
use crate::codec::EnumCodec;
use crate::config::WireConfig;
use crate::descriptor::EnumDescriptor;
use crate::error::CodecError;
use crate::resolver::NameStyle;
use crate::strategy::CodecConfig;
use crate::traits::WireEnum;
use crate::wire::WireToken;

/// Descriptor and lookup caches of one enum type.
pub struct TypeSlot {
    descriptor: EnumDescriptor,
    /// One cache per name style, created on first use of that style.
    caches: [OnceLock<LookupCache>; NameStyle::COUNT],
    cache_limit: usize,
}

impl TypeSlot {
    pub fn new(descriptor: EnumDescriptor, cache_limit: usize) -> Self {
        Self {
            descriptor,
            caches: std::array::from_fn(|_| OnceLock::new()),
            cache_limit,
        }
    }

    #[inline]
    pub fn descriptor(&self) -> &EnumDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn cache(&self, style: NameStyle) -> &LookupCache {
        self.caches[style.index()].get_or_init(|| LookupCache::new(self.cache_limit))
    }

    #[inline]
    pub fn cache_limit(&self) -> usize {
        self.cache_limit
    }
}

impl std::fmt::Debug for TypeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeSlot")
            .field("type_name", &self.descriptor.type_name())
            .field("variants", &self.descriptor.len())
            .field("cache_limit", &self.cache_limit)
            .finish_non_exhaustive()
    }
}

/// Registry of codec slots.
///
/// Provides:
/// - Lazy, race-safe slot creation per Rust type
/// - Per-type configuration layered over each type's declared config
/// - Typed encode/decode entry points
pub struct CodecRegistry {
    slots: ArcSwap<FxHashMap<TypeId, Arc<TypeSlot>>>,
    config: WireConfig,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::with_cache_limit(DEFAULT_CACHE_LIMIT)
    }

    /// Registry whose lookup caches stop growing at `limit` entries per map.
    pub fn with_cache_limit(limit: usize) -> Self {
        Self::from_config(WireConfig {
            cache_limit: limit,
            ..WireConfig::default()
        })
    }

    /// Registry configured from a loaded configuration file.
    pub fn from_config(config: WireConfig) -> Self {
        Self {
            slots: ArcSwap::from_pointee(FxHashMap::default()),
            config,
        }
    }

    #[inline]
    pub fn cache_limit(&self) -> usize {
        self.config.cache_limit
    }

    #[inline]
    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    /// Number of installed slots.
    pub fn len(&self) -> usize {
        self.slots.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot for `E`, building and installing it on first use.
    pub fn slot<E: WireEnum>(&self) -> Result<Arc<TypeSlot>, CodecError> {
        let key = TypeId::of::<E>();
        if let Some(slot) = self.slots.load().get(&key) {
            return Ok(Arc::clone(slot));
        }

        let candidate = Arc::new(TypeSlot::new(E::descriptor()?, self.config.cache_limit));
        self.slots.rcu(|current| {
            if current.contains_key(&key) {
                return Arc::clone(current);
            }
            let mut next = (**current).clone();
            next.insert(key, Arc::clone(&candidate));
            Arc::new(next)
        });

        let installed = self
            .slots
            .load()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&candidate));

        tracing::debug!(
            type_name = E::NAME,
            variants = installed.descriptor().len(),
            raced = !Arc::ptr_eq(&installed, &candidate),
            "installed codec slot"
        );
        Ok(installed)
    }

    /// Effective configuration for `E`: the type's declared config, then the
    /// registry defaults, then the per-type override.
    pub fn config_for<E: WireEnum>(&self) -> CodecConfig {
        self.config.config_for(E::NAME, E::config())
    }

    /// Codec for `E` under its effective configuration.
    pub fn codec<E: WireEnum>(&self) -> Result<EnumCodec, CodecError> {
        self.codec_with::<E>(self.config_for::<E>())
    }

    /// Codec for `E` under an explicit configuration, sharing the type's caches.
    pub fn codec_with<E: WireEnum>(&self, config: CodecConfig) -> Result<EnumCodec, CodecError> {
        EnumCodec::new(self.slot::<E>()?, config)
    }

    pub fn encode<E: WireEnum>(&self, value: &E) -> Result<WireToken, CodecError> {
        self.codec::<E>()?.encode(value.to_raw())
    }

    pub fn decode<E: WireEnum>(&self, token: &WireToken) -> Result<E, CodecError> {
        let raw = self.codec::<E>()?.decode(token)?;
        E::from_raw(raw).ok_or_else(|| CodecError::UndefinedValue {
            type_name: E::NAME.to_string(),
            value: raw,
        })
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("slots", &self.len())
            .field("cache_limit", &self.config.cache_limit)
            .field("overrides", &self.config.types.len())
            .finish()
    }
}

// =============================================================================
// Process-wide registry
// =============================================================================

static GLOBAL: OnceLock<CodecRegistry> = OnceLock::new();

/// Process-wide registry used by the serde adapter.
///
/// Initialized with defaults on first use unless [`install`] ran first.
pub fn registry() -> &'static CodecRegistry {
    GLOBAL.get_or_init(CodecRegistry::new)
}

/// Make `registry` the process-wide registry.
///
/// Returns it back if the process-wide registry was already initialized.
pub fn install(registry: CodecRegistry) -> Result<(), CodecRegistry> {
    GLOBAL.set(registry)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::descriptor::VariantDef;
    use crate::naming::NamingPolicy;
    use crate::numeric::IntWidth;
    use crate::strategy::Strategy;

    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Color {
        Red,
        DarkBlue,
    }

    impl WireEnum for Color {
        const NAME: &'static str = "Color";

        fn descriptor() -> Result<EnumDescriptor, CodecError> {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            EnumDescriptor::build(
                Self::NAME,
                IntWidth::I32,
                false,
                &[VariantDef::new(0, "Red"), VariantDef::new(1, "DarkBlue")],
            )
        }

        fn config() -> CodecConfig {
            CodecConfig::new(Strategy::StringByName).with_naming(NamingPolicy::SnakeLower)
        }

        fn to_raw(&self) -> u64 {
            *self as u64
        }

        fn from_raw(raw: u64) -> Option<Self> {
            match raw {
                0 => Some(Self::Red),
                1 => Some(Self::DarkBlue),
                _ => None,
            }
        }
    }

    #[test]
    fn slot_is_reused() {
        let registry = CodecRegistry::new();
        let a = registry.slot::<Color>().unwrap();
        let b = registry.slot::<Color>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_first_use_installs_one_slot() {
        let registry = CodecRegistry::new();
        let slots: Vec<Arc<TypeSlot>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| registry.slot::<Color>().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for slot in &slots[1..] {
            assert!(Arc::ptr_eq(&slots[0], slot));
        }
        assert_eq!(registry.len(), 1);
        assert!(BUILDS.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn typed_round_trip_uses_declared_config() {
        let registry = CodecRegistry::new();
        let token = registry.encode(&Color::DarkBlue).unwrap();
        assert_eq!(token, WireToken::String("dark_blue".into()));
        assert_eq!(registry.decode::<Color>(&token).unwrap(), Color::DarkBlue);
    }

    #[test]
    fn overrides_layer_over_declared_config() {
        let config: WireConfig = r#"
            [defaults]
            naming = "kebab_upper"

            [types.Color]
            strategy = "numeric"
        "#
        .parse()
        .unwrap();
        let registry = CodecRegistry::from_config(config);

        let effective = registry.config_for::<Color>();
        assert_eq!(effective.strategy, Strategy::Numeric);
        assert_eq!(effective.naming, NamingPolicy::KebabUpper);
        assert_eq!(
            registry.encode(&Color::DarkBlue).unwrap(),
            WireToken::Number(1i64.into())
        );
    }

    #[test]
    fn codec_with_shares_slot_caches() {
        let registry = CodecRegistry::new();
        let by_name = registry.codec::<Color>().unwrap();
        let camel = registry
            .codec_with::<Color>(CodecConfig::default().with_naming(NamingPolicy::CamelCase))
            .unwrap();

        assert_eq!(&*by_name.resolve_single(1).unwrap(), "dark_blue");
        assert_eq!(&*camel.resolve_single(1).unwrap(), "darkBlue");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn decode_outside_rust_type_is_undefined() {
        let registry = CodecRegistry::new();
        let config = CodecConfig::new(Strategy::Numeric);
        let codec = registry.codec_with::<Color>(config).unwrap();
        assert_eq!(codec.decode(&WireToken::Number(7u64.into())).unwrap(), 7);

        let registry =
            CodecRegistry::from_config("[types.Color]\nstrategy = \"numeric\"".parse().unwrap());
        assert!(matches!(
            registry.decode::<Color>(&WireToken::Number(7u64.into())),
            Err(CodecError::UndefinedValue { value: 7, .. })
        ));
    }
}
