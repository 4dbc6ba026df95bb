//! Lookup cache: bounded, add-only maps with lock-free reads.
//!
//! Each map is an immutable snapshot behind an [`ArcSwap`]. Readers load the
//! current snapshot without blocking; writers publish a copy with one more
//! entry through a compare-and-swap loop. Entries are never updated or
//! removed, so a key maps to the same value for the life of the cache.
//!
//! Growth is capped by a soft limit: once a map holds `limit` entries, new
//! results are returned to the caller but not stored, and later lookups for
//! the same key recompute.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;

use crate::resolver::Comparison;

/// Default soft limit per map.
pub const DEFAULT_CACHE_LIMIT: usize = 128;

/// Add-only concurrent map with a soft size limit.
pub struct SoftCache<K, V> {
    entries: ArcSwap<FxHashMap<K, V>>,
    limit: usize,
    saturated: AtomicBool,
}

impl<K, V> SoftCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(limit: usize) -> Self {
        Self {
            entries: ArcSwap::from_pointee(FxHashMap::default()),
            limit,
            saturated: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.load().get(key).cloned()
    }

    /// Publish an entry unless the key is present or the limit is reached.
    ///
    /// Returns `true` if this call stored the entry. Losing a race to another
    /// writer for the same key is a no-op.
    pub fn insert(&self, key: K, value: V) -> bool {
        if self.saturated.load(Ordering::Acquire) {
            return false;
        }

        let mut inserted = false;
        let mut full = false;
        self.entries.rcu(|current| {
            inserted = false;
            full = false;
            if current.contains_key(&key) {
                return Arc::clone(current);
            }
            if current.len() >= self.limit {
                full = true;
                return Arc::clone(current);
            }
            let mut next = (**current).clone();
            next.insert(key.clone(), value.clone());
            inserted = true;
            Arc::new(next)
        });

        if full && !self.saturated.swap(true, Ordering::AcqRel) {
            tracing::debug!(
                limit = self.limit,
                "lookup cache reached its soft limit; further entries are computed uncached"
            );
        }
        inserted
    }

    /// Cached value for `key`, computing and publishing it on a miss.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether an insert has been refused for lack of room.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.saturated.load(Ordering::Acquire)
    }
}

impl<K, V> std::fmt::Debug for SoftCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftCache")
            .field("len", &self.entries.load().len())
            .field("limit", &self.limit)
            .field("saturated", &self.saturated.load(Ordering::Relaxed))
            .finish()
    }
}

/// Forward (value → text) and reverse (text → value) caches for one name style.
#[derive(Debug)]
pub struct LookupCache {
    names: SoftCache<u64, Arc<str>>,
    /// One reverse map per comparison, keyed by folded text.
    values: [SoftCache<Box<str>, u64>; Comparison::COUNT],
}

impl LookupCache {
    pub fn new(limit: usize) -> Self {
        Self {
            names: SoftCache::new(limit),
            values: [SoftCache::new(limit), SoftCache::new(limit)],
        }
    }

    /// Forward lookup. `compute` returning `None` (undeclared value) is not cached.
    pub fn get_or_compute(
        &self,
        value: u64,
        compute: impl FnOnce() -> Option<Arc<str>>,
    ) -> Option<Arc<str>> {
        if let Some(name) = self.names.get(&value) {
            return Some(name);
        }
        let name = compute()?;
        self.names.insert(value, Arc::clone(&name));
        Some(name)
    }

    /// Reverse lookup. Misses are not cached.
    pub fn get_or_compute_reverse(
        &self,
        text: &str,
        comparison: Comparison,
        compute: impl FnOnce() -> Option<u64>,
    ) -> Option<u64> {
        let map = &self.values[comparison.index()];
        let key = comparison.fold(text);
        if let Some(value) = map.get::<str>(&key) {
            return Some(value);
        }
        let value = compute()?;
        map.insert(key.into_owned().into_boxed_str(), value);
        Some(value)
    }

    #[inline]
    pub fn names(&self) -> &SoftCache<u64, Arc<str>> {
        &self.names
    }

    #[inline]
    pub fn values(&self, comparison: Comparison) -> &SoftCache<Box<str>, u64> {
        &self.values[comparison.index()]
    }
}

// =============================================================================
// Tests
// =============================================================================
