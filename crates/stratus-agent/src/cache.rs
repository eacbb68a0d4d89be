//! Per-session response cache for tool results.
//!
//! Memoizes successful results by key for the lifetime of one session. There
//! is no eviction and no size bound; cardinality is bounded by the distinct
//! inputs asked during a session. Failed computations are never stored, so a
//! later request for the same key retries the external call.
//!
//! The cache is owned by a single session and mutated through `&mut self`;
//! it needs no locking.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

/// Hit/miss counters, reported in debug logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizing map from key to computed value.
#[derive(Debug)]
pub struct ResponseCache<K, V> {
    entries: HashMap<K, V>,
    stats: CacheStats,
}

impl<K, V> ResponseCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Return the stored value for `key`, or run `compute` and store its
    /// `Ok` result.
    ///
    /// `compute` runs at most once per call and never for a key that is
    /// already stored. An `Err` is passed through and leaves the cache
    /// unchanged.
    pub async fn get_or_compute<F, Fut, E>(&mut self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Ok(value.clone());
        }

        self.stats.misses += 1;
        let value = compute().await?;
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    /// Peek at a stored value without touching the counters.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for ResponseCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
