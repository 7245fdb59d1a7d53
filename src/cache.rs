//! Key/value memoisation cache
//!
//! Values are computed lazily on first access and held until invalidated.
//! There is no eviction and no TTL. The computation runs outside the lock, so
//! two threads missing the same key at once may both compute; the first value
//! stored wins and both callers receive it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Thread-safe memoisation cache keyed by string
pub struct Cache<V> {
    entries: Mutex<HashMap<String, V>>,
}

impl<V: Clone> Cache<V> {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached value for `key`, computing and storing it on a miss
    pub fn get_or_set<F>(&self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.entries().get(key) {
            debug!("Cache hit for key: {}", key);
            return value.clone();
        }

        debug!("Cache miss for key: {}", key);
        let value = compute();
        self.entries()
            .entry(key.to_string())
            .or_insert(value)
            .clone()
    }

    /// Drop one key, or every key when `key` is `None`
    pub fn invalidate(&self, key: Option<&str>) {
        let mut entries = self.entries();
        match key {
            Some(key) => {
                entries.remove(key);
                debug!("Invalidated cache key: {}", key);
            }
            None => {
                entries.clear();
                debug!("Invalidated all cache keys");
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl<V: Clone> Default for Cache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap `f` so its results are memoised in `cache` under `key_fn(&args)`
///
/// Functions of several arguments take them as a tuple.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use web3_utils::cache::{cache_result, Cache};
///
/// let cache = Arc::new(Cache::new());
/// let add = cache_result(cache.clone(), |(x, y): &(u32, u32)| format!("add_{}_{}", x, y), |(x, y): (u32, u32)| x + y);
///
/// assert_eq!(add((1, 2)), 3);
/// assert!(cache.contains("add_1_2"));
/// ```
pub fn cache_result<A, V, K, F>(cache: Arc<Cache<V>>, key_fn: K, f: F) -> impl Fn(A) -> V
where
    V: Clone,
    K: Fn(&A) -> String,
    F: Fn(A) -> V,
{
    move |args: A| {
        let key = key_fn(&args);
        cache.get_or_set(&key, || f(args))
    }
}
