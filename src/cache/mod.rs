//! Keyed in-memory stores for provider state
//!
//! Two flavors exist: a TTL cache for sessions (entries expire by age but
//! are never evicted on failed refresh) and a replace-on-rebuild cache for
//! channel directories and EPG batches (always rebuilt in full, never
//! partially updated). Writers replace entries atomically; readers clone the
//! stored value out of the lock.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::RwLock;

struct TtlEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Keyed cache whose entries go stale after a fixed age
///
/// `get` returns only fresh entries. Stale entries stay in the map until a
/// successful `insert` replaces them, so a failed refresh leaves the cache
/// unchanged.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, TtlEntry<V>>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if Utc::now() - entry.stored_at < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            TtlEntry {
                value,
                stored_at: Utc::now(),
            },
        );
    }
}

/// Keyed cache with full-replace semantics and no expiry
///
/// Holds the last successfully built value per key; a failed rebuild never
/// touches the stored entry, so the last known-good state keeps being
/// served.
pub struct ReplaceCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone> ReplaceCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn replace(&self, key: K, value: V) {
        self.entries.write().await.insert(key, value);
    }
}

impl<K: Eq + Hash, V: Clone> Default for ReplaceCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
