//! In-process TTL cache for snapshot and greeks lookups.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Maps string keys to values that expire `ttl` after insertion.
/// Expired entries are evicted lazily on read.
pub struct TtlCache<V> {
    ttl: Duration,
    store: Mutex<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> TtlCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            store: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value if it has not expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let mut store = self.store.lock();
        match store.get(key) {
            Some((inserted, value)) if inserted.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                store.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.store.lock().insert(key.into(), (Instant::now(), value));
    }
}
