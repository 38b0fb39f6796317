//! Permanent memoizing cache from integer id to foreign address

use dashmap::DashMap;
use zzrust_sdk::Address;

/// Id → address cache for static reference data
///
/// Only non-null results are stored; a miss goes back to the client on every
/// call. Entries are never evicted or refreshed.
pub struct LookupCache {
    name: &'static str,
    entries: DashMap<i32, Address>,
}

impl LookupCache {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: DashMap::new(),
        }
    }

    /// Cached address for `key` without touching the client
    pub fn get(&self, key: i32) -> Option<Address> {
        self.entries.get(&key).map(|entry| *entry)
    }

    /// Cached address for `key`, calling `fetch` on a miss
    ///
    /// `fetch` must run in the owner context.
    pub fn lookup_with<F>(&self, key: i32, fetch: F) -> Option<Address>
    where
        F: FnOnce() -> Address,
    {
        if let Some(address) = self.get(key) {
            return Some(address);
        }

        let Some(address) = fetch().non_null() else {
            tracing::trace!("{} cache miss for {}", self.name, key);
            return None;
        };

        // A concurrent fill for the same key keeps the first address
        let cached = *self.entries.entry(key).or_insert(address);
        tracing::debug!("{} cache filled: {} -> {}", self.name, key, cached);
        Some(cached)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_miss_is_not_cached() {
        let cache = LookupCache::new("test");
        let calls = Cell::new(0);

        let found = cache.lookup_with(1, || {
            calls.set(calls.get() + 1);
            Address::NULL
        });
        assert_eq!(found, None);
        assert!(cache.is_empty());

        let found = cache.lookup_with(1, || {
            calls.set(calls.get() + 1);
            Address::new(0x4000)
        });
        assert_eq!(found, Some(Address::new(0x4000)));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_hit_skips_fetch() {
        let cache = LookupCache::new("test");
        cache.lookup_with(8, || Address::new(0x8000));

        let found = cache.lookup_with(8, || panic!("fetch on a cached key"));
        assert_eq!(found, Some(Address::new(0x8000)));
        assert_eq!(cache.get(8), Some(Address::new(0x8000)));
        assert_eq!(cache.len(), 1);
    }
}
