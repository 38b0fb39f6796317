//! Reference data lookup caches
//!
//! The client keeps item and quest definitions in static tables whose rows do
//! not move for the lifetime of the process. [`ItemCache`] and [`QuestCache`]
//! remember every row address they resolve.
//!
//! Methods taking an engine talk to the client and must run in the owner
//! context; the object manager marshals them there.

mod lookup;

pub use lookup::LookupCache;

use zzrust_engine::{AddressSpace, AddressSpaceExt, ForeignFunctions};
use zzrust_sdk::{Address, ItemCacheEntry, ItemCacheLookupType};

/// Item definition rows
pub struct ItemCache {
    rows: LookupCache,
}

impl Default for ItemCache {
    fn default() -> Self {
        Self {
            rows: LookupCache::new("Item"),
        }
    }
}

impl ItemCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached row address, no client call
    pub fn cached(&self, item_id: i32) -> Option<Address> {
        self.rows.get(item_id)
    }

    /// Row address of `item_id`
    ///
    /// Rows are keyed by id only; the lookup type is passed through on a miss.
    pub fn address(
        &self,
        functions: &dyn ForeignFunctions,
        item_id: i32,
        lookup: ItemCacheLookupType,
    ) -> Option<Address> {
        self.rows
            .lookup_with(item_id, || functions.item_cache_row(item_id, lookup))
    }

    /// Copy of the full row of `item_id`
    pub fn entry(
        &self,
        memory: &dyn AddressSpace,
        functions: &dyn ForeignFunctions,
        item_id: i32,
        lookup: ItemCacheLookupType,
    ) -> Option<ItemCacheEntry> {
        let address = self.address(functions, item_id, lookup)?;
        match memory.read::<ItemCacheEntry>(address) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Failed to read item cache row {} at {}: {}", item_id, address, e);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Quest definition rows
pub struct QuestCache {
    rows: LookupCache,
}

impl Default for QuestCache {
    fn default() -> Self {
        Self {
            rows: LookupCache::new("Quest"),
        }
    }
}

impl QuestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached row address, no client call
    pub fn cached(&self, quest_id: i32) -> Option<Address> {
        self.rows.get(quest_id)
    }

    /// Row address of `quest_id`
    pub fn address(&self, functions: &dyn ForeignFunctions, quest_id: i32) -> Option<Address> {
        self.rows
            .lookup_with(quest_id, || functions.quest_cache_row(quest_id))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProcess;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_item_lookup_scenario() {
        let process = FakeProcess::new();
        let cache = ItemCache::new();

        assert_eq!(cache.address(&*process, 500, ItemCacheLookupType::None), None);
        assert!(cache.is_empty());

        process.set_item_row(500, 0xA000);
        assert_eq!(
            cache.address(&*process, 500, ItemCacheLookupType::None),
            Some(Address::new(0xA000))
        );
        assert_eq!(process.item_calls.load(Ordering::SeqCst), 2);

        // Even if the client would now answer differently, the hit wins
        process.set_item_row(500, 0xB000);
        assert_eq!(
            cache.address(&*process, 500, ItemCacheLookupType::Rec),
            Some(Address::new(0xA000))
        );
        assert_eq!(process.item_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_item_entry_is_a_copy() {
        let process = FakeProcess::new();
        let cache = ItemCache::new();

        let mut row = ItemCacheEntry {
            id: 2589,
            stackable: 20,
            ..Default::default()
        };
        process.write(0xC000, row);
        process.set_item_row(2589, 0xC000);

        let entry = cache
            .entry(&*process, &*process, 2589, ItemCacheLookupType::None)
            .unwrap();
        assert_eq!(entry.id, 2589);
        assert_eq!(entry.stackable, 20);

        row.stackable = 1;
        process.write(0xC000, row);
        assert_eq!(entry.stackable, 20);
    }

    #[test]
    fn test_quest_lookup() {
        let process = FakeProcess::new();
        let cache = QuestCache::new();
        process.set_quest_row(33, 0xD000);

        assert_eq!(cache.address(&*process, 33), Some(Address::new(0xD000)));
        assert_eq!(cache.address(&*process, 33), Some(Address::new(0xD000)));
        assert_eq!(cache.cached(33), Some(Address::new(0xD000)));
        assert_eq!(process.quest_calls.load(Ordering::SeqCst), 1);
    }
}
