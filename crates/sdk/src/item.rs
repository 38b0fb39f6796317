//! Item cache row layout
//!
//! The client keeps a database cache of item templates. A row is looked up by
//! item id and stays at the same address for the lifetime of the process.
//!
//! ```text
//! ItemCacheEntry (0x70 bytes read)
//! ├── +0x00: id
//! ├── +0x04: class
//! ├── +0x08: sub_class
//! ├── +0x0C: unknown
//! ├── +0x10: name (char*, 4 names follow)
//! ├── +0x20: display_id
//! ├── +0x24: quality
//! ├── +0x28: flags
//! ├── +0x2C: buy_price
//! ├── +0x30: sell_price
//! ├── +0x34: inventory_type
//! └── ...
//! ```

/// How the client should satisfy an item cache request
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemCacheLookupType {
    /// Only return rows already present in the cache
    #[default]
    None = 0,
    /// Request the row from the server when it is missing
    Rec = 1,
}

/// Copy of one row of the client's item cache
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemCacheEntry {
    pub id: i32,
    pub class: i32,
    pub sub_class: i32,
    pub unknown0: i32,
    /// Pointers to up to four localized names
    pub name_ptrs: [u32; 4],
    pub display_id: i32,
    pub quality: i32,
    pub flags: i32,
    pub buy_price: i32,
    pub sell_price: i32,
    pub inventory_type: i32,
    pub allowable_class: i32,
    pub allowable_race: i32,
    pub item_level: i32,
    pub required_level: i32,
    pub required_skill: i32,
    pub required_skill_rank: i32,
    pub required_spell: i32,
    pub required_honor_rank: i32,
    pub required_city_rank: i32,
    pub required_reputation_faction: i32,
    pub required_reputation_rank: i32,
    pub max_count: i32,
    pub stackable: i32,
    pub container_slots: i32,
}

impl ItemCacheEntry {
    /// Pointer to the primary (first) name string
    pub fn name_ptr(&self) -> u32 {
        self.name_ptrs[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_size() {
        assert_eq!(std::mem::size_of::<ItemCacheEntry>(), 0x70);
    }
}
