//! Foreign function seams
//!
//! The client exposes a handful of native functions the mirror depends on.
//! They are reached through these traits so the core never holds a raw
//! function pointer.

use zzrust_sdk::{Address, Guid, ItemCacheLookupType};

/// Filter value that makes the enumeration report every visible object
pub const NO_FILTER: i32 = -1;

/// Callback return value: the identity was processed
pub const CALLBACK_PROCESSED: i32 = 1;

/// Callback return value: the identity was ignored
pub const CALLBACK_IGNORED: i32 = 0;

/// Native functions of the client process
///
/// Every method must be called from the owner context; implementations do not
/// synchronize on their own.
pub trait ForeignFunctions: Send + Sync {
    /// Identity of the locally controlled player, 0 when not logged in
    fn local_player_guid(&self) -> Guid;

    /// Current address backing `guid`, null when the identity is gone
    fn object_address(&self, guid: Guid) -> Address;

    /// Call `callback(filter, guid)` once per visible object
    ///
    /// Returns only after every callback has completed.
    fn enum_visible_objects(&self, filter: i32, callback: &mut dyn FnMut(i32, Guid) -> i32);

    /// Address of the item cache row for `item_id`, null when missing
    fn item_cache_row(&self, item_id: i32, lookup: ItemCacheLookupType) -> Address;

    /// Address of the quest cache row for `quest_id`, null when missing
    fn quest_cache_row(&self, quest_id: i32) -> Address;

    /// Accept `quest_id` from the npc whose gossip menu is open
    fn accept_quest(&self, npc_guid: Guid, quest_id: i32);

    /// Turn in `quest_id` at the npc whose gossip menu is open
    fn complete_quest(&self, npc_guid: Guid, quest_id: i32);
}

/// The client's scripting layer
pub trait ScriptHost: Send + Sync {
    /// Run a command string; no result is reported back
    fn execute(&self, command: &str);
}
