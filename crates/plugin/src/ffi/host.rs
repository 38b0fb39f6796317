//! Client functions supplied by the native loader
//!
//! The loader resolves the client's native functions and passes their
//! addresses in a [`HostFunctions`] table. [`HostBridge`] adapts that table to
//! the engine traits.

use std::ffi::{c_char, c_int, c_void, CString};

use zzrust_engine::{ForeignFunctions, ScriptHost};
use zzrust_sdk::{Address, Guid, ItemCacheLookupType};

/// Per-object callback handed to the client's enumeration
///
/// `ctx` is passed back untouched.
pub type EnumCallback = unsafe extern "C" fn(ctx: *mut c_void, filter: c_int, guid: u64) -> c_int;

/// Function table filled in by the loader
///
/// Field order is part of the ABI.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HostFunctions {
    pub get_player_guid: unsafe extern "C" fn() -> u64,
    pub get_ptr_for_guid: unsafe extern "C" fn(guid: u64) -> usize,
    pub enum_visible_objects:
        unsafe extern "C" fn(callback: EnumCallback, filter: c_int, ctx: *mut c_void),
    pub item_cache_get_row: unsafe extern "C" fn(item_id: c_int, lookup: c_int) -> usize,
    pub quest_cache_get_row: unsafe extern "C" fn(quest_id: c_int) -> usize,
    pub execute_script: unsafe extern "C" fn(command: *const c_char),
    pub accept_quest: unsafe extern "C" fn(npc_guid: u64, quest_id: c_int),
    pub complete_quest: unsafe extern "C" fn(npc_guid: u64, quest_id: c_int),
}

/// Engine seams backed by the loader's function table
pub struct HostBridge {
    functions: HostFunctions,
}

impl HostBridge {
    /// # Safety
    /// Every entry of `functions` must stay callable for the bridge's lifetime
    /// and only be called from the client's main thread.
    pub unsafe fn new(functions: HostFunctions) -> Self {
        Self { functions }
    }
}

type DynCallback<'a> = &'a mut dyn FnMut(i32, Guid) -> i32;

unsafe extern "C" fn enum_trampoline(ctx: *mut c_void, filter: c_int, guid: u64) -> c_int {
    // SAFETY: `ctx` is the `DynCallback` passed in `enum_visible_objects`, alive
    // for the duration of the enumeration call.
    let callback = &mut *(ctx as *mut DynCallback<'_>);
    callback(filter, guid)
}

impl ForeignFunctions for HostBridge {
    fn local_player_guid(&self) -> Guid {
        unsafe { (self.functions.get_player_guid)() }
    }

    fn object_address(&self, guid: Guid) -> Address {
        Address::new(unsafe { (self.functions.get_ptr_for_guid)(guid) })
    }

    fn enum_visible_objects(&self, filter: i32, callback: &mut dyn FnMut(i32, Guid) -> i32) {
        let mut callback: DynCallback<'_> = callback;
        let ctx = &mut callback as *mut DynCallback<'_> as *mut c_void;
        unsafe { (self.functions.enum_visible_objects)(enum_trampoline, filter, ctx) }
    }

    fn item_cache_row(&self, item_id: i32, lookup: ItemCacheLookupType) -> Address {
        Address::new(unsafe { (self.functions.item_cache_get_row)(item_id, lookup as c_int) })
    }

    fn quest_cache_row(&self, quest_id: i32) -> Address {
        Address::new(unsafe { (self.functions.quest_cache_get_row)(quest_id) })
    }

    fn accept_quest(&self, npc_guid: Guid, quest_id: i32) {
        unsafe { (self.functions.accept_quest)(npc_guid, quest_id) }
    }

    fn complete_quest(&self, npc_guid: Guid, quest_id: i32) {
        unsafe { (self.functions.complete_quest)(npc_guid, quest_id) }
    }
}

impl ScriptHost for HostBridge {
    fn execute(&self, command: &str) {
        match CString::new(command) {
            Ok(command) => unsafe { (self.functions.execute_script)(command.as_ptr()) },
            Err(_) => tracing::warn!("Script command contains a NUL byte, not sent"),
        }
    }
}
