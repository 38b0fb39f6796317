//! Fake client process for unit tests
//!
//! Memory is a sparse byte map: any byte never written reads as unmapped.
//! Objects get their descriptor block at `address + DESCRIPTOR_GAP`.

use std::collections::HashMap;
use std::mem::size_of;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use zzrust_engine::{
    AddressSpace, Engine, ForeignFunctions, ReadError, ScriptHost, CALLBACK_PROCESSED,
};
use zzrust_sdk::{Address, Guid, ItemCacheLookupType, ObjectType, Plain};

use crate::config::MirrorConfig;
use crate::events::EventBus;
use crate::gamedata::Offsets;
use crate::manager::ObjectManager;
use crate::tasks::MainThread;

/// Quest call the mirror made through the foreign functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuestCommand {
    Accept,
    Complete,
}

/// Distance between an object and its descriptor block
pub(crate) const DESCRIPTOR_GAP: usize = 0x1000;

#[derive(Default)]
pub(crate) struct FakeProcess {
    memory: Mutex<HashMap<usize, u8>>,
    visible: Mutex<Vec<Guid>>,
    addresses: Mutex<HashMap<Guid, usize>>,
    player_guid: AtomicU64,
    item_rows: Mutex<HashMap<i32, usize>>,
    quest_rows: Mutex<HashMap<i32, usize>>,
    executed: Mutex<Vec<String>>,
    callback_results: Mutex<Vec<i32>>,
    quest_commands: Mutex<Vec<(QuestCommand, Guid, i32)>>,
    enumeration_hook: Mutex<Option<Box<dyn FnOnce() + Send>>>,
    pub(crate) enum_calls: AtomicUsize,
    pub(crate) item_calls: AtomicUsize,
    pub(crate) quest_calls: AtomicUsize,
}

impl FakeProcess {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn engine(self: &Arc<Self>) -> Engine {
        Engine::new(self.clone(), self.clone(), self.clone())
    }

    pub(crate) fn write<T: Plain>(&self, address: usize, value: T) {
        // SAFETY: `T: Plain` has no padding-sensitive invariants; we only copy its bytes
        let bytes = unsafe {
            std::slice::from_raw_parts(&value as *const T as *const u8, size_of::<T>())
        };
        let mut memory = self.memory.lock();
        for (i, byte) in bytes.iter().enumerate() {
            memory.insert(address + i, *byte);
        }
    }

    pub(crate) fn write_str(&self, address: usize, text: &str) {
        let mut memory = self.memory.lock();
        for (i, byte) in text.bytes().chain(std::iter::once(0)).enumerate() {
            memory.insert(address + i, byte);
        }
    }

    pub(crate) fn set_player(&self, guid: Guid) {
        self.player_guid.store(guid, Ordering::SeqCst);
    }

    pub(crate) fn set_in_game(&self, offsets: &Offsets, in_game: bool) {
        self.write(offsets.in_game_flag, u8::from(in_game));
    }

    pub(crate) fn set_address(&self, guid: Guid, address: usize) {
        self.addresses.lock().insert(guid, address);
    }

    pub(crate) fn remove_address(&self, guid: Guid) {
        self.addresses.lock().remove(&guid);
    }

    pub(crate) fn set_visible(&self, guids: &[Guid]) {
        *self.visible.lock() = guids.to_vec();
    }

    /// Place an object in memory, make it resolvable and visible
    pub(crate) fn add_object(
        &self,
        offsets: &Offsets,
        guid: Guid,
        address: usize,
        object_type: ObjectType,
    ) {
        self.write(address + offsets.object_type, object_type as u8);
        self.write(address + offsets.descriptors, Address::new(address + DESCRIPTOR_GAP));
        self.write(address + DESCRIPTOR_GAP + offsets.summoned_by, 0u64);
        self.write(address + DESCRIPTOR_GAP + offsets.target_guid, 0u64);
        self.set_address(guid, address);

        let mut visible = self.visible.lock();
        if !visible.contains(&guid) {
            visible.push(guid);
        }
    }

    /// Place a unit summoned by `summoned_by`
    pub(crate) fn add_unit(&self, offsets: &Offsets, guid: Guid, address: usize, summoned_by: Guid) {
        self.add_object(offsets, guid, address, ObjectType::Unit);
        self.write(address + DESCRIPTOR_GAP + offsets.summoned_by, summoned_by);
    }

    /// Run `hook` inside the next enumeration, before any object is reported
    pub(crate) fn on_next_enumeration(&self, hook: impl FnOnce() + Send + 'static) {
        *self.enumeration_hook.lock() = Some(Box::new(hook));
    }

    pub(crate) fn set_item_row(&self, item_id: i32, address: usize) {
        self.item_rows.lock().insert(item_id, address);
    }

    pub(crate) fn set_quest_row(&self, quest_id: i32, address: usize) {
        self.quest_rows.lock().insert(quest_id, address);
    }

    pub(crate) fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }

    /// Quest accept and complete calls, in call order
    pub(crate) fn quest_commands(&self) -> Vec<(QuestCommand, Guid, i32)> {
        self.quest_commands.lock().clone()
    }

    /// Values the mirror returned from the enumeration callback, last pass only
    pub(crate) fn callback_results(&self) -> Vec<i32> {
        self.callback_results.lock().clone()
    }
}

impl AddressSpace for FakeProcess {
    fn read_bytes(&self, address: Address, buf: &mut [u8]) -> Result<(), ReadError> {
        if address.is_null() {
            return Err(ReadError::NullAddress);
        }
        let len = buf.len();
        let memory = self.memory.lock();
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = *memory
                .get(&(address.raw() + i))
                .ok_or(ReadError::Unmapped { address, len })?;
        }
        Ok(())
    }
}

impl ForeignFunctions for FakeProcess {
    fn local_player_guid(&self) -> Guid {
        self.player_guid.load(Ordering::SeqCst)
    }

    fn object_address(&self, guid: Guid) -> Address {
        self.addresses
            .lock()
            .get(&guid)
            .map_or(Address::NULL, |raw| Address::new(*raw))
    }

    fn enum_visible_objects(&self, filter: i32, callback: &mut dyn FnMut(i32, Guid) -> i32) {
        self.enum_calls.fetch_add(1, Ordering::SeqCst);
        let hook = self.enumeration_hook.lock().take();
        if let Some(hook) = hook {
            hook();
        }
        let visible = self.visible.lock().clone();
        let results: Vec<i32> = visible.into_iter().map(|guid| callback(filter, guid)).collect();
        debug_assert!(results.iter().all(|r| *r <= CALLBACK_PROCESSED));
        *self.callback_results.lock() = results;
    }

    fn item_cache_row(&self, item_id: i32, _lookup: ItemCacheLookupType) -> Address {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        self.item_rows
            .lock()
            .get(&item_id)
            .map_or(Address::NULL, |raw| Address::new(*raw))
    }

    fn quest_cache_row(&self, quest_id: i32) -> Address {
        self.quest_calls.fetch_add(1, Ordering::SeqCst);
        self.quest_rows
            .lock()
            .get(&quest_id)
            .map_or(Address::NULL, |raw| Address::new(*raw))
    }

    fn accept_quest(&self, npc_guid: Guid, quest_id: i32) {
        self.quest_commands
            .lock()
            .push((QuestCommand::Accept, npc_guid, quest_id));
    }

    fn complete_quest(&self, npc_guid: Guid, quest_id: i32) {
        self.quest_commands
            .lock()
            .push((QuestCommand::Complete, npc_guid, quest_id));
    }
}

impl ScriptHost for FakeProcess {
    fn execute(&self, command: &str) {
        self.executed.lock().push(command.to_string());
    }
}

/// Manager owned by the calling thread, in the world with player guid 1 at 0x10000
pub(crate) fn in_world() -> (Arc<FakeProcess>, ObjectManager) {
    let process = FakeProcess::new();
    let offsets = Offsets::default();
    process.set_in_game(&offsets, true);
    process.set_player(1);
    process.add_object(&offsets, 1, 0x10000, ObjectType::Player);

    let manager = ObjectManager::new(
        process.engine(),
        MainThread::bind_current(),
        Arc::new(EventBus::new()),
        MirrorConfig::default(),
        offsets,
    );
    (process, manager)
}
