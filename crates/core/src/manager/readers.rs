//! Public read surface of the object manager
//!
//! Snapshot readers copy an `Arc` under the view lock and never touch the
//! client. Readers that need a live value (target, party slots, lookups)
//! marshal that single read to the owner thread and block until it ran.

use std::sync::Arc;

use zzrust_engine::{AddressSpace, AddressSpaceExt, ReadError};
use zzrust_sdk::{Address, Guid, ItemCacheEntry, ItemCacheLookupType};

use super::ObjectManager;
use crate::gamedata::Offsets;
use crate::objects::{KindFilter, LocalPet, LocalPlayer, MirroredObject, ObjectSnapshot};
use crate::refresh::{QuestLog, SpellBook};
use crate::tasks::DispatchError;

impl ObjectManager {
    /// The latest published snapshot
    pub fn snapshot(&self) -> ObjectSnapshot {
        self.inner.view.read().snapshot.clone()
    }

    /// Every mirrored object
    pub fn objects(&self) -> Vec<Arc<MirroredObject>> {
        self.snapshot().as_slice().to_vec()
    }

    /// Npcs and players
    pub fn units(&self) -> Vec<Arc<MirroredObject>> {
        self.snapshot().filtered(KindFilter::UNITS)
    }

    pub fn players(&self) -> Vec<Arc<MirroredObject>> {
        self.snapshot().filtered(KindFilter::PLAYER)
    }

    pub fn npcs(&self) -> Vec<Arc<MirroredObject>> {
        self.snapshot().filtered(KindFilter::UNIT)
    }

    pub fn game_objects(&self) -> Vec<Arc<MirroredObject>> {
        self.snapshot().filtered(KindFilter::GAME_OBJECT)
    }

    /// Items and containers
    pub fn items(&self) -> Vec<Arc<MirroredObject>> {
        self.snapshot().filtered(KindFilter::ITEMS)
    }

    /// The local player, `None` before the first cycle or after a disconnect
    pub fn player(&self) -> Option<LocalPlayer> {
        self.inner.view.read().player.clone()
    }

    /// The local player's pet, kept until a different one is seen
    pub fn pet(&self) -> Option<LocalPet> {
        self.inner.view.read().pet.clone()
    }

    /// Spell book as of the last refresh
    pub fn spells(&self) -> Arc<SpellBook> {
        Arc::clone(&self.inner.view.read().spells)
    }

    /// Quest log as of the last refresh
    pub fn quest_log(&self) -> Arc<QuestLog> {
        Arc::clone(&self.inner.view.read().quests)
    }

    /// Whether the mirror is usable
    ///
    /// Requires an open gate, a successful last cycle and the client's
    /// in-game flag.
    pub fn is_ready(&self) -> bool {
        if !self.inner.gate.is_open() || !self.inner.gate.last_cycle_ok() {
            return false;
        }
        let inner = Arc::clone(&self.inner);
        self.inner
            .main_thread
            .invoke(move || inner.in_game())
            .unwrap_or(false)
    }

    /// Run a read against the client on the owner thread
    pub fn read_live<F, R>(&self, read: F) -> Result<R, DispatchError>
    where
        F: FnOnce(&dyn AddressSpace, &Offsets) -> R + Send + 'static,
        R: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        self.inner
            .main_thread
            .invoke(move || read(inner.engine.memory(), &inner.offsets))
    }

    /// Object with `guid` in the latest snapshot
    pub fn find(&self, guid: Guid) -> Option<Arc<MirroredObject>> {
        if guid == 0 {
            return None;
        }
        self.snapshot().find(guid).cloned()
    }

    /// The unit the local player has targeted
    pub fn target(&self) -> Option<Arc<MirroredObject>> {
        if !self.inner.gate.is_open() {
            return None;
        }
        let player = self.player()?;
        let guid = self.live_guid(move |memory, offsets| player.target_guid(memory, offsets))?;
        self.find(guid)
    }

    pub fn party_leader(&self) -> Option<Arc<MirroredObject>> {
        self.party_slot(0)
    }

    /// Party member `1..=4`
    pub fn party_member(&self, slot: usize) -> Option<Arc<MirroredObject>> {
        if slot == 0 {
            return None;
        }
        self.party_slot(slot)
    }

    pub fn party1(&self) -> Option<Arc<MirroredObject>> {
        self.party_member(1)
    }

    pub fn party2(&self) -> Option<Arc<MirroredObject>> {
        self.party_member(2)
    }

    pub fn party3(&self) -> Option<Arc<MirroredObject>> {
        self.party_member(3)
    }

    pub fn party4(&self) -> Option<Arc<MirroredObject>> {
        self.party_member(4)
    }

    fn party_slot(&self, slot: usize) -> Option<Arc<MirroredObject>> {
        let address = Address::new(self.inner.offsets.party_guid(slot)?);
        let guid = self.live_guid(move |memory, _| memory.read::<u64>(address))?;
        self.find(guid)
    }

    /// Marshal a guid read, folding every failure into `None`
    fn live_guid<F>(&self, read: F) -> Option<Guid>
    where
        F: FnOnce(&dyn AddressSpace, &Offsets) -> Result<Guid, ReadError> + Send + 'static,
    {
        match self.read_live(read) {
            Ok(Ok(guid)) => Some(guid),
            Ok(Err(e)) => {
                tracing::debug!("Guid read failed: {}", e);
                None
            }
            Err(e) => {
                tracing::error!("Failed to dispatch guid read: {}", e);
                None
            }
        }
    }

    /// Copy of the item cache row for `item_id`
    pub fn lookup_item_entry(
        &self,
        item_id: i32,
        lookup: ItemCacheLookupType,
    ) -> Option<ItemCacheEntry> {
        let inner = Arc::clone(&self.inner);
        self.inner
            .main_thread
            .invoke(move || {
                inner.items.entry(
                    inner.engine.memory(),
                    inner.engine.functions(),
                    item_id,
                    lookup,
                )
            })
            .unwrap_or_else(|e| {
                tracing::error!("Failed to dispatch item lookup: {}", e);
                None
            })
    }

    /// Address of the item cache row for `item_id`
    pub fn lookup_item_address(
        &self,
        item_id: i32,
        lookup: ItemCacheLookupType,
    ) -> Option<Address> {
        if let Some(address) = self.inner.items.cached(item_id) {
            return Some(address);
        }
        let inner = Arc::clone(&self.inner);
        self.inner
            .main_thread
            .invoke(move || inner.items.address(inner.engine.functions(), item_id, lookup))
            .unwrap_or_else(|e| {
                tracing::error!("Failed to dispatch item lookup: {}", e);
                None
            })
    }

    /// Address of the quest cache row for `quest_id`
    pub fn lookup_quest_address(&self, quest_id: i32) -> Option<Address> {
        if let Some(address) = self.inner.quests.cached(quest_id) {
            return Some(address);
        }
        let inner = Arc::clone(&self.inner);
        self.inner
            .main_thread
            .invoke(move || inner.quests.address(inner.engine.functions(), quest_id))
            .unwrap_or_else(|e| {
                tracing::error!("Failed to dispatch quest lookup: {}", e);
                None
            })
    }

    /// Run a command in the client's scripting layer and wait until it was sent
    pub fn execute_script(&self, command: impl Into<String>) {
        let command = command.into();
        let inner = Arc::clone(&self.inner);
        if let Err(e) = self
            .inner
            .main_thread
            .invoke(move || inner.engine.scripts().execute(&command))
        {
            tracing::error!("Failed to dispatch script command: {}", e);
        }
    }

    /// Accept `quest_id` offered by `npc_guid` and wait until it was sent
    pub fn accept_quest(&self, npc_guid: Guid, quest_id: i32) {
        let inner = Arc::clone(&self.inner);
        if let Err(e) = self
            .inner
            .main_thread
            .invoke(move || inner.engine.functions().accept_quest(npc_guid, quest_id))
        {
            tracing::error!("Failed to dispatch quest accept: {}", e);
        }
    }

    /// Turn in `quest_id` at `npc_guid` and wait until it was sent
    pub fn complete_quest(&self, npc_guid: Guid, quest_id: i32) {
        let inner = Arc::clone(&self.inner);
        if let Err(e) = self
            .inner
            .main_thread
            .invoke(move || inner.engine.functions().complete_quest(npc_guid, quest_id))
        {
            tracing::error!("Failed to dispatch quest completion: {}", e);
        }
    }

    /// Close the readiness gate and drop the player handle immediately
    ///
    /// A cycle in flight is not interrupted; later cycles are skipped until a
    /// ready event reopens the gate.
    pub fn disconnect(&self) {
        let closed = self.inner.gate.close();
        self.inner.view.write().player = None;
        if closed {
            tracing::info!("Disconnected, object mirror suspended");
        }
    }
}
