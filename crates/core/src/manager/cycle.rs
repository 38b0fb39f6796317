//! The synchronization cycle
//!
//! Runs on the owner thread once per updater tick:
//!
//! 1. Resolve the local player; abort without mutation when that fails
//! 2. Refresh the quest log and spell book when their cooldowns allow
//! 3. Mark every cached object removable
//! 4. Enumerate visible objects: refresh known ones, construct new ones
//! 5. Sweep objects still marked
//! 6. Publish a new snapshot

use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use zzrust_engine::{AddressSpaceExt, CALLBACK_IGNORED, CALLBACK_PROCESSED, NO_FILTER};
use zzrust_sdk::{Guid, ObjectType};

use super::Inner;
use crate::events::{EventArgs, PLAYER_INIT};
use crate::objects::{
    IdentityResolver, LocalPet, LocalPlayer, MirroredObject, ObjectKind, ObjectSnapshot,
};
use crate::refresh::{QuestLog, SpellBook};

/// Outcome of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// Gate closed or client not in the world; nothing was touched
    Skipped,
    /// The local player could not be resolved; nothing was touched
    NotReady,
    /// A new snapshot was published
    Completed { objects: usize },
}

impl Inner {
    pub(super) fn run_cycle(&self) -> CycleStatus {
        if !self.gate.is_open() || !self.in_game() {
            return CycleStatus::Skipped;
        }

        let status = self.sync();
        self.gate
            .record_cycle(matches!(status, CycleStatus::Completed { .. }));
        status
    }

    fn sync(&self) -> CycleStatus {
        let functions = self.engine.functions();
        let resolver = IdentityResolver::new(functions);

        let player_guid = functions.local_player_guid();
        let Some(player_address) = resolver.resolve(player_guid) else {
            tracing::debug!("Local player not resolvable (guid {:#x})", player_guid);
            return CycleStatus::NotReady;
        };

        let (player, mut pet) = {
            let view = self.view.read();
            (view.player.clone(), view.pet.clone())
        };
        let (player, player_changed) = match player {
            Some(player) if player.guid() == player_guid && player.address() == player_address => {
                (player, false)
            }
            _ => (LocalPlayer::new(player_guid, player_address), true),
        };

        let mut state = self.state.lock();

        let now = Instant::now();
        let quests = if state.quest_refresh.try_fire(now) {
            self.refresh_quests()
        } else {
            None
        };
        let spells = if state.spell_refresh.try_fire(now) {
            self.refresh_spells()
        } else {
            None
        };

        for object in state.objects.values() {
            object.mark_removable();
        }

        let objects = &mut state.objects;
        functions.enum_visible_objects(NO_FILTER, &mut |_filter: i32, guid: Guid| {
            self.on_visible(objects, &resolver, &player, &mut pet, guid)
        });

        let before = state.objects.len();
        state.objects.retain(|_, object| !object.is_removable());
        let evicted = before - state.objects.len();

        state.generation += 1;
        let snapshot =
            ObjectSnapshot::new(state.objects.values().cloned().collect(), state.generation);
        drop(state);

        let count = snapshot.len();
        let installed = {
            let mut view = self.view.write();
            view.snapshot = snapshot;
            // A disconnect during the cycle wins over the handle we resolved
            let installed = self.gate.is_open();
            if installed {
                view.player = Some(player);
            }
            view.pet = pet;
            if let Some(quests) = quests {
                view.quests = quests;
            }
            if let Some(spells) = spells {
                view.spells = spells;
            }
            installed
        };

        if evicted > 0 {
            tracing::debug!("Evicted {} objects", evicted);
        }
        if player_changed && installed {
            tracing::info!("Local player (re)created at {}", player_address);
            self.events.fire(&EventArgs::new(PLAYER_INIT));
        }

        CycleStatus::Completed { objects: count }
    }

    /// Enumeration callback for one visible identity
    fn on_visible(
        &self,
        objects: &mut IndexMap<Guid, Arc<MirroredObject>>,
        resolver: &IdentityResolver<'_>,
        player: &LocalPlayer,
        pet: &mut Option<LocalPet>,
        guid: Guid,
    ) -> i32 {
        if guid == 0 {
            return CALLBACK_IGNORED;
        }
        let Some(address) = resolver.resolve(guid) else {
            tracing::trace!("{:#x} not resolvable this cycle", guid);
            return CALLBACK_IGNORED;
        };

        if let Some(object) = objects.get(&guid) {
            object.refresh(address);
            return CALLBACK_PROCESSED;
        }

        let memory = self.engine.memory();
        let raw_type = match memory.read::<u8>(address.offset(self.offsets.object_type)) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    "Skipping {:#x}: object type unreadable at {}: {}",
                    guid,
                    address,
                    e
                );
                return CALLBACK_IGNORED;
            }
        };
        let Some(kind) = ObjectType::from_raw(raw_type).and_then(ObjectKind::from_object_type)
        else {
            tracing::trace!("{:#x} has untracked type {}", guid, raw_type);
            return CALLBACK_PROCESSED;
        };

        let object = Arc::new(MirroredObject::new(guid, address, kind));
        if kind == ObjectKind::Unit {
            match object.summoned_by(memory, &self.offsets) {
                Ok(owner) if owner == player.guid() => {
                    if pet.as_ref().map(|pet| pet.address()) != Some(address) {
                        tracing::debug!("Local pet bound to {:#x} at {}", guid, address);
                        *pet = Some(LocalPet::new(guid, address));
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::trace!("No summoner for {:#x}: {}", guid, e),
            }
        }

        tracing::trace!("New {:?} {:#x} at {}", kind, guid, address);
        objects.insert(guid, object);
        CALLBACK_PROCESSED
    }

    fn refresh_quests(&self) -> Option<Arc<QuestLog>> {
        match QuestLog::read(
            self.engine.memory(),
            self.engine.functions(),
            &self.offsets,
            &self.quests,
        ) {
            Ok(log) => Some(Arc::new(log)),
            Err(e) => {
                tracing::debug!("Quest log refresh failed: {}", e);
                None
            }
        }
    }

    fn refresh_spells(&self) -> Option<Arc<SpellBook>> {
        match SpellBook::read(self.engine.memory(), &self.offsets) {
            Ok(book) => Some(Arc::new(book)),
            Err(e) => {
                tracing::debug!("Spell book refresh failed: {}", e);
                None
            }
        }
    }
}
