//! The local player's quest log

use zzrust_engine::{AddressSpace, AddressSpaceExt, ForeignFunctions, ReadError};
use zzrust_sdk::Address;

use crate::cache::QuestCache;
use crate::gamedata::Offsets;

/// Number of slots in the client quest log
pub const QUEST_LOG_SLOTS: usize = 20;

/// Progress of a quest in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestState {
    InProgress,
    Complete,
    Failed,
}

impl QuestState {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Complete,
            -1 => Self::Failed,
            _ => Self::InProgress,
        }
    }
}

/// One occupied quest log slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestLogEntry {
    pub quest_id: i32,
    pub state: QuestState,
    /// `None` while the quest cache has no row for this id
    pub title: Option<String>,
}

/// Snapshot of the quest log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestLog {
    entries: Vec<QuestLogEntry>,
}

impl QuestLog {
    /// Read every occupied slot, resolving titles through `cache`
    pub fn read(
        memory: &dyn AddressSpace,
        functions: &dyn ForeignFunctions,
        offsets: &Offsets,
        cache: &QuestCache,
    ) -> Result<Self, ReadError> {
        let base = Address::new(offsets.quest_log);
        let mut entries = Vec::new();

        for slot in 0..QUEST_LOG_SLOTS {
            let slot_base = base.offset(slot * offsets.quest_log_stride);
            let quest_id = memory.read::<i32>(slot_base)?;
            if quest_id <= 0 {
                continue;
            }
            let raw_state = memory.read::<i32>(slot_base.offset(offsets.quest_log_state))?;
            let state = QuestState::from_raw(raw_state);

            let title = cache.address(functions, quest_id).and_then(|row| {
                memory
                    .read_string(row.offset(offsets.quest_cache_title))
                    .map_err(|e| tracing::debug!("No title for quest {}: {}", quest_id, e))
                    .ok()
            });

            entries.push(QuestLogEntry {
                quest_id,
                state,
                title,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[QuestLogEntry] {
        &self.entries
    }

    pub fn find(&self, quest_id: i32) -> Option<&QuestLogEntry> {
        self.entries.iter().find(|entry| entry.quest_id == quest_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
