//! Cooldown-gated player state
//!
//! The sync cycle refreshes these on their own slower schedules and publishes
//! copies next to the object snapshot.

pub mod quests;
pub mod spells;

pub use quests::{QuestLog, QuestLogEntry, QuestState, QUEST_LOG_SLOTS};
pub use spells::{SpellBook, MAX_SPELLS};
