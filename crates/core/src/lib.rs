//! zzrust Core - Live Object Mirror
//!
//! This crate keeps a thread-safe mirror of the objects visible in the
//! client and the state derived from them.
//!
//! # Architecture
//!
//! - [`manager`] - the [`ObjectManager`]: sync cycle, snapshots, readiness gate
//! - [`objects`] - mirrored objects, kinds, player/pet handles
//! - [`cache`] - permanent item/quest row caches
//! - [`refresh`] - spell book and quest log, refreshed on cooldowns
//! - [`frames`] - gossip menu reader built on the public read surface
//! - [`tasks`] / [`timers`] - owner thread marshaling and periodic scheduling
//! - [`events`] - named client events
//! - [`config`] / [`gamedata`] - TOML settings and the offsets table
//!
//! # Re-exports
//!
//! This crate re-exports the SDK and engine crates for convenience:
//! - [`sdk`] - foreign address, identity and row types
//! - [`engine`] - address space and client function seams

pub use zzrust_engine as engine;
pub use zzrust_sdk as sdk;

pub mod cache;
pub mod config;
pub mod events;
pub mod frames;
pub mod gamedata;
pub mod manager;
pub mod objects;
pub mod refresh;
pub mod tasks;
pub mod timers;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items
pub use cache::{ItemCache, LookupCache, QuestCache};
pub use config::{ConfigError, ConfigResult, MirrorConfig, PluginConfig};
pub use events::{EventArgs, EventBus, ListenerKey, PLAYER_INIT};
pub use frames::{GossipFrame, GossipKind, GossipTracker};
pub use gamedata::{GamedataError, Offsets};
pub use manager::{CycleStatus, GateState, ObjectManager, ReadinessGate};
pub use objects::{KindFilter, LocalPet, LocalPlayer, MirroredObject, ObjectKind, ObjectSnapshot};
pub use refresh::{QuestLog, QuestLogEntry, QuestState, SpellBook};
pub use tasks::{DispatchError, MainThread};
pub use timers::{Cooldown, Updater};
