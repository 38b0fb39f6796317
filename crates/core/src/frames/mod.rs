//! Consumers of the public read surface that model client UI frames

pub mod gossip;

pub use gossip::{
    GossipFrame, GossipKind, GossipOption, GossipTracker, QuestGossipState, QuestOption,
    MAX_GOSSIP_QUESTS,
};
