//! Gamedata system for loading client offsets from JSON
//!
//! Every offset the mirror reads is listed in [`Offsets`]. The built-in table
//! matches the 1.12.1 (5875) client; a gamedata file deployed with the library
//! may override any subset without recompiling.
//!
//! ```json
//! {
//!     "in_game_flag": "0xB4B424",
//!     "summoned_by": 48
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading gamedata
#[derive(Debug, Error)]
pub enum GamedataError {
    #[error("Failed to read gamedata file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse gamedata JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Offset values written as numbers or `"0x..."` strings
mod offset_value {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &usize, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:#x}", value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        let value = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n,
            Raw::Text(text) => {
                let text = text.trim();
                match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => text.parse::<u64>(),
                }
                .map_err(|_| de::Error::custom(format!("invalid offset literal: {}", text)))?
            }
        };
        usize::try_from(value).map_err(|_| de::Error::custom("offset does not fit in usize"))
    }
}

/// Client offsets used by the mirror
///
/// Fields named `*_guid`, `*_flag` and the table bases are absolute addresses;
/// the rest are relative to an object, descriptor block or table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offsets {
    /// Object type byte, relative to the object
    #[serde(with = "offset_value")]
    pub object_type: usize,
    /// Pointer to the descriptor block, relative to the object
    #[serde(with = "offset_value")]
    pub descriptors: usize,
    /// Summoner guid, relative to the descriptor block
    #[serde(with = "offset_value")]
    pub summoned_by: usize,
    /// Target guid, relative to the descriptor block
    #[serde(with = "offset_value")]
    pub target_guid: usize,

    /// Byte that is 1 while a character is in the world
    #[serde(with = "offset_value")]
    pub in_game_flag: usize,
    #[serde(with = "offset_value")]
    pub party_leader_guid: usize,
    #[serde(with = "offset_value")]
    pub party1_guid: usize,
    #[serde(with = "offset_value")]
    pub party2_guid: usize,
    #[serde(with = "offset_value")]
    pub party3_guid: usize,
    #[serde(with = "offset_value")]
    pub party4_guid: usize,

    /// Array of known spell ids, terminated by 0
    #[serde(with = "offset_value")]
    pub spell_book: usize,
    /// Quest log table
    #[serde(with = "offset_value")]
    pub quest_log: usize,
    /// Size of one quest log entry
    #[serde(with = "offset_value")]
    pub quest_log_stride: usize,
    /// Completion state, relative to a quest log entry
    #[serde(with = "offset_value")]
    pub quest_log_state: usize,
    /// Title string, relative to a quest cache row
    #[serde(with = "offset_value")]
    pub quest_cache_title: usize,

    /// Guid of the npc whose gossip menu is open
    #[serde(with = "offset_value")]
    pub gossip_npc_guid: usize,
    /// Greeting text of the open gossip menu
    #[serde(with = "offset_value")]
    pub gossip_text: usize,
    /// First gossip option
    #[serde(with = "offset_value")]
    pub gossip_options: usize,
    /// End of the gossip option table
    #[serde(with = "offset_value")]
    pub gossip_options_end: usize,
    #[serde(with = "offset_value")]
    pub gossip_option_stride: usize,
    /// Sentinel (-1 when unused), relative to a gossip option
    #[serde(with = "offset_value")]
    pub gossip_option_sentinel: usize,
    /// Option type, relative to a gossip option
    #[serde(with = "offset_value")]
    pub gossip_option_type: usize,
    /// Quest ids offered by the gossip menu
    #[serde(with = "offset_value")]
    pub gossip_quest_ids: usize,
    /// Quest states offered by the gossip menu
    #[serde(with = "offset_value")]
    pub gossip_quest_states: usize,
    /// Title string, relative to a gossip quest id
    #[serde(with = "offset_value")]
    pub gossip_quest_title: usize,
    #[serde(with = "offset_value")]
    pub gossip_quest_stride: usize,
}

impl Default for Offsets {
    fn default() -> Self {
        Self {
            object_type: 0x14,
            descriptors: 0x8,
            summoned_by: 0x30,
            target_guid: 0x40,

            in_game_flag: 0xB4_B424,
            party_leader_guid: 0xBC_75F8,
            party1_guid: 0xBC_6F48,
            party2_guid: 0xBC_6F50,
            party3_guid: 0xBC_6F58,
            party4_guid: 0xBC_6F60,

            spell_book: 0xB7_00F0,
            quest_log: 0xBB_69F8,
            quest_log_stride: 0xC,
            quest_log_state: 0x8,
            quest_cache_title: 0x8,

            gossip_npc_guid: 0xBC_3F58,
            gossip_text: 0xBB_B678,
            gossip_options: 0xBB_BE90,
            gossip_options_end: 0xBC_3F50,
            gossip_option_stride: 0x80C,
            gossip_option_sentinel: 0x800,
            gossip_option_type: 0x808,
            gossip_quest_ids: 0xBB_74C0,
            gossip_quest_states: 0xBB_74C8,
            gossip_quest_title: 0xC,
            gossip_quest_stride: 0x20C,
        }
    }
}

impl Offsets {
    /// Load offsets from a JSON file, falling back to built-ins per field
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GamedataError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }

    /// Load offsets from a JSON string, falling back to built-ins per field
    pub fn load_from_str(json: &str) -> Result<Self, GamedataError> {
        let offsets: Offsets = serde_json::from_str(json)?;
        tracing::info!("Loaded gamedata offsets");
        Ok(offsets)
    }

    /// Load `path` when given and present, the built-in table otherwise
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, GamedataError> {
        match path {
            Some(path) if path.exists() => Self::load_from_file(path),
            Some(path) => {
                tracing::warn!("Gamedata {:?} not found, using built-in offsets", path);
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Absolute address of a party slot's guid (0 = leader, 1..=4 = members)
    pub fn party_guid(&self, slot: usize) -> Option<usize> {
        match slot {
            0 => Some(self.party_leader_guid),
            1 => Some(self.party1_guid),
            2 => Some(self.party2_guid),
            3 => Some(self.party3_guid),
            4 => Some(self.party4_guid),
            _ => None,
        }
    }
}
