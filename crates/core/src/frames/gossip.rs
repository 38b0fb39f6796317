//! Gossip menu
//!
//! ```text
//! option table (gossip_options .. gossip_options_end, stride 0x80C)
//! ├── +0x000: option text (inline, null-terminated)
//! ├── +0x800: -1 marks the end of the list
//! └── +0x808: option type
//!
//! quest table (stride 0x20C, at most 32 entries)
//! ├── gossip_quest_ids    + n: quest id (0 ends the list)
//! ├── gossip_quest_states + n: 3 accepted, 4 completable, 5 available
//! └── gossip_quest_ids    + n + 0xC: quest title
//! ```

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use zzrust_engine::{AddressSpace, AddressSpaceExt, ReadError};
use zzrust_sdk::{Address, Guid};

use crate::events::{ListenerKey, GOSSIP_CLOSED, GOSSIP_SHOW};
use crate::gamedata::Offsets;
use crate::manager::ObjectManager;

/// Most quest entries a gossip menu can list
pub const MAX_GOSSIP_QUESTS: usize = 32;

/// Service behind a gossip option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GossipKind {
    Gossip,
    Vendor,
    Taxi,
    Trainer,
    Healer,
    Binder,
    Banker,
    Petition,
    Tabard,
    Battlemaster,
    Auctioneer,
    Unknown(i32),
}

impl GossipKind {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Gossip,
            1 => Self::Vendor,
            2 => Self::Taxi,
            3 => Self::Trainer,
            4 => Self::Healer,
            5 => Self::Binder,
            6 => Self::Banker,
            7 => Self::Petition,
            8 => Self::Tabard,
            9 => Self::Battlemaster,
            10 => Self::Auctioneer,
            other => Self::Unknown(other),
        }
    }
}

/// Quest status as shown in a gossip menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestGossipState {
    Accepted,
    Completable,
    Available,
}

impl QuestGossipState {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            3 => Some(Self::Accepted),
            4 => Some(Self::Completable),
            5 => Some(Self::Available),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GossipOption {
    pub text: String,
    pub kind: GossipKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestOption {
    pub id: i32,
    pub title: String,
    pub state: QuestGossipState,
}

/// Contents of the open gossip menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GossipFrame {
    npc_guid: Guid,
    text: String,
    options: Vec<GossipOption>,
    quests: Vec<QuestOption>,
}

impl GossipFrame {
    /// Parse the menu from client memory (owner context)
    ///
    /// `Ok(None)` when no gossip npc is set.
    pub fn parse(
        memory: &dyn AddressSpace,
        offsets: &Offsets,
    ) -> Result<Option<Self>, ReadError> {
        let npc_guid = memory.read::<u64>(Address::new(offsets.gossip_npc_guid))?;
        if npc_guid == 0 {
            return Ok(None);
        }

        let text = memory.read_string(Address::new(offsets.gossip_text))?;

        let mut options = Vec::new();
        let mut entry = offsets.gossip_options;
        while entry < offsets.gossip_options_end {
            let base = Address::new(entry);
            if memory.read::<i32>(base.offset(offsets.gossip_option_sentinel))? == -1 {
                break;
            }
            let raw_kind = memory.read::<i32>(base.offset(offsets.gossip_option_type))?;
            options.push(GossipOption {
                text: memory.read_string(base)?,
                kind: GossipKind::from_raw(raw_kind),
            });
            entry += offsets.gossip_option_stride;
        }

        let mut quests = Vec::new();
        for index in 0..MAX_GOSSIP_QUESTS {
            let step = index * offsets.gossip_quest_stride;
            let id_address = Address::new(offsets.gossip_quest_ids + step);
            let id = memory.read::<i32>(id_address)?;
            if id == 0 {
                break;
            }
            let raw_state = memory.read::<i32>(Address::new(offsets.gossip_quest_states + step))?;
            let Some(state) = QuestGossipState::from_raw(raw_state) else {
                break;
            };
            quests.push(QuestOption {
                id,
                title: memory.read_string(id_address.offset(offsets.gossip_quest_title))?,
                state,
            });
        }

        Ok(Some(Self {
            npc_guid,
            text,
            options,
            quests,
        }))
    }

    /// Parse the menu on the owner thread
    pub fn read(manager: &ObjectManager) -> Option<Self> {
        match manager.read_live(|memory, offsets| Self::parse(memory, offsets)) {
            Ok(Ok(frame)) => frame,
            Ok(Err(e)) => {
                tracing::debug!("Failed to parse gossip frame: {}", e);
                None
            }
            Err(e) => {
                tracing::error!("Failed to dispatch gossip read: {}", e);
                None
            }
        }
    }

    /// Guid of the npc offering this menu
    pub fn npc_guid(&self) -> Guid {
        self.npc_guid
    }

    /// Greeting text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Non-quest options, in menu order
    pub fn options(&self) -> &[GossipOption] {
        &self.options
    }

    pub fn quests(&self) -> &[QuestOption] {
        &self.quests
    }

    /// Select the option at `position` (1-based, as the client numbers them)
    pub fn select_option(&self, manager: &ObjectManager, position: usize) {
        manager.execute_script(format!("SelectGossipOption({})", position));
    }

    /// Select the first option of `kind`; `false` when there is none
    pub fn select_first_of_type(&self, manager: &ObjectManager, kind: GossipKind) -> bool {
        match self.options.iter().position(|option| option.kind == kind) {
            Some(index) => {
                self.select_option(manager, index + 1);
                true
            }
            None => false,
        }
    }

    fn lists_quest(&self, quest_id: i32) -> bool {
        self.quests.iter().any(|quest| quest.id == quest_id)
    }

    /// Accept a quest this menu lists; `false` when it is not listed
    pub fn accept_quest(&self, manager: &ObjectManager, quest_id: i32) -> bool {
        if !self.lists_quest(quest_id) {
            return false;
        }
        manager.accept_quest(self.npc_guid, quest_id);
        true
    }

    /// Turn in a quest this menu lists; `false` when it is not listed
    pub fn complete_quest(&self, manager: &ObjectManager, quest_id: i32) -> bool {
        if !self.lists_quest(quest_id) {
            return false;
        }
        manager.complete_quest(self.npc_guid, quest_id);
        true
    }
}

/// Keeps the currently open gossip menu
///
/// Opens on `GOSSIP_SHOW` and closes on `GOSSIP_CLOSED`.
pub struct GossipTracker {
    manager: ObjectManager,
    current: RwLock<Option<Arc<GossipFrame>>>,
    listeners: Mutex<Vec<ListenerKey>>,
}

impl GossipTracker {
    /// Create a tracker subscribed to the manager's event bus
    pub fn attach(manager: &ObjectManager) -> Arc<Self> {
        let tracker = Arc::new(Self {
            manager: manager.clone(),
            current: RwLock::new(None),
            listeners: Mutex::new(Vec::new()),
        });

        let weak: Weak<Self> = Arc::downgrade(&tracker);
        let show = manager.events().subscribe(GOSSIP_SHOW, move |_| {
            if let Some(tracker) = weak.upgrade() {
                tracker.open();
            }
        });
        let weak: Weak<Self> = Arc::downgrade(&tracker);
        let closed = manager.events().subscribe(GOSSIP_CLOSED, move |_| {
            if let Some(tracker) = weak.upgrade() {
                tracker.close();
            }
        });
        tracker.listeners.lock().extend([show, closed]);

        tracker
    }

    fn open(&self) {
        let frame = GossipFrame::read(&self.manager).map(Arc::new);
        if let Some(frame) = &frame {
            tracing::debug!(
                "Gossip opened by {:#x}: {} options, {} quests",
                frame.npc_guid(),
                frame.options().len(),
                frame.quests().len()
            );
        }
        *self.current.write() = frame;
    }

    fn close(&self) {
        *self.current.write() = None;
    }

    /// The open menu, if any
    pub fn current(&self) -> Option<Arc<GossipFrame>> {
        self.current.read().clone()
    }

    pub fn is_open(&self) -> bool {
        self.current.read().is_some()
    }
}

impl Drop for GossipTracker {
    fn drop(&mut self) {
        for key in self.listeners.get_mut().drain(..) {
            self.manager.events().unsubscribe(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventArgs;
    use crate::testing::{in_world, FakeProcess, QuestCommand};

    fn write_menu(process: &FakeProcess, offsets: &Offsets) {
        process.write(offsets.gossip_npc_guid, 0xF130_0000_0000_0042u64);
        process.write_str(offsets.gossip_text, "Greetings, traveler.");

        let options = [("I want to browse your goods.", 1i32), ("Train me.", 3)];
        for (i, (text, kind)) in options.iter().enumerate() {
            let base = offsets.gossip_options + i * offsets.gossip_option_stride;
            process.write_str(base, text);
            process.write(base + offsets.gossip_option_sentinel, 0i32);
            process.write(base + offsets.gossip_option_type, *kind);
        }
        let end = offsets.gossip_options + options.len() * offsets.gossip_option_stride;
        process.write(end + offsets.gossip_option_sentinel, -1i32);

        let quests = [
            (33i32, 5i32, "Wolves Across the Border"),
            (7, 4, "Kobold Camp Cleanup"),
        ];
        for (i, (id, state, title)) in quests.iter().enumerate() {
            let step = i * offsets.gossip_quest_stride;
            process.write(offsets.gossip_quest_ids + step, *id);
            process.write(offsets.gossip_quest_states + step, *state);
            process.write_str(offsets.gossip_quest_ids + step + offsets.gossip_quest_title, title);
        }
        let step = quests.len() * offsets.gossip_quest_stride;
        process.write(offsets.gossip_quest_ids + step, 0i32);
    }

    #[test]
    fn test_parse_menu() {
        let process = FakeProcess::new();
        let offsets = Offsets::default();
        write_menu(&process, &offsets);

        let frame = GossipFrame::parse(&*process, &offsets).unwrap().unwrap();
        assert_eq!(frame.npc_guid(), 0xF130_0000_0000_0042);
        assert_eq!(frame.text(), "Greetings, traveler.");
        assert_eq!(
            frame.options(),
            &[
                GossipOption {
                    text: "I want to browse your goods.".into(),
                    kind: GossipKind::Vendor,
                },
                GossipOption {
                    text: "Train me.".into(),
                    kind: GossipKind::Trainer,
                },
            ]
        );
        assert_eq!(frame.quests().len(), 2);
        assert_eq!(frame.quests()[0].state, QuestGossipState::Available);
        assert_eq!(frame.quests()[1].title, "Kobold Camp Cleanup");
    }

    #[test]
    fn test_no_npc_means_no_menu() {
        let process = FakeProcess::new();
        let offsets = Offsets::default();
        process.write(offsets.gossip_npc_guid, 0u64);
        assert_eq!(GossipFrame::parse(&*process, &offsets).unwrap(), None);
    }

    #[test]
    fn test_unknown_quest_state_ends_list() {
        let process = FakeProcess::new();
        let offsets = Offsets::default();
        write_menu(&process, &offsets);
        process.write(offsets.gossip_quest_states + offsets.gossip_quest_stride, 2i32);

        let frame = GossipFrame::parse(&*process, &offsets).unwrap().unwrap();
        assert_eq!(frame.quests().len(), 1);
    }

    #[test]
    fn test_select_options() {
        let (process, manager) = in_world();
        write_menu(&process, &Offsets::default());
        let frame = GossipFrame::read(&manager).unwrap();

        frame.select_option(&manager, 1);
        assert!(frame.select_first_of_type(&manager, GossipKind::Trainer));
        assert!(!frame.select_first_of_type(&manager, GossipKind::Taxi));
        assert_eq!(
            process.executed(),
            vec!["SelectGossipOption(1)", "SelectGossipOption(2)"]
        );
    }

    #[test]
    fn test_quest_commands_need_a_listed_quest() {
        let (process, manager) = in_world();
        write_menu(&process, &Offsets::default());
        let frame = GossipFrame::read(&manager).unwrap();
        let npc = frame.npc_guid();

        assert!(frame.accept_quest(&manager, 33));
        assert!(frame.complete_quest(&manager, 7));
        assert!(!frame.accept_quest(&manager, 99));
        assert!(!frame.complete_quest(&manager, 1000));
        assert_eq!(
            process.quest_commands(),
            vec![
                (QuestCommand::Accept, npc, 33),
                (QuestCommand::Complete, npc, 7),
            ]
        );
    }

    #[test]
    fn test_tracker_follows_events() {
        let (process, manager) = in_world();
        write_menu(&process, &Offsets::default());
        let tracker = GossipTracker::attach(&manager);
        assert!(!tracker.is_open());

        manager.events().fire(&EventArgs::new(GOSSIP_SHOW));
        assert_eq!(tracker.current().map(|f| f.options().len()), Some(2));

        manager.events().fire(&EventArgs::new(GOSSIP_CLOSED));
        assert!(!tracker.is_open());

        drop(tracker);
        assert_eq!(manager.events().listener_count(), 0);
    }
}
