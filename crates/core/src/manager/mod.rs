//! Object manager
//!
//! Owns the mirror of the client's visible objects and everything derived
//! from it.
//!
//! # Architecture
//!
//! ```text
//! Updater thread ──pulse──▶ MainThread::invoke ──▶ sync cycle (owner thread)
//!                                                    │ enumerate + resolve
//!                                                    ▼
//!                                   SyncState (IndexMap<Guid, object>)
//!                                                    │ publish
//!                                                    ▼
//! readers ◀── RwLock<PublishedView> { snapshot, player, pet, spells, quests }
//! ```
//!
//! The sync state is only touched by the cycle. The published view lock is
//! held just long enough to copy an `Arc`, never across a client call.
//!
//! # Lifecycle
//!
//! ```ignore
//! let manager = ObjectManager::new(engine, main_thread, events, config, offsets);
//! manager.start()?;
//! // ...
//! manager.shutdown();
//! ```

mod cycle;
mod gate;
mod readers;

pub use cycle::CycleStatus;
pub use gate::{GateState, ReadinessGate};

use std::sync::{Arc, Weak};
use std::time::Instant;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use zzrust_engine::{AddressSpaceExt, Engine};
use zzrust_sdk::{Address, Guid};

use crate::cache::{ItemCache, QuestCache};
use crate::config::MirrorConfig;
use crate::events::{EventBus, ListenerKey, CURSOR_UPDATE, READY_EVENTS};
use crate::gamedata::Offsets;
use crate::objects::{LocalPet, LocalPlayer, MirroredObject, ObjectSnapshot};
use crate::refresh::{QuestLog, SpellBook};
use crate::tasks::MainThread;
use crate::timers::{Cooldown, Updater};

/// State only the sync cycle reads or writes
struct SyncState {
    objects: IndexMap<Guid, Arc<MirroredObject>>,
    quest_refresh: Cooldown,
    spell_refresh: Cooldown,
    generation: u64,
}

/// What readers see
#[derive(Default)]
struct PublishedView {
    snapshot: ObjectSnapshot,
    player: Option<LocalPlayer>,
    pet: Option<LocalPet>,
    spells: Arc<SpellBook>,
    quests: Arc<QuestLog>,
}

struct Inner {
    engine: Engine,
    main_thread: Arc<MainThread>,
    events: Arc<EventBus>,
    offsets: Offsets,
    config: MirrorConfig,
    gate: ReadinessGate,
    state: Mutex<SyncState>,
    view: RwLock<PublishedView>,
    items: ItemCache,
    quests: QuestCache,
    updater: Mutex<Option<Updater>>,
    listeners: Mutex<Vec<ListenerKey>>,
}

impl Inner {
    /// Read the client's in-game flag (owner context)
    fn in_game(&self) -> bool {
        let address = Address::new(self.offsets.in_game_flag);
        match self.engine.memory().read::<u8>(address) {
            Ok(flag) => flag == 1,
            Err(e) => {
                tracing::debug!("In-game flag unreadable: {}", e);
                false
            }
        }
    }

    fn handle_gate_event(self: &Arc<Self>, name: &str) {
        let checker = Arc::clone(self);
        let transition = self.gate.on_event(name, || {
            self.main_thread
                .invoke(move || checker.in_game())
                .unwrap_or(false)
        });

        if let Some(state) = transition {
            tracing::info!("Readiness gate -> {:?} ({})", state, name);
        }
    }
}

/// Live mirror of the client's object list
///
/// Cloning gives another handle to the same mirror.
#[derive(Clone)]
pub struct ObjectManager {
    inner: Arc<Inner>,
}

impl ObjectManager {
    /// Create a manager; nothing runs until [`start`](Self::start)
    pub fn new(
        engine: Engine,
        main_thread: Arc<MainThread>,
        events: Arc<EventBus>,
        config: MirrorConfig,
        offsets: Offsets,
    ) -> Self {
        let initial = if config.assume_ready_on_attach {
            GateState::Ready
        } else {
            GateState::NotReady
        };

        let state = SyncState {
            objects: IndexMap::new(),
            quest_refresh: Cooldown::new(config.quest_refresh()),
            spell_refresh: Cooldown::new(config.spell_refresh()),
            generation: 0,
        };

        Self {
            inner: Arc::new(Inner {
                engine,
                main_thread,
                events,
                offsets,
                config,
                gate: ReadinessGate::new(initial),
                state: Mutex::new(state),
                view: RwLock::new(PublishedView::default()),
                items: ItemCache::new(),
                quests: QuestCache::new(),
                updater: Mutex::new(None),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Subscribe to the gate events and start the periodic sync
    pub fn start(&self) -> std::io::Result<()> {
        let mut updater = self.inner.updater.lock();
        if updater.is_some() {
            tracing::warn!("Object manager already started");
            return Ok(());
        }

        let mut listeners = self.inner.listeners.lock();
        for name in std::iter::once(CURSOR_UPDATE).chain(READY_EVENTS) {
            let weak = Arc::downgrade(&self.inner);
            listeners.push(self.inner.events.subscribe(name, move |args| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_gate_event(&args.name);
                }
            }));
        }

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        *updater = Some(Updater::start(
            "zzrust-objects",
            self.inner.config.update_interval(),
            move || {
                if let Some(inner) = weak.upgrade() {
                    ObjectManager { inner }.pulse();
                }
            },
        )?);

        tracing::info!(
            "Object manager started ({:?} interval, gate {:?})",
            self.inner.config.update_interval(),
            self.inner.gate.state()
        );
        Ok(())
    }

    /// Stop the periodic sync and drop the event subscriptions
    ///
    /// Safe to call from the owner thread: queued work is pumped while the
    /// updater winds down.
    pub fn shutdown(&self) {
        let updater = self.inner.updater.lock().take();
        if let Some(mut updater) = updater {
            if self.inner.main_thread.is_owner_thread() {
                let main_thread = Arc::clone(&self.inner.main_thread);
                updater.stop_pumping(move || {
                    main_thread.process_queued_tasks();
                });
            } else {
                updater.stop();
            }
        }

        let keys = std::mem::take(&mut *self.inner.listeners.lock());
        for key in keys {
            self.inner.events.unsubscribe(key);
        }

        tracing::info!("Object manager shut down");
    }

    /// Whether the periodic sync is running
    pub fn is_running(&self) -> bool {
        self.inner.updater.lock().is_some()
    }

    pub fn engine(&self) -> &Engine {
        &self.inner.engine
    }

    pub fn offsets(&self) -> &Offsets {
        &self.inner.offsets
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.inner.events
    }

    pub fn main_thread(&self) -> &Arc<MainThread> {
        &self.inner.main_thread
    }

    pub fn gate(&self) -> &ReadinessGate {
        &self.inner.gate
    }

    /// Run one sync cycle now, on the owner thread
    ///
    /// Blocks until the cycle finished. Returns [`CycleStatus::Skipped`] when
    /// the owner thread is gone.
    pub fn pulse(&self) -> CycleStatus {
        let inner = Arc::clone(&self.inner);
        let started = Instant::now();
        match self.inner.main_thread.invoke(move || inner.run_cycle()) {
            Ok(status) => {
                tracing::trace!("Cycle {:?} in {:?}", status, started.elapsed());
                status
            }
            Err(e) => {
                tracing::error!("Failed to dispatch sync cycle: {}", e);
                CycleStatus::Skipped
            }
        }
    }
}
