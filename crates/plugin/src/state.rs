//! The single mirror instance owned by the loaded library

use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use zzrust_core::{EventBus, GossipTracker, MainThread, ObjectManager};

/// Everything created on load and torn down on unload
pub(crate) struct PluginState {
    pub manager: ObjectManager,
    pub gossip: Arc<GossipTracker>,
    pub main_thread: Arc<MainThread>,
    pub events: Arc<EventBus>,
}

static PLUGIN: LazyLock<Mutex<Option<PluginState>>> = LazyLock::new(|| Mutex::new(None));

/// Store the state created on load; returns `false` if already loaded
pub(crate) fn install(state: PluginState) -> bool {
    let mut slot = PLUGIN.lock();
    if slot.is_some() {
        return false;
    }
    *slot = Some(state);
    true
}

/// Take the state out for teardown
pub(crate) fn take() -> Option<PluginState> {
    PLUGIN.lock().take()
}

/// Run `f` against the loaded state
///
/// The lock is only held while `f` copies what it needs; callers must not run
/// client work inside `f`.
pub(crate) fn with<R>(f: impl FnOnce(&PluginState) -> R) -> Option<R> {
    PLUGIN.lock().as_ref().map(f)
}
