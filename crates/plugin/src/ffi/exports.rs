//! C-compatible exports called by the native loader

use std::ffi::{c_char, c_int, CStr};
use std::sync::Arc;

use tracing::instrument;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use zzrust_core::config::gamedata_path;
use zzrust_core::{
    EventArgs, EventBus, GossipTracker, MainThread, MirrorConfig, ObjectManager, Offsets,
};
use zzrust_engine::{Engine, InProcessMemory};

use super::host::{HostBridge, HostFunctions};
use crate::state::{self, PluginState};

// Plugin metadata - static strings with null terminators for C compatibility
static AUTHOR: &[u8] = b"dollan\0";
static NAME: &[u8] = b"zzrust\0";
static DESCRIPTION: &[u8] = b"Live object mirror for the 1.12 client\0";
static VERSION: &[u8] = b"0.1.0\0";
static LOG_TAG: &[u8] = b"ZZRUST\0";

/// Called by the loader from the client's main thread after injection
///
/// # Safety
/// - `host` must point to a fully initialized [`HostFunctions`] table whose
///   functions stay valid until `rust_plugin_unload`
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn rust_plugin_load(
    host: *const HostFunctions,
    error: *mut c_char,
    maxlen: usize,
) -> bool {
    let loaded_config = MirrorConfig::load();
    let debug = loaded_config.as_ref().is_ok_and(|config| config.debug);

    // Initialize tracing subscriber
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    tracing::info!("zzrust loading...");

    let config = loaded_config.unwrap_or_else(|e| {
        tracing::warn!("Failed to load core config, using defaults: {}", e);
        MirrorConfig::default()
    });

    if host.is_null() {
        write_error(error, maxlen, "Host function table is null");
        return false;
    }

    let offsets_path = config.offsets_file.clone().or_else(|| gamedata_path().ok());
    let offsets = match Offsets::load_or_builtin(offsets_path.as_deref()) {
        Ok(offsets) => offsets,
        Err(e) => {
            tracing::error!("Failed to load gamedata: {}", e);
            write_error(error, maxlen, &format!("Gamedata error: {}", e));
            return false;
        }
    };

    let bridge = Arc::new(HostBridge::new(*host));
    let engine = Engine::new(Arc::new(InProcessMemory), bridge.clone(), bridge);

    let main_thread = MainThread::bind_current();
    let events = Arc::new(EventBus::new());
    let manager = ObjectManager::new(
        engine,
        Arc::clone(&main_thread),
        Arc::clone(&events),
        config,
        offsets,
    );

    if let Err(e) = manager.start() {
        tracing::error!("Failed to start object manager: {}", e);
        write_error(error, maxlen, &format!("Updater error: {}", e));
        return false;
    }
    let gossip = GossipTracker::attach(&manager);

    let loaded = state::install(PluginState {
        manager: manager.clone(),
        gossip,
        main_thread,
        events,
    });
    if !loaded {
        manager.shutdown();
        write_error(error, maxlen, "Already loaded");
        return false;
    }

    tracing::info!("zzrust loaded successfully!");
    tracing::info!("Main thread ID: {:?}", std::thread::current().id());

    true
}

/// Called by the loader before the library is freed
///
/// # Safety
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn rust_plugin_unload(error: *mut c_char, maxlen: usize) -> bool {
    tracing::info!("zzrust unloading...");

    let Some(state) = state::take() else {
        return true;
    };

    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || shutdown(state))) {
        Ok(()) => true,
        Err(_) => {
            write_error(error, maxlen, "Panic during shutdown");
            false
        }
    }
}

fn shutdown(state: PluginState) {
    let PluginState {
        manager,
        gossip,
        main_thread,
        events: _,
    } = state;

    drop(gossip);
    manager.shutdown();
    main_thread.close();
}

// Metadata exports - these return static strings for the loader to display

#[no_mangle]
pub extern "C" fn rust_get_author() -> *const c_char {
    AUTHOR.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_name() -> *const c_char {
    NAME.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_description() -> *const c_char {
    DESCRIPTION.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_log_tag() -> *const c_char {
    LOG_TAG.as_ptr() as *const c_char
}

/// Called from the client's main thread every frame
///
/// Runs the work other threads queued for the client.
#[no_mangle]
pub extern "C" fn rust_on_frame() {
    if let Some(main_thread) = state::with(|state| Arc::clone(&state.main_thread)) {
        main_thread.process_queued_tasks();
    }
}

/// Called from the client's event dispatcher
///
/// # Safety
/// - `name` must be a valid null-terminated C string
/// - `params` must point to `count` valid null-terminated C strings (entries may be null)
#[no_mangle]
pub unsafe extern "C" fn rust_on_event(
    name: *const c_char,
    params: *const *const c_char,
    count: c_int,
) {
    if name.is_null() {
        return;
    }
    let Some(events) = state::with(|state| Arc::clone(&state.events)) else {
        return;
    };

    let name = CStr::from_ptr(name).to_string_lossy().into_owned();
    let mut args = Vec::new();
    if !params.is_null() {
        for i in 0..count.max(0) as usize {
            let param = *params.add(i);
            args.push(if param.is_null() {
                String::new()
            } else {
                CStr::from_ptr(param).to_string_lossy().into_owned()
            });
        }
    }

    events.fire(&EventArgs::with_params(name, args));
}

/// Called when the loader detects a lost connection
#[no_mangle]
pub extern "C" fn rust_on_disconnect() {
    if let Some(manager) = state::with(|state| state.manager.clone()) {
        manager.disconnect();
    }
}

/// Helper to write an error message to a C buffer
///
/// # Safety
/// - `error` must be a valid pointer or null
/// - `maxlen` must accurately reflect the buffer size
unsafe fn write_error(error: *mut c_char, maxlen: usize, msg: &str) {
    if !error.is_null() && maxlen > 0 {
        let bytes = msg.as_bytes();
        let len = bytes.len().min(maxlen - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), error as *mut u8, len);
        *error.add(len) = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_truncates() {
        let mut buf = [0x7f as c_char; 8];
        unsafe { write_error(buf.as_mut_ptr(), buf.len(), "gamedata missing") };
        let written = unsafe { CStr::from_ptr(buf.as_ptr()) };
        assert_eq!(written.to_str().unwrap(), "gamedat");
    }

    #[test]
    fn test_metadata_is_terminated() {
        let name = unsafe { CStr::from_ptr(rust_get_name()) };
        assert_eq!(name.to_str().unwrap(), "zzrust");
    }
}
