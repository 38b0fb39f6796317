//! Client Event System
//!
//! Subscribe to and deliver named client events (CURSOR_UPDATE,
//! VARIABLES_LOADED, etc.). The host forwards every client event into an
//! [`EventBus`]; the mirror subscribes to the few it needs and publishes
//! [`PLAYER_INIT`] of its own.
//!
//! # Architecture
//!
//! ```text
//! client event hook → rust_on_event (FFI) → EventBus::fire → Rust callbacks
//! ```
//!
//! # Example
//!
//! ```ignore
//! use zzrust_core::events::{EventBus, PLAYER_INIT};
//!
//! let bus = EventBus::new();
//! let key = bus.subscribe(PLAYER_INIT, |_| {
//!     tracing::info!("Local player (re)initialized");
//! });
//!
//! bus.unsubscribe(key);
//! ```

mod manager;
mod types;

pub use manager::{EventBus, ListenerKey};
pub use types::{
    EventArgs, EventCallback, CURSOR_UPDATE, GOSSIP_CLOSED, GOSSIP_SHOW, PLAYER_INIT,
    READY_EVENTS,
};
