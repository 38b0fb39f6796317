//! Event system types

use std::sync::Arc;

/// Fired by the object manager whenever the local player handle is recreated
pub const PLAYER_INIT: &str = "ZZRUST_PLAYER_INIT";

/// Client event used as an online check
pub const CURSOR_UPDATE: &str = "CURSOR_UPDATE";

/// Client events after which the world is considered loaded again
pub const READY_EVENTS: [&str; 4] = [
    "UNIT_MODEL_CHANGED",
    "UPDATE_SELECTED_CHARACTER",
    "DISCONNECTED_FROM_SERVER",
    "VARIABLES_LOADED",
];

/// Gossip menu opened
pub const GOSSIP_SHOW: &str = "GOSSIP_SHOW";

/// Gossip menu closed
pub const GOSSIP_CLOSED: &str = "GOSSIP_CLOSED";

/// A named event with its string parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventArgs {
    /// Event name (e.g., "CURSOR_UPDATE")
    pub name: String,
    /// Positional parameters as delivered by the client
    pub params: Vec<String>,
}

impl EventArgs {
    /// Create event args with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Create event args with parameters
    pub fn with_params(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Get a parameter by position, `""` when absent
    pub fn param(&self, index: usize) -> &str {
        self.params.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Type alias for event callback functions
///
/// Callbacks run synchronously on the thread that fired the event.
pub type EventCallback = Arc<dyn Fn(&EventArgs) + Send + Sync>;
