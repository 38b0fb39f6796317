//! Readiness gate
//!
//! ```text
//!              ready event
//!   NotReady ──────────────▶ Ready
//!       ▲                      │
//!       └──────────────────────┘
//!    CURSOR_UPDATE with the in-game flag off, or disconnect()
//! ```
//!
//! The sync cycle does nothing while the gate is closed.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::events::{CURSOR_UPDATE, READY_EVENTS};

/// State of the readiness gate
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    NotReady = 0,
    Ready = 1,
}

impl GateState {
    fn from_raw(raw: u8) -> Self {
        if raw == GateState::Ready as u8 {
            GateState::Ready
        } else {
            GateState::NotReady
        }
    }
}

/// Two-state gate driven by client events
#[derive(Debug)]
pub struct ReadinessGate {
    state: AtomicU8,
    /// Whether the most recent cycle that ran resolved the local player
    last_cycle_ok: AtomicBool,
}

impl ReadinessGate {
    pub fn new(initial: GateState) -> Self {
        Self {
            state: AtomicU8::new(initial as u8),
            last_cycle_ok: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> GateState {
        GateState::from_raw(self.state.load(Ordering::Acquire))
    }

    pub fn is_open(&self) -> bool {
        self.state() == GateState::Ready
    }

    /// Move to `Ready`; returns `true` on a transition
    pub fn open(&self) -> bool {
        self.state.swap(GateState::Ready as u8, Ordering::AcqRel) != GateState::Ready as u8
    }

    /// Move to `NotReady`; returns `true` on a transition
    pub fn close(&self) -> bool {
        self.state.swap(GateState::NotReady as u8, Ordering::AcqRel) != GateState::NotReady as u8
    }

    /// Apply a client event
    ///
    /// `in_game` is only consulted for the online-check event. Returns the new state
    /// when the event caused a transition.
    pub fn on_event<F>(&self, name: &str, in_game: F) -> Option<GateState>
    where
        F: FnOnce() -> bool,
    {
        if name == CURSOR_UPDATE {
            if !in_game() && self.close() {
                return Some(GateState::NotReady);
            }
            return None;
        }
        if READY_EVENTS.contains(&name) && self.open() {
            return Some(GateState::Ready);
        }
        None
    }

    pub(crate) fn record_cycle(&self, ok: bool) {
        self.last_cycle_ok.store(ok, Ordering::Release);
    }

    pub fn last_cycle_ok(&self) -> bool {
        self.last_cycle_ok.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_check_closes_only_when_offline() {
        let gate = ReadinessGate::new(GateState::Ready);

        assert_eq!(gate.on_event(CURSOR_UPDATE, || true), None);
        assert!(gate.is_open());

        assert_eq!(
            gate.on_event(CURSOR_UPDATE, || false),
            Some(GateState::NotReady)
        );
        assert_eq!(gate.on_event(CURSOR_UPDATE, || false), None);
    }

    #[test]
    fn test_ready_events_open() {
        for event in READY_EVENTS {
            let gate = ReadinessGate::new(GateState::NotReady);
            assert_eq!(
                gate.on_event(event, || unreachable!()),
                Some(GateState::Ready)
            );
            assert!(gate.is_open());
        }
    }

    #[test]
    fn test_other_events_ignored() {
        let gate = ReadinessGate::new(GateState::NotReady);
        assert_eq!(gate.on_event("PLAYER_TARGET_CHANGED", || false), None);
        assert_eq!(gate.state(), GateState::NotReady);
    }

    #[test]
    fn test_close_and_open() {
        let gate = ReadinessGate::new(GateState::Ready);
        assert!(gate.close());
        assert!(!gate.close());
        assert!(gate.open());
        assert!(!gate.open());
    }
}
