//! Owner thread task queue
//!
//! The client is only safe to touch from one thread. Every foreign access
//! requested elsewhere is packaged as a task and run on that owner thread,
//! either pumped from the host's frame hook or on a dedicated worker.

pub mod queue;

pub use queue::*;
