//! zzrust Engine - Foreign Process Access
//!
//! This crate handles:
//! - Typed reads from the client's address space ([`AddressSpace`])
//! - Calls into native client functions ([`ForeignFunctions`])
//! - Command execution in the client's scripting layer ([`ScriptHost`])
//!
//! # Architecture
//!
//! The three capabilities are bundled into an [`Engine`] by the attach layer
//! and passed down explicitly. Tests substitute fakes for all three.
//!
//! # Thread Safety
//!
//! The client is not safe for arbitrary-thread access. Implementations only
//! promise `Send + Sync` so they can be shared; callers must route every use
//! through the owner thread.

pub mod engine;
pub mod error;
pub mod functions;
pub mod memory;

pub use engine::Engine;
pub use error::ReadError;
pub use functions::{ForeignFunctions, ScriptHost, CALLBACK_IGNORED, CALLBACK_PROCESSED, NO_FILTER};
pub use memory::{AddressSpace, AddressSpaceExt, InProcessMemory, MAX_STRING_LEN};
