//! zzrust Plugin - FFI Layer
//!
//! This crate provides the FFI boundary between the native loader injected
//! into the client and the Rust core logic. It compiles to a cdylib (.dll).
//!
//! The loader hands over a [`HostFunctions`] table on load, then calls
//! `rust_on_frame` from the client's main thread every frame and forwards
//! client events through `rust_on_event`.

pub mod ffi;

mod state;

pub use ffi::host::{EnumCallback, HostBridge, HostFunctions};
