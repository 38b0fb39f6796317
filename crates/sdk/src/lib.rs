//! zzrust SDK - Foreign Client Type Definitions
//!
//! This crate contains the plain data types shared by every layer that talks
//! to the foreign client process. It has no dependencies and compiles quickly,
//! allowing parallel compilation of dependent crates.
//!
//! # Modules
//!
//! - [`address`] - Pointer-sized foreign addresses and object identities
//! - [`object`] - Raw object type codes as stored by the client
//! - [`item`] - Item cache row layout
//! - [`plain`] - Marker trait for types readable from raw bytes

pub mod address;
pub mod item;
pub mod object;
pub mod plain;

pub use address::{Address, Guid};
pub use item::{ItemCacheEntry, ItemCacheLookupType};
pub use object::ObjectType;
pub use plain::Plain;
