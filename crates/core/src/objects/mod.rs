//! Mirrored object model
//!
//! # Object Model
//!
//! Every visible client object becomes one [`MirroredObject`] tagged with an
//! [`ObjectKind`]. Typed views (units, players, items, ...) are filters over
//! that single list, not separate types:
//!
//! ```ignore
//! use zzrust_core::objects::KindFilter;
//!
//! let snapshot = manager.snapshot();
//! for unit in snapshot.filtered(KindFilter::UNITS) {
//!     println!("{:#x} at {}", unit.guid(), unit.address());
//! }
//! ```
//!
//! # Handles
//!
//! [`LocalPlayer`] and [`LocalPet`] are replaced, never mutated, when their
//! backing address changes.

pub mod handle;
pub mod identity;
pub mod kind;
pub mod object;
pub mod snapshot;

pub use handle::{LocalPet, LocalPlayer};
pub use identity::IdentityResolver;
pub use kind::{KindFilter, ObjectKind};
pub use object::MirroredObject;
pub use snapshot::ObjectSnapshot;
