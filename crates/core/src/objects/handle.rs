//! Local player and pet handles
//!
//! Both are distinguished [`MirroredObject`]s found by relational logic. A
//! handle is never mutated: when the backing address changes a new handle
//! replaces the old one, so anyone holding the old handle keeps a consistent
//! (if stale) view.

use std::ops::Deref;
use std::sync::Arc;

use zzrust_sdk::{Address, Guid};

use super::kind::ObjectKind;
use super::object::MirroredObject;

/// The locally controlled player
#[derive(Debug, Clone)]
pub struct LocalPlayer(Arc<MirroredObject>);

impl LocalPlayer {
    pub(crate) fn new(guid: Guid, address: Address) -> Self {
        Self(Arc::new(MirroredObject::new(guid, address, ObjectKind::Player)))
    }

    /// The underlying object
    pub fn object(&self) -> &Arc<MirroredObject> {
        &self.0
    }
}

impl Deref for LocalPlayer {
    type Target = MirroredObject;

    fn deref(&self) -> &MirroredObject {
        &self.0
    }
}

/// The unit summoned by the local player
#[derive(Debug, Clone)]
pub struct LocalPet(Arc<MirroredObject>);

impl LocalPet {
    pub(crate) fn new(guid: Guid, address: Address) -> Self {
        Self(Arc::new(MirroredObject::new(guid, address, ObjectKind::Unit)))
    }

    /// The underlying object
    pub fn object(&self) -> &Arc<MirroredObject> {
        &self.0
    }
}

impl Deref for LocalPet {
    type Target = MirroredObject;

    fn deref(&self) -> &MirroredObject {
        &self.0
    }
}
