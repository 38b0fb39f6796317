//! Mirrored object
//!
//! One [`MirroredObject`] exists per visible identity. The object manager owns
//! it; snapshots share it through `Arc`. Only the address moves: it is
//! re-resolved every cycle while the identity stays the same.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use zzrust_engine::{AddressSpace, AddressSpaceExt, ReadError};
use zzrust_sdk::{Address, Guid, Plain};

use super::kind::ObjectKind;
use crate::gamedata::Offsets;

// Object layout (relative to the object address):
//   +0x08: descriptor block pointer
//   +0x14: object type byte
//
// Unit descriptor block (relative to the descriptor pointer):
//   +0x30: summoned-by guid
//   +0x40: target guid

/// An object currently visible in the client
pub struct MirroredObject {
    guid: Guid,
    address: AtomicUsize,
    kind: ObjectKind,
    /// Mark-and-sweep flag, only touched by the sync cycle
    can_remove: AtomicBool,
}

impl MirroredObject {
    /// Create a new object, unmarked
    pub fn new(guid: Guid, address: Address, kind: ObjectKind) -> Self {
        Self {
            guid,
            address: AtomicUsize::new(address.raw()),
            kind,
            can_remove: AtomicBool::new(false),
        }
    }

    /// Identity assigned by the client
    pub fn guid(&self) -> Guid {
        self.guid
    }

    /// Address as of the last completed cycle
    pub fn address(&self) -> Address {
        Address::new(self.address.load(Ordering::Acquire))
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Record the address resolved this cycle and clear the sweep mark
    pub(crate) fn refresh(&self, address: Address) {
        self.address.store(address.raw(), Ordering::Release);
        self.can_remove.store(false, Ordering::Release);
    }

    pub(crate) fn mark_removable(&self) {
        self.can_remove.store(true, Ordering::Release);
    }

    pub(crate) fn is_removable(&self) -> bool {
        self.can_remove.load(Ordering::Acquire)
    }

    /// Address of the descriptor block
    pub fn descriptors(
        &self,
        memory: &dyn AddressSpace,
        offsets: &Offsets,
    ) -> Result<Address, ReadError> {
        let descriptors = memory.read_ptr(self.address().offset(offsets.descriptors))?;
        descriptors.non_null().ok_or(ReadError::NullAddress)
    }

    /// Read a field of the descriptor block
    pub fn descriptor<T: Plain>(
        &self,
        memory: &dyn AddressSpace,
        offsets: &Offsets,
        field: usize,
    ) -> Result<T, ReadError> {
        let descriptors = self.descriptors(memory, offsets)?;
        memory.read::<T>(descriptors.offset(field))
    }

    /// Guid of the unit that summoned this one, 0 if none
    pub fn summoned_by(
        &self,
        memory: &dyn AddressSpace,
        offsets: &Offsets,
    ) -> Result<Guid, ReadError> {
        self.descriptor::<u64>(memory, offsets, offsets.summoned_by)
    }

    /// Guid of this unit's current target, 0 if none
    pub fn target_guid(
        &self,
        memory: &dyn AddressSpace,
        offsets: &Offsets,
    ) -> Result<Guid, ReadError> {
        self.descriptor::<u64>(memory, offsets, offsets.target_guid)
    }
}

impl fmt::Debug for MirroredObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirroredObject")
            .field("guid", &format_args!("{:#x}", self.guid))
            .field("address", &self.address())
            .field("kind", &self.kind)
            .finish()
    }
}
