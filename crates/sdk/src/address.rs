//! Foreign address and identity types
//!
//! Addresses point into the foreign client's address space. They are never
//! dereferenced directly outside an address space implementation; all pointer
//! arithmetic goes through [`Address::offset`].

use std::fmt;

/// Stable 64-bit identity the client assigns to one object
pub type Guid = u64;

/// A pointer-sized address inside the foreign process
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(usize);

impl Address {
    /// The null address
    pub const NULL: Address = Address(0);

    /// Wrap a raw address value
    #[inline]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Get the raw address value
    #[inline]
    pub const fn raw(self) -> usize {
        self.0
    }

    /// Check if this is the null address
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// `None` for null, `Some(self)` otherwise
    #[inline]
    pub const fn non_null(self) -> Option<Self> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }

    /// Address `bytes` past this one (wrapping, like the client's own math)
    #[inline]
    pub const fn offset(self, bytes: usize) -> Self {
        Self(self.0.wrapping_add(bytes))
    }
}

impl From<usize> for Address {
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#x})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
