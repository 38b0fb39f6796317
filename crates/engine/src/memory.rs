//! Address space access
//!
//! [`AddressSpace`] is the only place raw foreign addresses are turned into
//! values. Everything above it works with [`Address`] and typed reads.

use std::mem::{size_of, MaybeUninit};

use zzrust_sdk::{Address, Plain};

use crate::error::ReadError;

/// Longest string [`AddressSpaceExt::read_string`] will scan for a terminator
pub const MAX_STRING_LEN: usize = 1024;

/// Lowest address considered readable in the host process
///
/// The first 64 KiB are never mapped on the platforms the client runs on.
const MIN_VALID_ADDRESS: usize = 0x10000;

/// Raw byte access to a foreign address space
pub trait AddressSpace: Send + Sync {
    /// Fill `buf` with the bytes starting at `address`
    fn read_bytes(&self, address: Address, buf: &mut [u8]) -> Result<(), ReadError>;
}

/// Typed reads on top of [`AddressSpace::read_bytes`]
pub trait AddressSpaceExt: AddressSpace {
    /// Read a plain value at `address`
    fn read<T: Plain>(&self, address: Address) -> Result<T, ReadError> {
        let mut value = MaybeUninit::<T>::zeroed();
        // SAFETY: the buffer covers exactly the value's storage, and `T: Plain`
        // is valid for any bytes the read leaves behind (including zeroes).
        let buf = unsafe {
            std::slice::from_raw_parts_mut(value.as_mut_ptr() as *mut u8, size_of::<T>())
        };
        self.read_bytes(address, buf)?;
        Ok(unsafe { value.assume_init() })
    }

    /// Read a pointer-sized value and interpret it as an address
    fn read_ptr(&self, address: Address) -> Result<Address, ReadError> {
        self.read::<Address>(address)
    }

    /// Read a null-terminated string (lossy UTF-8)
    fn read_string(&self, address: Address) -> Result<String, ReadError> {
        if address.is_null() {
            return Err(ReadError::NullAddress);
        }

        let mut bytes = Vec::new();
        for i in 0..MAX_STRING_LEN {
            let byte = self.read::<u8>(address.offset(i))?;
            if byte == 0 {
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }
            bytes.push(byte);
        }

        Err(ReadError::StringTooLong {
            address,
            max: MAX_STRING_LEN,
        })
    }
}

impl<A: AddressSpace + ?Sized> AddressSpaceExt for A {}

/// Address space of the current process
///
/// Used when the crate runs injected into the client: foreign addresses are
/// plain pointers in our own address space.
#[derive(Debug, Default, Clone, Copy)]
pub struct InProcessMemory;

impl AddressSpace for InProcessMemory {
    fn read_bytes(&self, address: Address, buf: &mut [u8]) -> Result<(), ReadError> {
        if address.is_null() {
            return Err(ReadError::NullAddress);
        }
        if address.raw() < MIN_VALID_ADDRESS || address.raw().checked_add(buf.len()).is_none() {
            return Err(ReadError::Unmapped {
                address,
                len: buf.len(),
            });
        }

        // SAFETY: the host owns this address space; the caller got `address`
        // from the client, which keeps the object alive while the owner
        // thread holds control.
        unsafe {
            std::ptr::copy_nonoverlapping(
                address.raw() as *const u8,
                buf.as_mut_ptr(),
                buf.len(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_process_read() {
        let value: u64 = 0x1122_3344_5566_7788;
        let address = Address::new(&value as *const u64 as usize);
        assert_eq!(InProcessMemory.read::<u64>(address), Ok(value));
    }

    #[test]
    fn test_in_process_string() {
        let text = b"Hogger\0";
        let address = Address::new(text.as_ptr() as usize);
        assert_eq!(InProcessMemory.read_string(address).unwrap(), "Hogger");
    }

    #[test]
    fn test_null_rejected() {
        assert_eq!(
            InProcessMemory.read::<u32>(Address::NULL),
            Err(ReadError::NullAddress)
        );
        assert!(matches!(
            InProcessMemory.read::<u32>(Address::new(0x20)),
            Err(ReadError::Unmapped { .. })
        ));
    }
}
