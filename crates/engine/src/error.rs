//! Error types for foreign memory access

use zzrust_sdk::Address;

/// Error type for address space reads
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// Attempted to read through the null address
    #[error("Read from null address")]
    NullAddress,

    /// The requested range is not readable
    #[error("Unreadable range: {len} bytes at {address}")]
    Unmapped { address: Address, len: usize },

    /// No terminator found within the string limit
    #[error("String at {address} exceeds {max} bytes")]
    StringTooLong { address: Address, max: usize },
}
