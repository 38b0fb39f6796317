//! Plain-data marker trait

use crate::{Address, ItemCacheEntry};

/// Types that are valid for every bit pattern of their size
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` or primitive, contain no padding-sensitive
/// invariants, no references and no niches (`bool`, `char`, enums and
/// `NonNull` are excluded). Address space readers build values of these types
/// straight from foreign bytes.
pub unsafe trait Plain: Copy + 'static {}

macro_rules! impl_plain {
    ($($ty:ty),* $(,)?) => {
        $(unsafe impl Plain for $ty {})*
    };
}

impl_plain!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

unsafe impl<T: Plain, const N: usize> Plain for [T; N] {}
unsafe impl Plain for Address {}
unsafe impl Plain for ItemCacheEntry {}
