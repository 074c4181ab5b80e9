//! Low-level pointer arithmetic between arena offsets and addresses.
//!
//! The only `unsafe` in this module is [`offset_ptr`]; every other helper
//! works on plain addresses.

#![allow(unsafe_code)]

use std::ptr::NonNull;

/// Pointer to byte `offset` of the arena starting at `start`.
///
/// Callers must pass `offset < size` for the arena `start` belongs to.
pub(crate) fn offset_ptr(start: NonNull<u8>, offset: usize) -> NonNull<u8> {
    // SAFETY: `offset` is strictly inside the arena buffer, so the result
    // stays within the same allocated object as `start` and is non-null.
    unsafe { start.add(offset) }
}

/// Byte offset of `ptr` from `start`, or `None` if `ptr` lies before it.
pub(crate) fn offset_of(start: NonNull<u8>, ptr: NonNull<u8>) -> Option<usize> {
    ptr.as_ptr().addr().checked_sub(start.as_ptr().addr())
}

/// Address one past the last byte of an arena of `size` bytes.
pub(crate) fn end_addr(start: NonNull<u8>, size: usize) -> usize {
    start.as_ptr().addr() + size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_round_trip() {
        let mut buf = [0u8; 16];
        let start = NonNull::from(&mut buf).cast::<u8>();
        let p = offset_ptr(start, 5);
        assert_eq!(offset_of(start, p), Some(5));
        assert_eq!(end_addr(start, 16) - start.as_ptr().addr(), 16);
    }

    #[test]
    fn pointer_before_start_has_no_offset() {
        let mut buf = [0u8; 16];
        let base = NonNull::from(&mut buf).cast::<u8>();
        let start = offset_ptr(base, 4);
        assert_eq!(offset_of(start, base), None);
    }
}
