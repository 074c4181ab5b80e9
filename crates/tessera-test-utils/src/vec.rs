//! Minimal growable container over an arena allocator.
//!
//! [`ArenaVec`] exists to drive the allocator the way a standard container
//! would. `reserve` allocates the new block before freeing the old one, so
//! growth needs the old and new blocks to be free at the same time.

#![allow(unsafe_code)]

use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

use tessera_arena::{ArenaAllocator, ArenaError};

/// Growable array whose storage comes from an [`ArenaAllocator`].
///
/// Only element types with alignment 1 are supported, since arena pointers
/// carry no alignment guarantee.
pub struct ArenaVec<'a, T> {
    alloc: ArenaAllocator<'a, T>,
    buf: Option<NonNull<T>>,
    len: usize,
    cap: usize,
}

impl<'a, T> ArenaVec<'a, T> {
    /// Empty vector; allocates nothing.
    ///
    /// # Panics
    ///
    /// Panics if `T` needs alignment greater than one or is zero-sized.
    pub fn new(alloc: ArenaAllocator<'a, T>) -> Self {
        assert_eq!(mem::align_of::<T>(), 1, "ArenaVec needs byte-aligned elements");
        assert_ne!(mem::size_of::<T>(), 0, "ArenaVec needs sized elements");
        Self {
            alloc,
            buf: None,
            len: 0,
            cap: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn allocator(&self) -> &ArenaAllocator<'a, T> {
        &self.alloc
    }

    /// Grow capacity to exactly `new_cap` if it is larger than the current one.
    ///
    /// Allocates the new block first, moves the elements, then frees the old
    /// block. On error nothing changes.
    pub fn reserve(&mut self, new_cap: usize) -> Result<(), ArenaError> {
        if new_cap <= self.cap {
            return Ok(());
        }
        let new_buf = self.alloc.allocate(new_cap)?;
        if let Some(old) = self.buf {
            // SAFETY: both blocks are live arena allocations reserved
            // separately, so they do not overlap, and `len <= cap` elements
            // are initialised in `old`.
            unsafe { ptr::copy_nonoverlapping(old.as_ptr(), new_buf.as_ptr(), self.len) };
            self.alloc.deallocate(old, self.cap);
        }
        self.buf = Some(new_buf);
        self.cap = new_cap;
        Ok(())
    }

    /// Append `value`, doubling capacity when full.
    pub fn push(&mut self, value: T) -> Result<(), ArenaError> {
        if self.len == self.cap {
            self.reserve((self.cap * 2).max(1))?;
        }
        let Some(buf) = self.buf else {
            unreachable!("reserve succeeded with non-zero capacity");
        };
        // SAFETY: `len < cap`, so the slot is inside the allocation, and
        // elements are byte-aligned.
        unsafe { self.alloc.construct_at(buf.add(self.len), value) };
        self.len += 1;
        Ok(())
    }

    /// Drop every element, keeping the capacity.
    pub fn clear(&mut self) {
        if let Some(buf) = self.buf {
            for i in 0..self.len {
                // SAFETY: elements `0..len` are initialised.
                unsafe { self.alloc.destroy_at(buf.add(i)) };
            }
        }
        self.len = 0;
    }

    pub fn as_slice(&self) -> &[T] {
        match self.buf {
            // SAFETY: `len` initialised, byte-aligned elements.
            Some(buf) => unsafe { slice::from_raw_parts(buf.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// Pointer to the storage, if any has been allocated.
    pub fn as_ptr(&self) -> Option<NonNull<T>> {
        self.buf
    }
}

impl<T: Clone> ArenaVec<'_, T> {
    /// Replace the contents with clones of `items`, growing as needed.
    pub fn assign_from(&mut self, items: &[T]) -> Result<(), ArenaError> {
        self.clear();
        self.reserve(items.len())?;
        for item in items {
            self.push(item.clone())?;
        }
        Ok(())
    }
}

impl<T> Drop for ArenaVec<'_, T> {
    fn drop(&mut self) {
        self.clear();
        if let Some(buf) = self.buf.take() {
            self.alloc.deallocate(buf, self.cap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_grows_by_doubling() {
        let mut buf = [0u8; 16];
        let mut v = ArenaVec::new(ArenaAllocator::<u8>::new(&mut buf));
        for i in 0..5 {
            v.push(i).unwrap();
        }
        assert_eq!(v.as_slice(), &[0, 1, 2, 3, 4]);
        assert_eq!(v.capacity(), 8);
    }

    #[test]
    fn drop_returns_storage() {
        let mut buf = [0u8; 8];
        let alloc = ArenaAllocator::<u8>::new(&mut buf);
        {
            let mut v = ArenaVec::new(alloc.clone());
            v.reserve(6).unwrap();
            assert_eq!(alloc.max_size(), 2);
        }
        assert_eq!(alloc.max_size(), 8);
    }

    #[test]
    fn failed_reserve_keeps_contents() {
        let mut buf = [0u8; 8];
        let mut v = ArenaVec::new(ArenaAllocator::<u8>::new(&mut buf));
        v.reserve(4).unwrap();
        v.push(7).unwrap();
        assert!(v.reserve(5).unwrap_err().is_out_of_memory());
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.as_slice(), &[7]);
    }
}
