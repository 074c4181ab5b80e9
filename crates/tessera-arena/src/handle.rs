//! Typed allocator handles for container integration.
//!
//! An [`ArenaAllocator<T>`] is a [`RawArena`] plus an element type. The
//! element type only converts element counts to byte counts
//! (`n * size_of::<T>()`); all state lives in the shared arena. Rebinding to
//! another element type keeps the shared state, so containers of different
//! element types can cooperate inside one buffer.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::arena::RawArena;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::stats::ArenaStats;

/// Element-typed handle over a shared arena.
///
/// Cheap to clone; clones and rebinds share the occupancy map.
///
/// Pointers are byte-aligned only. Callers placing types with alignment
/// greater than one must arrange alignment themselves.
#[must_use]
pub struct ArenaAllocator<'a, T> {
    raw: RawArena<'a>,
    _elem: PhantomData<fn() -> T>,
}

impl<'a, T> ArenaAllocator<'a, T> {
    /// Manage `buf` with no name and no tracking.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is empty.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self::from_raw(RawArena::new(buf))
    }

    /// Manage `buf` under a diagnostic name.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is empty.
    pub fn named(buf: &'a mut [u8], name: &str) -> Self {
        Self::with_config(buf, ArenaConfig::new().named(name))
    }

    /// Manage `buf` with the given config.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is empty.
    pub fn with_config(buf: &'a mut [u8], config: ArenaConfig) -> Self {
        Self::from_raw(RawArena::with_config(buf, config))
    }

    /// Checked form of [`with_config`](Self::with_config).
    pub fn try_with_config(buf: &'a mut [u8], config: ArenaConfig) -> Result<Self, ArenaError> {
        RawArena::try_with_config(buf, config).map(Self::from_raw)
    }

    /// Manage `size` bytes starting at `start`.
    ///
    /// # Safety
    ///
    /// Same contract as [`RawArena::from_raw_parts`].
    ///
    /// # Panics
    ///
    /// Panics if `start` is null or `size` is zero.
    #[allow(unsafe_code)]
    pub unsafe fn from_raw_parts(start: *mut u8, size: usize, config: ArenaConfig) -> Self {
        // SAFETY: forwarded from the caller.
        Self::from_raw(unsafe { RawArena::from_raw_parts(start, size, config) })
    }

    /// Wrap an existing byte handle, sharing its state.
    pub fn from_raw(raw: RawArena<'a>) -> Self {
        Self {
            raw,
            _elem: PhantomData,
        }
    }

    /// Handle for element type `U` over the same shared state.
    pub fn rebind<U>(&self) -> ArenaAllocator<'a, U> {
        ArenaAllocator::from_raw(self.raw.clone())
    }

    /// Reserve room for `n` contiguous elements.
    ///
    /// Fails with [`ArenaError::OutOfMemory`] when `n * size_of::<T>()` is
    /// zero, overflows, exceeds the arena, or does not fit in any single
    /// free run.
    pub fn allocate(&self, n: usize) -> Result<NonNull<T>, ArenaError> {
        self.raw.allocate_bytes(Self::bytes_for(n)).map(NonNull::cast)
    }

    /// Release `n` elements starting at `ptr`.
    ///
    /// The range is recomputed from `(ptr, n)`; see
    /// [`RawArena::free_bytes`] for what is and is not checked.
    ///
    /// # Panics
    ///
    /// Panics if the range lies outside the arena.
    pub fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        self.raw.free_bytes(ptr.cast(), Self::bytes_for(n));
    }

    /// Checked form of [`deallocate`](Self::deallocate).
    pub fn try_deallocate(&self, ptr: NonNull<T>, n: usize) -> Result<(), ArenaError> {
        self.raw.try_free_bytes(ptr.cast(), Self::bytes_for(n))
    }

    /// Largest allocation in bytes that would succeed now.
    pub fn max_size(&self) -> usize {
        self.raw.max_size()
    }

    /// Largest element count [`allocate`](Self::allocate) would accept now.
    pub fn max_elements(&self) -> usize {
        match mem::size_of::<T>() {
            0 => 0,
            size => self.max_size() / size,
        }
    }

    /// Move `value` into the storage at `ptr`. Allocates nothing.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `U` and aligned for `U`. Any value
    /// already there is overwritten without being dropped.
    #[allow(unsafe_code)]
    pub unsafe fn construct_at<U>(&self, ptr: NonNull<U>, value: U) {
        // SAFETY: upheld by the caller.
        unsafe { ptr.write(value) }
    }

    /// Drop the value at `ptr` in place. Frees nothing.
    ///
    /// # Safety
    ///
    /// `ptr` must point to an initialised, aligned `U` that is not used
    /// again until re-initialised.
    #[allow(unsafe_code)]
    pub unsafe fn destroy_at<U>(&self, ptr: NonNull<U>) {
        // SAFETY: upheld by the caller.
        unsafe { ptr.drop_in_place() }
    }

    /// Underlying byte handle.
    pub fn as_raw(&self) -> &RawArena<'a> {
        &self.raw
    }

    /// Diagnostic name, if one was configured.
    pub fn name(&self) -> Option<&str> {
        self.raw.name()
    }

    /// First byte of the arena.
    pub fn start(&self) -> NonNull<u8> {
        self.raw.start()
    }

    /// Address one past the last byte of the arena.
    pub fn end(&self) -> usize {
        self.raw.end()
    }

    /// Point-in-time occupancy statistics.
    pub fn stats(&self) -> ArenaStats {
        self.raw.stats()
    }

    /// Whether `other` shares this handle's occupancy map.
    pub fn shares_state_with<U>(&self, other: &ArenaAllocator<'_, U>) -> bool {
        self.raw.shares_state_with(&other.raw)
    }

    fn bytes_for(n: usize) -> usize {
        // Saturating keeps overflowed requests on the out-of-memory path.
        n.saturating_mul(mem::size_of::<T>())
    }
}

impl<T> Clone for ArenaAllocator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            _elem: PhantomData,
        }
    }
}

impl<'a, T> From<RawArena<'a>> for ArenaAllocator<'a, T> {
    fn from(raw: RawArena<'a>) -> Self {
        Self::from_raw(raw)
    }
}

/// Structural equality of the occupancy maps, across element types.
impl<T, U> PartialEq<ArenaAllocator<'_, U>> for ArenaAllocator<'_, T> {
    fn eq(&self, other: &ArenaAllocator<'_, U>) -> bool {
        self.raw == other.raw
    }
}

impl<T> fmt::Display for ArenaAllocator<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

impl<T> fmt::Debug for ArenaAllocator<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaAllocator")
            .field("element", &std::any::type_name::<T>())
            .field("arena", &self.raw)
            .finish()
    }
}
