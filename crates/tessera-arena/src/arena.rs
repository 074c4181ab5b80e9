//! Byte-granularity allocation over a caller-owned buffer.
//!
//! A [`RawArena`] is a cheap, clonable handle: the arena start address, a
//! reference-counted shared state (occupancy map plus optional ledger), and
//! an optional name. Every clone observes and mutates the same state. Two
//! root constructions never share state, even over the same buffer address.
//!
//! The buffer is borrowed for `'a`, so it outlives every handle. Nothing is
//! ever written to the buffer; all bookkeeping lives in the shared state.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::rc::Rc;

use tracing::debug;

use crate::config::ArenaConfig;
use crate::engine;
use crate::error::ArenaError;
use crate::ledger::Ledger;
use crate::map::OccupancyMap;
use crate::raw;
use crate::stats::ArenaStats;

/// State shared by every handle derived from one root construction.
struct SharedState {
    map: OccupancyMap,
    ledger: Option<Ledger>,
}

/// Byte-level allocation handle over a fixed-size arena.
///
/// Cloning is cheap and shares the occupancy map. Handles are neither
/// `Send` nor `Sync`; an arena and all its handles belong to one thread.
#[derive(Clone)]
pub struct RawArena<'a> {
    start: NonNull<u8>,
    state: Rc<RefCell<SharedState>>,
    name: Option<Rc<str>>,
    _buf: PhantomData<&'a mut [u8]>,
}

impl<'a> RawArena<'a> {
    /// Manage `buf` with a default config.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is empty.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self::with_config(buf, ArenaConfig::new())
    }

    /// Manage `buf` with the given config.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is empty.
    pub fn with_config(buf: &'a mut [u8], config: ArenaConfig) -> Self {
        match Self::try_with_config(buf, config) {
            Ok(arena) => arena,
            Err(err) => panic!("{err}"),
        }
    }

    /// Manage `buf`, returning [`ArenaError::InvalidArgument`] if it is empty.
    pub fn try_with_config(buf: &'a mut [u8], config: ArenaConfig) -> Result<Self, ArenaError> {
        if buf.is_empty() {
            return Err(ArenaError::InvalidArgument {
                reason: "arena buffer is empty".into(),
            });
        }
        let size = buf.len();
        let start = NonNull::from(buf).cast::<u8>();
        Ok(Self::root(start, size, config))
    }

    /// Manage `size` bytes starting at `start`.
    ///
    /// # Safety
    ///
    /// `start..start + size` must be a single allocation that stays valid,
    /// and is not accessed except through pointers handed out by this arena,
    /// for `'a`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is null or `size` is zero.
    #[allow(unsafe_code)]
    pub unsafe fn from_raw_parts(start: *mut u8, size: usize, config: ArenaConfig) -> Self {
        let start = NonNull::new(start).unwrap_or_else(|| {
            panic!(
                "{}",
                ArenaError::InvalidArgument {
                    reason: "arena start is null".into(),
                }
            )
        });
        assert!(size > 0, "invalid arena argument: arena size is zero");
        Self::root(start, size, config)
    }

    fn root(start: NonNull<u8>, size: usize, config: ArenaConfig) -> Self {
        let arena = Self {
            start,
            state: Rc::new(RefCell::new(SharedState {
                map: OccupancyMap::new(size),
                ledger: config.track_allocations.then(Ledger::new),
            })),
            name: config.name.map(Rc::from),
            _buf: PhantomData,
        };
        debug!(
            arena = arena.label(),
            start = ?start,
            size,
            tracked = config.track_allocations,
            "arena created"
        );
        arena
    }

    /// Reserve `nb` contiguous bytes using first-fit.
    ///
    /// Returns [`ArenaError::OutOfMemory`] when `nb` is zero, larger than the
    /// arena, or when no single free run of `nb` bytes exists even though
    /// the total free space might be enough. The map is unchanged on error.
    pub fn allocate_bytes(&self, nb: usize) -> Result<NonNull<u8>, ArenaError> {
        let mut state = self.state.borrow_mut();
        let size = state.map.size();
        if nb == 0 || nb > size {
            debug!(
                arena = self.label(),
                requested = nb,
                capacity = size,
                "rejected allocation size"
            );
            return Err(out_of_memory(&state.map, nb));
        }

        let mut mask = engine::build_demand_mask(nb, size);
        let pos = engine::find_free_run(&state.map, &mut mask);
        if pos >= size {
            debug!(
                arena = self.label(),
                requested = nb,
                free = state.map.count_free(),
                "no contiguous free run"
            );
            return Err(out_of_memory(&state.map, nb));
        }

        engine::reserve(&mut state.map, &mask);
        if let Some(ledger) = state.ledger.as_mut() {
            ledger.record(pos, nb);
        }
        debug!(
            arena = self.label(),
            offset = pos,
            bytes = nb,
            free = state.map.count_free(),
            "reserved"
        );
        Ok(raw::offset_ptr(self.start, pos))
    }

    /// Release `nb` bytes starting at `ptr`.
    ///
    /// Without allocation tracking the bytes are marked free whatever their
    /// previous state, so a double free or a wrong length is silently
    /// accepted. `nb == 0` releases nothing.
    ///
    /// # Panics
    ///
    /// Panics if `[ptr, ptr + nb)` is not inside the arena, or, with
    /// tracking enabled, if it does not match an outstanding allocation.
    pub fn free_bytes(&self, ptr: NonNull<u8>, nb: usize) {
        if let Err(err) = self.try_free_bytes(ptr, nb) {
            panic!("arena {}: {err}", self.label());
        }
    }

    /// Checked form of [`free_bytes`](Self::free_bytes).
    ///
    /// Returns [`ArenaError::OutOfRange`] or [`ArenaError::UnknownBlock`]
    /// instead of panicking. The map is unchanged on error.
    pub fn try_free_bytes(&self, ptr: NonNull<u8>, nb: usize) -> Result<(), ArenaError> {
        let mut state = self.state.borrow_mut();
        let size = state.map.size();
        let offset = raw::offset_of(self.start, ptr)
            .filter(|&offset| offset < size && nb <= size - offset)
            .ok_or_else(|| ArenaError::OutOfRange {
                address: ptr.as_ptr().addr(),
                len: nb,
                start: self.start.as_ptr().addr(),
                end: raw::end_addr(self.start, size),
            })?;
        if nb == 0 {
            return Ok(());
        }
        if let Some(ledger) = state.ledger.as_mut() {
            ledger.release(offset, nb)?;
        }

        let mask = engine::demand_mask_at(nb, offset, size);
        engine::release(&mut state.map, &mask);
        debug!(
            arena = self.label(),
            offset,
            bytes = nb,
            free = state.map.count_free(),
            "released"
        );
        Ok(())
    }

    /// Size in bytes of the largest allocation that would succeed now.
    ///
    /// This is the longest free run, not the total free space.
    pub fn max_size(&self) -> usize {
        engine::longest_free_run(&self.state.borrow().map)
    }

    /// Arena size in bytes.
    pub fn capacity(&self) -> usize {
        self.state.borrow().map.size()
    }

    /// Total free bytes, contiguous or not.
    pub fn free_bytes_total(&self) -> usize {
        self.state.borrow().map.count_free()
    }

    /// First byte of the arena.
    pub fn start(&self) -> NonNull<u8> {
        self.start
    }

    /// Address one past the last byte of the arena.
    pub fn end(&self) -> usize {
        raw::end_addr(self.start, self.capacity())
    }

    /// Diagnostic name, if one was configured.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether `ptr` points into the arena.
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        self.offset_of(ptr).is_some()
    }

    /// Arena offset of `ptr`, or `None` if it is outside the arena.
    pub fn offset_of(&self, ptr: NonNull<u8>) -> Option<usize> {
        raw::offset_of(self.start, ptr).filter(|&offset| offset < self.capacity())
    }

    /// Snapshot of the occupancy map.
    pub fn occupancy(&self) -> OccupancyMap {
        self.state.borrow().map.clone()
    }

    /// Point-in-time occupancy statistics.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats::of(&self.state.borrow().map)
    }

    /// Number of outstanding blocks, or `None` without allocation tracking.
    pub fn outstanding(&self) -> Option<usize> {
        self.state.borrow().ledger.as_ref().map(Ledger::len)
    }

    /// Outstanding `(offset, len)` blocks sorted by offset, or `None`
    /// without allocation tracking.
    pub fn outstanding_blocks(&self) -> Option<Vec<(usize, usize)>> {
        self.state.borrow().ledger.as_ref().map(Ledger::blocks)
    }

    /// Whether `other` shares this handle's occupancy map.
    ///
    /// True only for handles derived from the same root construction. This
    /// is an identity check, unlike `==`.
    pub fn shares_state_with(&self, other: &RawArena<'_>) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub(crate) fn label(&self) -> &str {
        self.name().unwrap_or("<unnamed>")
    }
}

fn out_of_memory(map: &OccupancyMap, requested: usize) -> ArenaError {
    ArenaError::OutOfMemory {
        requested,
        largest_free: map.longest_free_run(),
        capacity: map.size(),
    }
}

/// Structural equality: same map size and bit pattern.
///
/// Unrelated arenas whose maps happen to match compare equal. Use
/// [`RawArena::shares_state_with`] for identity.
impl PartialEq<RawArena<'_>> for RawArena<'_> {
    fn eq(&self, other: &RawArena<'_>) -> bool {
        self.state.borrow().map == other.state.borrow().map
    }
}

/// Dump: name, one character per byte (`.` free, `#` used), and bounds.
impl fmt::Display for RawArena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        write!(
            f,
            "free memory ({}): {} at [{:p}, {:#x})",
            self.label(),
            state.map,
            self.start,
            raw::end_addr(self.start, state.map.size())
        )
    }
}

impl fmt::Debug for RawArena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("RawArena")
            .field("name", &self.name())
            .field("start", &self.start)
            .field("capacity", &state.map.size())
            .field("free", &state.map.count_free())
            .field("handles", &Rc::strong_count(&self.state))
            .finish()
    }
}
