//! Bit-per-byte occupancy tracking.
//!
//! An [`OccupancyMap`] holds one bit per arena byte: set means free, clear
//! means used. Its size is fixed at creation and equals the arena size.

use std::fmt;
use std::ops::Range;

use smallvec::SmallVec;
use tessera_bits::Bitmap;

/// Free/used state of every byte of an arena.
///
/// Equality is structural: two maps are equal when they have the same size
/// and the same bit pattern, regardless of which arena they describe.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OccupancyMap {
    bits: Bitmap,
}

impl OccupancyMap {
    /// Create a map of `size` bytes, all free.
    pub fn new(size: usize) -> Self {
        Self {
            bits: Bitmap::filled(size),
        }
    }

    /// Wrap an existing bitmap (set bit = free byte).
    pub fn from_bitmap(bits: Bitmap) -> Self {
        Self { bits }
    }

    /// Number of bytes tracked.
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    /// Whether byte `index` is free.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    pub fn is_free(&self, index: usize) -> bool {
        self.bits.test(index)
    }

    /// Mark byte `index` free.
    pub fn mark_free(&mut self, index: usize) {
        self.bits.set(index);
    }

    /// Mark byte `index` used.
    pub fn mark_used(&mut self, index: usize) {
        self.bits.clear(index);
    }

    /// Total number of free bytes, contiguous or not.
    pub fn count_free(&self) -> usize {
        self.bits.count_ones()
    }

    /// Total number of used bytes.
    pub fn count_used(&self) -> usize {
        self.bits.count_zeros()
    }

    /// Smallest free index `>= pos`, or `size` if every later byte is used.
    pub fn find_next_free(&self, pos: usize) -> usize {
        self.bits.find_next_set(pos)
    }

    /// Length of the longest run of consecutive free bytes.
    ///
    /// This is the largest single allocation the map can satisfy right now,
    /// not the total free space.
    pub fn longest_free_run(&self) -> usize {
        self.bits.longest_run_of_ones()
    }

    /// Maximal runs of free bytes in ascending order.
    pub fn free_runs(&self) -> SmallVec<[Range<usize>; 4]> {
        self.bits.runs_of_ones().collect()
    }

    /// Whether every byte in `range` is free.
    pub fn is_range_free(&self, range: Range<usize>) -> bool {
        range.end <= self.size() && self.find_next_used(range.start) >= range.end
    }

    /// Underlying bitmap (set bit = free byte).
    pub fn as_bitmap(&self) -> &Bitmap {
        &self.bits
    }

    pub(crate) fn bits_mut(&mut self) -> &mut Bitmap {
        &mut self.bits
    }

    fn find_next_used(&self, pos: usize) -> usize {
        self.bits.find_next_clear(pos)
    }
}

/// One character per byte: `.` free, `#` used.
impl fmt::Display for OccupancyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for free in self.bits.iter() {
            f.write_str(if free { "." } else { "#" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for OccupancyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OccupancyMap({}: {self})", self.size())
    }
}
