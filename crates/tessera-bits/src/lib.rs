//! Fixed-length bit vector for Tessera occupancy tracking.
//!
//! [`Bitmap`] wraps a [`bitvec`] `BitVec<u64, Lsb0>`: bit `i` lives in word
//! `i / 64` at position `i % 64`. The length is chosen at construction and
//! never changes.
//!
//! On top of the storage it adds the vocabulary the allocator speaks:
//!
//! - Single-bit access: [`test`](Bitmap::test), [`set`](Bitmap::set),
//!   [`clear`](Bitmap::clear)
//! - Whole-vector logic: `&`, `|`, `^`, `!` and their assigning forms
//! - Shifts: `<<` moves bit `i` to `i + k`, `>>` moves bit `i` to `i - k`;
//!   bits pushed past either end are dropped
//! - Queries: population count, next set/clear bit at or after a position,
//!   maximal runs of set bits
//!
//! Binary operations between bitmaps of different lengths are a programming
//! error and panic.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::error::Error;
use std::fmt;
use std::iter;
use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Range, Shl, ShlAssign,
    Shr, ShrAssign,
};
use std::str::FromStr;

use bitvec::prelude::*;

type Bits = BitVec<u64, Lsb0>;

/// A fixed-length bit vector.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitmap {
    bits: Bits,
}

impl Bitmap {
    /// Create a bitmap of `len` bits, all clear.
    pub fn new(len: usize) -> Self {
        Self {
            bits: Bits::repeat(false, len),
        }
    }

    /// Create a bitmap of `len` bits, all set.
    pub fn filled(len: usize) -> Self {
        Self {
            bits: Bits::repeat(true, len),
        }
    }

    /// Create a bitmap of `len` bits whose first `prefix` bits are set.
    ///
    /// # Panics
    ///
    /// Panics if `prefix > len`.
    pub fn with_prefix(len: usize, prefix: usize) -> Self {
        assert!(
            prefix <= len,
            "prefix of {prefix} bits exceeds bitmap length {len}"
        );
        let mut bitmap = Self::new(len);
        bitmap.bits[..prefix].fill(true);
        bitmap
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the bitmap has zero length.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Value of bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn test(&self, index: usize) -> bool {
        self.check_index(index);
        self.bits[index]
    }

    /// Set bit `index`.
    pub fn set(&mut self, index: usize) {
        self.check_index(index);
        self.bits.set(index, true);
    }

    /// Clear bit `index`.
    pub fn clear(&mut self, index: usize) {
        self.check_index(index);
        self.bits.set(index, false);
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Number of clear bits.
    pub fn count_zeros(&self) -> usize {
        self.bits.count_zeros()
    }

    /// Smallest index `>= pos` whose bit is set, or `len` if there is none.
    pub fn find_next_set(&self, pos: usize) -> usize {
        let len = self.len();
        if pos >= len {
            return len;
        }
        self.bits[pos..].first_one().map_or(len, |i| pos + i)
    }

    /// Smallest index `>= pos` whose bit is clear, or `len` if there is none.
    pub fn find_next_clear(&self, pos: usize) -> usize {
        let len = self.len();
        if pos >= len {
            return len;
        }
        self.bits[pos..].first_zero().map_or(len, |i| pos + i)
    }

    /// Length of the longest maximal run of set bits.
    ///
    /// A run touching the end of the bitmap counts like any other.
    pub fn longest_run_of_ones(&self) -> usize {
        self.runs_of_ones().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Iterate the maximal runs of set bits in ascending order.
    pub fn runs_of_ones(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let mut pos = 0;
        iter::from_fn(move || {
            let start = self.find_next_set(pos);
            if start >= self.len() {
                pos = start;
                return None;
            }
            pos = self.find_next_clear(start);
            Some(start..pos)
        })
    }

    /// Whether every bit set in `self` is also set in `other`.
    ///
    /// Equivalent to `(self & other) == self`, without the temporary.
    pub fn is_subset_of(&self, other: &Bitmap) -> bool {
        self.assert_same_len(other);
        self.bits.iter_ones().all(|i| other.bits[i])
    }

    /// Iterate the bits in index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.len(),
            "bit index {index} out of range for bitmap of length {}",
            self.len()
        );
    }

    fn assert_same_len(&self, other: &Bitmap) {
        assert_eq!(
            self.len(),
            other.len(),
            "bitmap length mismatch: {} vs {}",
            self.len(),
            other.len()
        );
    }

    // `bitvec` names shifts by direction in memory: `shift_right` moves bits
    // towards higher indices.
    fn shift_up(&mut self, k: usize) {
        if k >= self.len() {
            self.bits.fill(false);
        } else {
            self.bits.shift_right(k);
        }
    }

    fn shift_down(&mut self, k: usize) {
        if k >= self.len() {
            self.bits.fill(false);
        } else {
            self.bits.shift_left(k);
        }
    }
}

impl BitAndAssign<&Bitmap> for Bitmap {
    fn bitand_assign(&mut self, rhs: &Bitmap) {
        self.assert_same_len(rhs);
        self.bits &= rhs.bits.as_bitslice();
    }
}

impl BitOrAssign<&Bitmap> for Bitmap {
    fn bitor_assign(&mut self, rhs: &Bitmap) {
        self.assert_same_len(rhs);
        self.bits |= rhs.bits.as_bitslice();
    }
}

impl BitXorAssign<&Bitmap> for Bitmap {
    fn bitxor_assign(&mut self, rhs: &Bitmap) {
        self.assert_same_len(rhs);
        self.bits ^= rhs.bits.as_bitslice();
    }
}

impl BitAnd<&Bitmap> for &Bitmap {
    type Output = Bitmap;

    fn bitand(self, rhs: &Bitmap) -> Bitmap {
        let mut out = self.clone();
        out &= rhs;
        out
    }
}

impl BitOr<&Bitmap> for &Bitmap {
    type Output = Bitmap;

    fn bitor(self, rhs: &Bitmap) -> Bitmap {
        let mut out = self.clone();
        out |= rhs;
        out
    }
}

impl BitXor<&Bitmap> for &Bitmap {
    type Output = Bitmap;

    fn bitxor(self, rhs: &Bitmap) -> Bitmap {
        let mut out = self.clone();
        out ^= rhs;
        out
    }
}

impl Not for Bitmap {
    type Output = Bitmap;

    fn not(self) -> Bitmap {
        Self { bits: !self.bits }
    }
}

impl Not for &Bitmap {
    type Output = Bitmap;

    fn not(self) -> Bitmap {
        !self.clone()
    }
}

impl ShlAssign<usize> for Bitmap {
    fn shl_assign(&mut self, k: usize) {
        self.shift_up(k);
    }
}

impl Shl<usize> for Bitmap {
    type Output = Bitmap;

    fn shl(mut self, k: usize) -> Bitmap {
        self.shift_up(k);
        self
    }
}

impl Shl<usize> for &Bitmap {
    type Output = Bitmap;

    fn shl(self, k: usize) -> Bitmap {
        self.clone() << k
    }
}

impl ShrAssign<usize> for Bitmap {
    fn shr_assign(&mut self, k: usize) {
        self.shift_down(k);
    }
}

impl Shr<usize> for Bitmap {
    type Output = Bitmap;

    fn shr(mut self, k: usize) -> Bitmap {
        self.shift_down(k);
        self
    }
}

impl Shr<usize> for &Bitmap {
    type Output = Bitmap;

    fn shr(self, k: usize) -> Bitmap {
        self.clone() >> k
    }
}

impl FromIterator<bool> for Bitmap {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// Renders bit 0 first, as `0` and `1` characters.
impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitmap({}: {self})", self.len())
    }
}

/// Error returned when parsing a [`Bitmap`] from a string of `0`/`1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseBitmapError {
    /// Byte position of the offending character.
    pub position: usize,
    /// The offending character.
    pub found: char,
}

impl fmt::Display for ParseBitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid bit character {:?} at position {}",
            self.found, self.position
        )
    }
}

impl Error for ParseBitmapError {}

/// Parses the [`Display`](fmt::Display) form: bit 0 first, `_` ignored.
impl FromStr for Bitmap {
    type Err = ParseBitmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = Bits::with_capacity(s.len());
        for (position, c) in s.char_indices() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                '_' => {}
                found => return Err(ParseBitmapError { position, found }),
            }
        }
        Ok(Self { bits })
    }
}
