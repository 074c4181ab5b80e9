//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
///
/// Only [`OutOfMemory`](ArenaError::OutOfMemory) is returned by the plain
/// allocation path. The other variants describe programmer errors: the
/// plain constructors and free operations panic with them, and the `try_*`
/// variants return them instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Root construction with a null start address or an empty buffer.
    InvalidArgument {
        /// What was wrong with the arguments.
        reason: String,
    },
    /// No contiguous run of free bytes large enough for the request.
    ///
    /// Also returned for zero-byte requests, requests larger than the arena,
    /// and element counts whose byte size overflows `usize`. The occupancy
    /// map is unchanged when this is returned.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Largest single allocation that would have succeeded.
        largest_free: usize,
        /// Total arena size in bytes.
        capacity: usize,
    },
    /// A free whose byte range is not inside the arena.
    OutOfRange {
        /// Address passed to the free.
        address: usize,
        /// Number of bytes to release.
        len: usize,
        /// First address of the arena.
        start: usize,
        /// One past the last address of the arena.
        end: usize,
    },
    /// A free that does not match an outstanding allocation.
    ///
    /// Only reported when allocation tracking is enabled in
    /// [`ArenaConfig`](crate::ArenaConfig).
    UnknownBlock {
        /// Arena offset of the freed range.
        offset: usize,
        /// Number of bytes the caller tried to release.
        len: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid arena argument: {reason}"),
            Self::OutOfMemory {
                requested,
                largest_free,
                capacity,
            } => {
                write!(
                    f,
                    "out of memory: requested {requested} bytes, largest free run {largest_free} bytes, capacity {capacity} bytes"
                )
            }
            Self::OutOfRange {
                address,
                len,
                start,
                end,
            } => {
                write!(
                    f,
                    "free of {len} bytes at {address:#x} outside arena [{start:#x}, {end:#x})"
                )
            }
            Self::UnknownBlock { offset, len } => {
                write!(
                    f,
                    "no outstanding allocation of {len} bytes at offset {offset}"
                )
            }
        }
    }
}

impl Error for ArenaError {}

impl ArenaError {
    /// Whether this is an [`OutOfMemory`](ArenaError::OutOfMemory) error.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_out_of_memory() {
        let err = ArenaError::OutOfMemory {
            requested: 22,
            largest_free: 21,
            capacity: 30,
        };
        assert_eq!(
            err.to_string(),
            "out of memory: requested 22 bytes, largest free run 21 bytes, capacity 30 bytes"
        );
        assert!(err.is_out_of_memory());
    }

    #[test]
    fn display_out_of_range_uses_hex_addresses() {
        let err = ArenaError::OutOfRange {
            address: 0x20,
            len: 4,
            start: 0x10,
            end: 0x1a,
        };
        assert_eq!(
            err.to_string(),
            "free of 4 bytes at 0x20 outside arena [0x10, 0x1a)"
        );
        assert!(!err.is_out_of_memory());
    }
}
