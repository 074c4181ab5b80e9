//! Tessera: a fixed-capacity arena allocator with a shared occupancy map.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Tessera sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! let mut buf = [0u8; 9];
//! let bytes = ArenaAllocator::<u8>::named(&mut buf, "mem1");
//! let triples = bytes.rebind::<(u8, u8, u8)>();
//!
//! // Both handles draw from the same nine bytes.
//! let p = bytes.allocate(8).unwrap();
//! assert_eq!(bytes.max_size(), 1);
//! assert!(triples.allocate(2).unwrap_err().is_out_of_memory());
//!
//! bytes.deallocate(p, 8);
//! assert_eq!(triples.max_elements(), 3);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `tessera-arena` | Handles, occupancy map, first-fit engine, errors |
//! | [`bits`] | `tessera-bits` | Fixed-length bit vector over `bitvec` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Allocator handles, occupancy map, and first-fit engine (`tessera-arena`).
///
/// [`arena::ArenaAllocator`] is the element-typed handle containers use;
/// [`arena::RawArena`] is the byte-level capability underneath it.
pub use tessera_arena as arena;

/// Fixed-length bit vector (`tessera-bits`).
pub use tessera_bits as bits;

/// Common imports for typical Tessera usage.
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    pub use tessera_arena::{
        ArenaAllocator, ArenaConfig, ArenaError, ArenaStats, OccupancyMap, RawArena,
    };
}
