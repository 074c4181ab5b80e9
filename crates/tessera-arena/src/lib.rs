//! First-fit bitmap allocation over a caller-owned, fixed-size arena.
//!
//! The arena is a byte buffer the caller owns. This crate never reads or
//! writes it; it only hands out pointers into it and tracks which bytes are
//! free in a bit-per-byte occupancy map. Several independent consumers,
//! possibly with different element types, can share one buffer by holding
//! handles that share the same map.
//!
//! # Architecture
//!
//! ```text
//! ArenaAllocator<T> (element-typed adapter: n -> n * size_of::<T>() bytes)
//! └── RawArena (byte capability: allocate_bytes / free_bytes)
//!     ├── start: NonNull<u8> (borrowed buffer, never owned)
//!     └── Rc<RefCell<SharedState>> (one per root construction)
//!         ├── OccupancyMap → Bitmap (1 = free, 0 = used)
//!         └── Option<Ledger> (outstanding blocks, opt-in)
//! ```
//!
//! [`engine`] holds the stateless algorithms: demand masks, first-fit
//! search, reserve, release.
//!
//! # Known limitations
//!
//! - First-fit only; free space is never compacted. A request fails if no
//!   single free run is long enough, whatever the total free space.
//! - A container that grows by allocating the new block before freeing the
//!   old one can fail even when the two together would fit.
//! - Without [`ArenaConfig::track_allocations`], frees are not checked
//!   against earlier allocations.
//! - Single-threaded: handles are `!Send` and `!Sync`.
//! - Pointers are only byte-aligned.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod config;
pub mod engine;
pub mod error;
pub mod handle;
mod ledger;
pub mod map;
mod raw;
pub mod stats;

// Public re-exports for the primary API surface.
pub use arena::RawArena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::ArenaAllocator;
pub use map::OccupancyMap;
pub use stats::ArenaStats;
pub use tessera_bits::Bitmap;
