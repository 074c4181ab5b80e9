//! Test utilities for Tessera development.
//!
//! - [`ArenaVec`]: a minimal growable container that gets its storage from
//!   an [`ArenaAllocator`](tessera_arena::ArenaAllocator) and grows the way
//!   standard vectors do (allocate the new block, move, then free the old).
//! - [`fixtures`]: canned arena states and logging setup.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod vec;

pub use fixtures::{fragmented_arena, init_tracing, pattern};
pub use vec::ArenaVec;
