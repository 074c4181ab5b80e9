//! Benchmark workloads for the Tessera arena allocator.
//!
//! - [`checkerboard`]: fill an arena with equal blocks, then free every
//!   other one, leaving maximal fragmentation for a given block size
//! - [`churn`]: repeated allocate/free rounds with a fixed size cycle

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::ptr::NonNull;

use tessera_arena::RawArena;

/// Fill `arena` with `block`-byte allocations and free every other one.
///
/// Returns the blocks still held, in address order. Afterwards no free run
/// is longer than `block` bytes (except at the tail).
pub fn checkerboard(arena: &RawArena<'_>, block: usize) -> Vec<NonNull<u8>> {
    let mut blocks = Vec::new();
    while let Ok(ptr) = arena.allocate_bytes(block) {
        blocks.push(ptr);
    }
    let mut held = Vec::with_capacity(blocks.len().div_ceil(2));
    for (index, ptr) in blocks.into_iter().enumerate() {
        if index % 2 == 0 {
            held.push(ptr);
        } else {
            arena.free_bytes(ptr, block);
        }
    }
    held
}

/// Run `rounds` rounds of allocating each size in `sizes` and then freeing
/// every second allocation (oldest first).
///
/// Returns how many allocations failed with out-of-memory. All surviving
/// allocations are freed before returning.
pub fn churn(arena: &RawArena<'_>, sizes: &[usize], rounds: usize) -> usize {
    let mut live: Vec<(NonNull<u8>, usize)> = Vec::new();
    let mut failures = 0;
    for _ in 0..rounds {
        for &nb in sizes {
            match arena.allocate_bytes(nb) {
                Ok(ptr) => live.push((ptr, nb)),
                Err(_) => failures += 1,
            }
        }
        let mut i = 0;
        live.retain(|&(ptr, nb)| {
            i += 1;
            if i % 2 == 0 {
                arena.free_bytes(ptr, nb);
                false
            } else {
                true
            }
        });
    }
    for (ptr, nb) in live {
        arena.free_bytes(ptr, nb);
    }
    failures
}
