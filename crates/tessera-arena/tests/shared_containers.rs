//! Integration test: two containers of different element types sharing one
//! 30-byte arena, plus a second independent arena.
//!
//! Growth through `ArenaVec::reserve` allocates the new block before freeing
//! the old one, so it can fail even when the old block plus the remaining
//! free space would be enough.

use tessera_arena::ArenaAllocator;
use tessera_test_utils::{init_tracing, pattern, ArenaVec};

type Triple = (u8, u8, u8);

const MEMSIZE: usize = 30;

#[test]
fn cooperating_containers_share_one_arena() {
    init_tracing();
    let mut mem1 = [0u8; MEMSIZE];
    let mut mem2 = [0u8; MEMSIZE];

    let sma_s1 = ArenaAllocator::<u8>::named(&mut mem1, "mem1");
    let sma_t1 = sma_s1.rebind::<Triple>();
    let sma_t2 = ArenaAllocator::<Triple>::named(&mut mem2, "mem2");

    let mut uvec1 = ArenaVec::new(sma_s1.clone());
    let mut cvec1 = ArenaVec::new(sma_t1);
    let mut cvec2 = ArenaVec::new(sma_t2);

    // Reserve 9 bytes; growing to 22 would need the 9 freed first.
    uvec1.reserve(9).unwrap();
    let err = uvec1.reserve(MEMSIZE - 9 + 1).unwrap_err();
    assert!(err.is_out_of_memory());
    assert_eq!(uvec1.capacity(), 9);

    for i in 1..=8 {
        uvec1.push(i).unwrap();
    }
    assert_eq!(uvec1.len(), 8);

    // The tuple vector lands right after the byte vector.
    cvec1.reserve(3).unwrap();
    cvec1.push((11, 12, 13)).unwrap();
    cvec1.push((14, 15, 16)).unwrap();
    assert_eq!(pattern(sma_s1.as_raw()), format!("{}{}", "#".repeat(18), ".".repeat(12)));
    assert_eq!(uvec1.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8]);

    // 21 bytes are not available: cvec1 holds [9, 18).
    assert!(uvec1.reserve(MEMSIZE - 9).unwrap_err().is_out_of_memory());
    assert_eq!(uvec1.capacity(), 9);

    // 12 bytes fit in [18, 30); the old block [0, 9) is freed afterwards.
    uvec1.reserve(MEMSIZE - 9 - 9).unwrap();
    assert_eq!(uvec1.capacity(), 12);
    assert_eq!(
        pattern(sma_s1.as_raw()),
        format!("{}{}", ".".repeat(9), "#".repeat(21))
    );
    for i in 21..=24 {
        uvec1.push(i).unwrap();
    }
    assert_eq!(
        uvec1.as_slice(),
        &[1, 2, 3, 4, 5, 6, 7, 8, 21, 22, 23, 24]
    );

    cvec1.push((31, 32, 33)).unwrap();
    assert_eq!(cvec1.as_slice(), &[(11, 12, 13), (14, 15, 16), (31, 32, 33)]);

    // The second arena is untouched by everything above.
    cvec2.reserve(MEMSIZE / 3).unwrap();
    cvec2.assign_from(cvec1.as_slice()).unwrap();
    assert_eq!(cvec2.as_slice(), cvec1.as_slice());
    assert_eq!(cvec2.allocator().max_size(), 0);
    assert_eq!(sma_s1.max_size(), 9);
}

#[test]
fn growth_fails_when_old_block_blocks_the_new_one() {
    let mut mem = [0u8; 10];
    let alloc = ArenaAllocator::<u8>::new(&mut mem);
    let mut v = ArenaVec::new(alloc.clone());
    v.reserve(4).unwrap();
    // Old block [0,4) plus free [4,10) would hold 8 bytes, but not at once.
    assert!(v.reserve(8).unwrap_err().is_out_of_memory());
    assert_eq!(alloc.stats().free, 6);
    assert!(v.reserve(6).is_ok());
    assert_eq!(pattern(alloc.as_raw()), "....######");
}

#[test]
fn dropping_containers_returns_all_space() {
    let mut mem = [0u8; 16];
    let alloc = ArenaAllocator::<u8>::new(&mut mem);
    {
        let mut a = ArenaVec::new(alloc.clone());
        let mut b = ArenaVec::new(alloc.rebind::<Triple>());
        a.push(1).unwrap();
        b.push((1, 2, 3)).unwrap();
        a.push(2).unwrap();
        assert!(alloc.stats().free < 16);
    }
    assert_eq!(alloc.stats().free, 16);
    assert_eq!(alloc.max_size(), 16);
}
