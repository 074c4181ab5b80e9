//! Property test: the arena agrees with a naive byte-by-byte first-fit model
//! under random allocate/free sequences.

use proptest::prelude::*;
use tessera_arena::{ArenaConfig, RawArena};

#[derive(Clone, Debug)]
enum Op {
    Alloc(usize),
    /// Free the live block at this index (modulo the live count).
    Free(usize),
}

fn op_strategy(size: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (1..=size).prop_map(Op::Alloc),
        any::<usize>().prop_map(Op::Free),
    ]
}

/// Lowest start of `nb` consecutive free bytes, scanning one byte at a time.
fn model_first_fit(free: &[bool], nb: usize) -> Option<usize> {
    if nb == 0 || nb > free.len() {
        return None;
    }
    (0..=free.len() - nb).find(|&start| free[start..start + nb].iter().all(|&f| f))
}

fn model_longest_run(free: &[bool]) -> usize {
    free.split(|&f| !f).map(<[bool]>::len).max().unwrap_or(0)
}

proptest! {
    #[test]
    fn arena_matches_naive_first_fit(
        size in 1usize..96,
        ops in proptest::collection::vec(op_strategy(24), 1..60),
    ) {
        let mut buf = vec![0u8; size];
        let arena = RawArena::with_config(&mut buf, ArenaConfig::new().with_tracking(true));
        let mut model = vec![true; size];
        let mut live: Vec<(std::ptr::NonNull<u8>, usize, usize)> = Vec::new();

        for op in ops {
            match op {
                Op::Alloc(nb) => {
                    let expected = model_first_fit(&model, nb);
                    match arena.allocate_bytes(nb) {
                        Ok(ptr) => {
                            let offset = arena.offset_of(ptr).unwrap();
                            prop_assert_eq!(Some(offset), expected);
                            model[offset..offset + nb].fill(false);
                            live.push((ptr, offset, nb));
                        }
                        Err(err) => {
                            prop_assert!(err.is_out_of_memory());
                            prop_assert_eq!(expected, None);
                        }
                    }
                }
                Op::Free(i) => {
                    if live.is_empty() {
                        continue;
                    }
                    let (ptr, offset, nb) = live.swap_remove(i % live.len());
                    arena.free_bytes(ptr, nb);
                    model[offset..offset + nb].fill(true);
                }
            }

            let occupancy = arena.occupancy();
            let observed: Vec<bool> = (0..size).map(|i| occupancy.is_free(i)).collect();
            prop_assert_eq!(&observed, &model);
            prop_assert_eq!(arena.max_size(), model_longest_run(&model));
            prop_assert_eq!(arena.outstanding(), Some(live.len()));
        }
    }

    #[test]
    fn alloc_free_round_trip_restores_pattern(
        size in 1usize..64,
        prefill in proptest::collection::vec(1usize..8, 0..6),
        nb in 1usize..16,
    ) {
        let mut buf = vec![0u8; size];
        let arena = RawArena::new(&mut buf);
        for n in prefill {
            let _ = arena.allocate_bytes(n);
        }
        let before = arena.occupancy();
        if let Ok(ptr) = arena.allocate_bytes(nb) {
            arena.free_bytes(ptr, nb);
        }
        prop_assert_eq!(arena.occupancy(), before);
    }
}
