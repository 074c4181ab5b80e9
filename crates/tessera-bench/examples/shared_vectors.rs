//! Two containers of different element types sharing one static arena.
//!
//! Demonstrates: root construction → rebind → reserve → fill → failed growth
//! (allocate-before-free) → successful growth → a second independent arena.
//!
//! Run with `RUST_LOG=tessera_arena=debug` to see every reservation and
//! release.

use std::fmt::Debug;

use tessera_arena::{ArenaAllocator, ArenaError};
use tessera_test_utils::ArenaVec;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Triple = (u8, u8, u8);

const MEMSIZE: usize = 30;

fn print_vec<T: Debug>(vec: &ArenaVec<'_, T>, header: &str, footer: &str) {
    println!(
        "{header}({}/{}): {:?} - {footer}",
        vec.len(),
        vec.capacity(),
        vec.as_slice()
    );
}

fn report(what: &str, result: Result<(), ArenaError>) {
    match result {
        Ok(()) => println!("{what}: ok"),
        Err(err) => println!("{what}: {err}"),
    }
}

fn main() -> Result<(), ArenaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=== Tessera shared arena example ===\n");

    let mut mem1 = [0u8; MEMSIZE];
    let mut mem2 = [0u8; MEMSIZE];

    let sma_s1 = ArenaAllocator::<u8>::named(&mut mem1, "mem1");
    let sma_t1 = sma_s1.rebind::<Triple>();
    let sma_t2 = ArenaAllocator::<Triple>::named(&mut mem2, "mem2");
    info!(mem1 = %sma_s1, mem2 = %sma_t2, "allocators constructed");

    let mut uvec1 = ArenaVec::new(sma_s1.clone());
    let mut cvec1 = ArenaVec::new(sma_t1);
    let mut cvec2 = ArenaVec::new(sma_t2);

    uvec1.reserve(9)?;
    print_vec(&uvec1, "uvec1", "after reserving 9 bytes");

    // Growth allocates the new block before freeing the old one.
    report(
        "grow uvec1 to 22 while holding 9",
        uvec1.reserve(MEMSIZE - 9 + 1),
    );

    for i in 1..=8 {
        uvec1.push(i)?;
    }
    print_vec(&uvec1, "uvec1", "after adding eight numbers");

    cvec1.reserve(3)?;
    cvec1.push((11, 12, 13))?;
    cvec1.push((14, 15, 16))?;
    print_vec(&cvec1, "cvec1", "after adding two tuples");
    println!("{sma_s1}");

    report("grow uvec1 to 21", uvec1.reserve(MEMSIZE - 9));
    report("grow uvec1 to 12", uvec1.reserve(MEMSIZE - 9 - 9));
    for i in 21..=24 {
        uvec1.push(i)?;
    }
    print_vec(&uvec1, "uvec1", "after adding four numbers");

    cvec1.push((31, 32, 33))?;
    print_vec(&cvec1, "cvec1", "after adding one tuple");
    println!("{sma_s1}");
    println!("mem1: {}", sma_s1.stats());

    cvec2.reserve(MEMSIZE / 3)?;
    cvec2.assign_from(cvec1.as_slice())?;
    print_vec(&cvec2, "cvec2", "after copying cvec1");
    println!("{}", cvec2.allocator());

    println!("\nDone.");
    Ok(())
}
