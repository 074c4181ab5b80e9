//! Canned arena states and logging setup for tests.

use tessera_arena::{ArenaConfig, RawArena};
use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Honours `RUST_LOG`; silent by default. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Occupancy pattern of `arena`, one character per byte (`.` free, `#` used).
pub fn pattern(arena: &RawArena<'_>) -> String {
    arena.occupancy().to_string()
}

/// A 10-byte arena with used `[0,5)`, free `[5,8)`, used `[8,10)`.
///
/// # Panics
///
/// Panics if `buf` is not exactly 10 bytes.
pub fn fragmented_arena<'a>(buf: &'a mut [u8], config: ArenaConfig) -> RawArena<'a> {
    assert_eq!(buf.len(), 10, "fragmented_arena needs a 10-byte buffer");
    let arena = RawArena::with_config(buf, config);
    let _head = arena.allocate_bytes(5).unwrap();
    let middle = arena.allocate_bytes(3).unwrap();
    let _tail = arena.allocate_bytes(2).unwrap();
    arena.free_bytes(middle, 3);
    arena
}
