//! First-fit search, reservation, and release over an [`OccupancyMap`].
//!
//! All functions are stateless: they operate on a map and a demand mask.
//! A demand mask is a [`Bitmap`] the size of the map whose set bits mark
//! the bytes a request needs.
//!
//! # Search
//!
//! [`find_free_run`] tests the mask against the map (`map & mask == mask`).
//! On a miss it does not step one byte at a time; it jumps to the next free
//! byte after the current position and shifts the mask by the same amount,
//! so a run of used bytes is skipped in a single step.

use tessera_bits::Bitmap;
use tracing::trace;

use crate::map::OccupancyMap;

/// Mask of `size` bits with the first `nb` set.
///
/// # Panics
///
/// Panics if `nb > size`.
pub fn build_demand_mask(nb: usize, size: usize) -> Bitmap {
    Bitmap::with_prefix(size, nb)
}

/// Mask of `size` bits with `[pos, pos + nb)` set.
///
/// # Panics
///
/// Panics if `pos + nb > size`.
pub fn demand_mask_at(nb: usize, pos: usize, size: usize) -> Bitmap {
    assert!(
        pos.checked_add(nb).is_some_and(|end| end <= size),
        "mask [{pos}, {pos}+{nb}) exceeds map size {size}"
    );
    build_demand_mask(nb, size) << pos
}

/// Lowest position at which every bit of `mask` is free in `map`.
///
/// `mask` must have been built by [`build_demand_mask`]: its set bits form
/// one run starting at bit 0. On success the mask is left shifted to the
/// returned position, ready for [`reserve`]. Returns `map.size()` when no
/// position fits, including when the total free space is already too small.
pub fn find_free_run(map: &OccupancyMap, mask: &mut Bitmap) -> usize {
    let size = map.size();
    debug_assert_eq!(mask.len(), size, "mask and map sizes differ");
    let needed = mask.count_ones();
    if map.count_free() < needed {
        return size;
    }

    let last_start = size - needed;
    let mut pos = 0;
    loop {
        trace!(pos, needed, "probing for free run");
        if mask.is_subset_of(map.as_bitmap()) {
            return pos;
        }
        let next = map.find_next_free(pos + 1);
        if next > last_start {
            return size;
        }
        *mask <<= next - pos;
        pos = next;
    }
}

/// Mark every byte of `mask` used: `map = map & !mask`.
///
/// Every mask bit must currently be free; this is checked in debug builds.
pub fn reserve(map: &mut OccupancyMap, mask: &Bitmap) {
    debug_assert!(
        mask.is_subset_of(map.as_bitmap()),
        "reserving bytes that are not free"
    );
    let bits = map.bits_mut();
    *bits &= &!mask;
}

/// Mark every byte of `mask` free: `map = map | mask`.
///
/// Bytes that are already free stay free. No check is made that the bytes
/// were reserved together, or at all.
pub fn release(map: &mut OccupancyMap, mask: &Bitmap) {
    let bits = map.bits_mut();
    *bits |= mask;
}

/// Largest request that [`find_free_run`] can satisfy right now.
pub fn longest_free_run(map: &OccupancyMap) -> usize {
    map.longest_free_run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(s: &str) -> OccupancyMap {
        OccupancyMap::from_bitmap(s.parse().unwrap())
    }

    #[test]
    fn demand_mask_has_prefix_set() {
        let mask = build_demand_mask(3, 8);
        assert_eq!(mask.to_string(), "11100000");
        assert_eq!(demand_mask_at(3, 4, 8).to_string(), "00001110");
    }

    #[test]
    #[should_panic(expected = "exceeds map size")]
    fn demand_mask_at_rejects_overhang() {
        demand_mask_at(3, 6, 8);
    }

    #[test]
    fn first_fit_on_empty_map_is_zero() {
        let m = OccupancyMap::new(10);
        let mut mask = build_demand_mask(4, 10);
        assert_eq!(find_free_run(&m, &mut mask), 0);
    }

    #[test]
    fn first_fit_skips_used_runs() {
        let m = map("0001111000");
        let mut mask = build_demand_mask(3, 10);
        assert_eq!(find_free_run(&m, &mut mask), 3);
        assert_eq!(mask.to_string(), "0001110000");
    }

    #[test]
    fn first_fit_picks_lowest_fitting_run() {
        // Free runs at [1,3) and [5,9); only the second holds 3 bytes.
        let m = map("0110011110");
        let mut mask = build_demand_mask(3, 10);
        assert_eq!(find_free_run(&m, &mut mask), 5);
    }

    #[test]
    fn fragmented_free_space_is_not_coalesced() {
        // used [0,5), free [5,8), used [8,10): 3 free, but 5 with the tail.
        let m = map("0000011100");
        let mut mask = build_demand_mask(3, 10);
        assert_eq!(find_free_run(&m, &mut mask), 5);

        let m = map("0000011101");
        let mut mask = build_demand_mask(4, 10);
        assert_eq!(m.count_free(), 4);
        assert_eq!(find_free_run(&m, &mut mask), 10);
    }

    #[test]
    fn not_enough_total_free_returns_sentinel() {
        let m = map("1000000001");
        let mut mask = build_demand_mask(3, 10);
        assert_eq!(find_free_run(&m, &mut mask), 10);
    }

    #[test]
    fn run_ending_at_last_byte_is_found() {
        let m = map("0000000111");
        let mut mask = build_demand_mask(3, 10);
        assert_eq!(find_free_run(&m, &mut mask), 7);
    }

    #[test]
    fn reserve_clears_mask_bits() {
        let mut m = OccupancyMap::new(6);
        let mut mask = build_demand_mask(2, 6);
        let pos = find_free_run(&m, &mut mask);
        reserve(&mut m, &mask);
        assert_eq!(pos, 0);
        assert_eq!(m.to_string(), "##....");
        assert_eq!(m.count_free(), 4);
    }

    #[test]
    fn release_is_idempotent_on_free_bytes() {
        let mut m = map("001111");
        let mask = demand_mask_at(3, 1, 6);
        release(&mut m, &mask);
        assert_eq!(m.to_string(), "#.....");
        release(&mut m, &mask);
        assert_eq!(m.to_string(), "#.....");
    }

    #[test]
    fn release_accepts_ranges_never_reserved_together() {
        let mut m = OccupancyMap::new(6);
        reserve(&mut m, &demand_mask_at(2, 0, 6));
        reserve(&mut m, &demand_mask_at(2, 2, 6));
        release(&mut m, &demand_mask_at(2, 1, 6));
        assert_eq!(m.to_string(), "#..#..");
    }

    #[test]
    fn longest_free_run_tracks_reservations() {
        let mut m = OccupancyMap::new(9);
        reserve(&mut m, &demand_mask_at(8, 0, 9));
        assert_eq!(longest_free_run(&m), 1);
    }
}
