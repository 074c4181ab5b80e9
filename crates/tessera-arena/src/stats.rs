//! Point-in-time occupancy statistics.

use std::fmt;

use crate::map::OccupancyMap;

/// Summary of an arena's occupancy map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaStats {
    /// Arena size in bytes.
    pub capacity: usize,
    /// Free bytes, contiguous or not.
    pub free: usize,
    /// Used bytes.
    pub used: usize,
    /// Largest single allocation currently satisfiable.
    pub largest_free_run: usize,
    /// Number of maximal free runs. More than one means fragmentation.
    pub free_runs: usize,
}

impl ArenaStats {
    /// Compute statistics for `map`.
    pub fn of(map: &OccupancyMap) -> Self {
        let free = map.count_free();
        Self {
            capacity: map.size(),
            free,
            used: map.size() - free,
            largest_free_run: map.longest_free_run(),
            free_runs: map.free_runs().len(),
        }
    }

    /// Free bytes that cannot be handed out as part of the largest request.
    pub fn fragmented_bytes(&self) -> usize {
        self.free - self.largest_free_run
    }
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} bytes free, largest run {}, {} free runs",
            self.free, self.capacity, self.largest_free_run, self.free_runs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_fragmented_map() {
        let map = OccupancyMap::from_bitmap("0000011101".parse().unwrap());
        let stats = ArenaStats::of(&map);
        assert_eq!(stats.capacity, 10);
        assert_eq!(stats.free, 4);
        assert_eq!(stats.used, 6);
        assert_eq!(stats.largest_free_run, 3);
        assert_eq!(stats.free_runs, 2);
        assert_eq!(stats.fragmented_bytes(), 1);
        assert_eq!(
            stats.to_string(),
            "4/10 bytes free, largest run 3, 2 free runs"
        );
    }

    #[test]
    fn stats_of_full_and_empty_maps() {
        let empty = ArenaStats::of(&OccupancyMap::new(8));
        assert_eq!(empty.free_runs, 1);
        assert_eq!(empty.fragmented_bytes(), 0);

        let full = ArenaStats::of(&OccupancyMap::from_bitmap("0000".parse().unwrap()));
        assert_eq!(full.free_runs, 0);
        assert_eq!(full.largest_free_run, 0);
        assert_eq!(full.used, 4);
    }

    #[test]
    fn free_runs_counted_across_word_boundaries() {
        let mut map = OccupancyMap::new(200);
        for i in (0..200).step_by(50) {
            map.mark_used(i);
        }
        let stats = ArenaStats::of(&map);
        assert_eq!(stats.free_runs, 4);
        assert_eq!(stats.largest_free_run, 49);
    }
}
