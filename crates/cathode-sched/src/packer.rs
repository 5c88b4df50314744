//! Commercial/filler packing.
//!
//! Two phases: a greedy-random loop that keeps placing any candidate fitting
//! the remaining time (plus tolerance), then one best-fit pass that picks the
//! pool item whose runtime lands closest to the remainder without exceeding
//! it by more than the tolerance. Selection is with replacement; the same
//! filepath may repeat. An empty candidate set simply ends the phase.

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::catalog::Catalog;
use crate::placement::Placement;

/// Seconds an item may overshoot the boundary and still be placed.
pub const TOLERANCE_SECS: i64 = 5;

/// Remaining seconds below which the greedy loop stops trying.
pub const MAX_PADDING_SECS: i64 = 20;

/// Outcome of packing one slot's trailing gap.
#[derive(Debug, Clone)]
pub struct PackResult {
    pub filler: Vec<Placement>,
    /// Where the timeline cursor ended up (end of the last filler item, or
    /// the starting marker when nothing was placed).
    pub marker: NaiveDateTime,
    /// Unfilled time left before `slot_end`; negative when the final item
    /// overshot within tolerance.
    pub leftover: Duration,
}

/// Pack `pool` items into `[marker, slot_end)`.
pub fn pack_filler(
    catalog: &Catalog,
    pool: &[usize],
    marker: NaiveDateTime,
    slot_end: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> PackResult {
    let tolerance = Duration::seconds(TOLERANCE_SECS);
    let mut filler = Vec::new();
    let mut marker = marker;

    // A zero-runtime row never advances the marker and would loop forever
    let pool: Vec<usize> = pool
        .iter()
        .copied()
        .filter(|&i| catalog.item(i).runtime_secs > 0)
        .collect();

    while slot_end - marker > Duration::seconds(MAX_PADDING_SECS) {
        let remaining = slot_end - marker;
        let candidates: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|&i| catalog.runtime(i) <= remaining + tolerance)
            .collect();
        let Some(&choice) = candidates.choose(rng) else {
            break;
        };
        let placement = Placement::new(catalog, choice, marker);
        marker = placement.end;
        filler.push(placement);
    }

    // Best-fit pass over the whole pool to shave the remainder down.
    let remaining = slot_end - marker;
    if remaining > Duration::zero() {
        let best = pool
            .iter()
            .copied()
            .filter(|&i| catalog.runtime(i) <= remaining + tolerance)
            .min_by_key(|&i| (remaining - catalog.runtime(i)).num_seconds().abs());
        if let Some(best) = best {
            let placement = Placement::new(catalog, best, marker);
            marker = placement.end;
            filler.push(placement);
        }
    }

    PackResult {
        filler,
        marker,
        leftover: slot_end - marker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool_catalog() -> Catalog {
        Catalog::new(vec![
            commercial(15),
            commercial(30),
            commercial(45),
            commercial(60),
        ])
    }

    #[test]
    fn test_leftover_is_bounded() {
        let catalog = pool_catalog();
        let pool = catalog.all_indices();
        let mut rng = StdRng::seed_from_u64(7);

        for minutes in [2, 5, 7, 11] {
            let start = ts("2024-01-01 08:22:00");
            let end = start + Duration::minutes(minutes);
            let result = pack_filler(&catalog, &pool, start, end, &mut rng);
            assert!(
                result.leftover <= Duration::seconds(TOLERANCE_SECS + MAX_PADDING_SECS),
                "leftover {}s too large for a {minutes}min gap",
                result.leftover.num_seconds()
            );
            assert!(result.leftover >= Duration::seconds(-TOLERANCE_SECS));
        }
    }

    #[test]
    fn test_filler_is_contiguous() {
        let catalog = pool_catalog();
        let pool = catalog.all_indices();
        let mut rng = StdRng::seed_from_u64(3);

        let start = ts("2024-01-01 08:00:00");
        let result = pack_filler(&catalog, &pool, start, start + Duration::minutes(6), &mut rng);
        assert!(!result.filler.is_empty());
        let mut cursor = start;
        for placement in &result.filler {
            assert_eq!(placement.start, cursor);
            cursor = placement.end;
        }
        assert_eq!(cursor, result.marker);
    }

    #[test]
    fn test_empty_pool_is_not_an_error() {
        let catalog = pool_catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let start = ts("2024-01-01 08:00:00");
        let result = pack_filler(&catalog, &[], start, start + Duration::minutes(10), &mut rng);
        assert!(result.filler.is_empty());
        assert_eq!(result.marker, start);
        assert_eq!(result.leftover, Duration::minutes(10));
    }

    #[test]
    fn test_oversized_candidates_are_skipped() {
        // Only a 10-minute spot in the pool, 2-minute gap to fill.
        let catalog = Catalog::new(vec![commercial(600)]);
        let pool = catalog.all_indices();
        let mut rng = StdRng::seed_from_u64(1);
        let start = ts("2024-01-01 08:00:00");
        let result = pack_filler(&catalog, &pool, start, start + Duration::minutes(2), &mut rng);
        assert!(result.filler.is_empty());
    }

    #[test]
    fn test_zero_runtime_filler_is_ignored() {
        // A zero-second spot fits any remainder but never advances the
        // marker; the packer must terminate without placing it.
        let catalog = Catalog::new(vec![commercial(0)]);
        let pool = catalog.all_indices();
        let mut rng = StdRng::seed_from_u64(4);
        let start = ts("2024-01-01 08:00:00");
        let result = pack_filler(&catalog, &pool, start, start + Duration::minutes(2), &mut rng);
        assert!(result.filler.is_empty());
        assert_eq!(result.marker, start);
    }

    #[test]
    fn test_zero_runtime_rows_do_not_block_real_filler() {
        let catalog = Catalog::new(vec![commercial(0), commercial(30)]);
        let pool = catalog.all_indices();
        let mut rng = StdRng::seed_from_u64(4);
        let start = ts("2024-01-01 08:00:00");
        let result = pack_filler(&catalog, &pool, start, start + Duration::minutes(2), &mut rng);
        assert!(!result.filler.is_empty());
        assert!(result.filler.iter().all(|p| p.end > p.start));
        assert!(result.leftover <= Duration::seconds(TOLERANCE_SECS + MAX_PADDING_SECS));
    }

    #[test]
    fn test_best_fit_minimizes_gap() {
        // Greedy loop can't run (remaining under MAX_PADDING after one 45s
        // spot at a 1-minute gap), so best-fit must choose the 15s spot.
        let catalog = Catalog::new(vec![commercial(45), commercial(15)]);
        let pool = catalog.all_indices();
        let mut rng = StdRng::seed_from_u64(9);
        let start = ts("2024-01-01 08:29:00");
        let result = pack_filler(&catalog, &pool, start, start + Duration::seconds(60), &mut rng);
        let total: i64 = result
            .filler
            .iter()
            .map(|p| (p.end - p.start).num_seconds())
            .sum();
        assert_eq!(total, 60, "expected the gap filled exactly, got {total}s");
    }
}
