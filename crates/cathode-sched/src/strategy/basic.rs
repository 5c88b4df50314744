//! Basic strategy: random program fill with commercial padding.

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::RngCore;

use cathode_common::time::next_half_hour;
use cathode_common::{ContentKind, StrategyKind};

use crate::catalog::Catalog;
use crate::strategy::{fill_slot, Strategy, StrategyRun};

/// Random non-commercial fill. Items are consumed from a working pool, so
/// nothing repeats within one run. When no program fits the remaining block
/// time, a best-fit search over the whole remaining pool (any kind) tries to
/// plug the tail; if even that fails the block ends early at the next
/// half-hour — a normal early exit, not a fault.
pub struct Basic;

impl Strategy for Basic {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Basic
    }

    fn generate(
        &self,
        start: NaiveDateTime,
        duration: Duration,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> StrategyRun {
        let mut slots = Vec::new();
        let mut marker = start;
        let mut total = Duration::zero();
        let mut pool = catalog.all_indices();
        let commercials = catalog.indices_of(ContentKind::Commercial);

        while total < duration {
            let remaining = duration - total;

            let program_fits: Vec<usize> = pool
                .iter()
                .copied()
                .filter(|&i| {
                    catalog.item(i).kind.is_program() && catalog.runtime(i) <= remaining
                })
                .collect();

            let chosen = match program_fits.choose(rng) {
                Some(&c) => c,
                None => {
                    // Fall back to best-fit over everything left, minimal gap
                    let best = pool
                        .iter()
                        .copied()
                        .filter(|&i| catalog.runtime(i) <= remaining)
                        .min_by_key(|&i| (remaining - catalog.runtime(i)).num_seconds());
                    match best {
                        Some(c) => c,
                        None => {
                            tracing::debug!(%marker, "nothing fits, ending block early");
                            marker = next_half_hour(marker);
                            break;
                        }
                    }
                }
            };
            pool.retain(|&i| i != chosen);

            let (slot, after) = fill_slot(catalog, chosen, marker, &commercials, rng);
            total += Duration::seconds(i64::from(slot.size.secs()));
            marker = after;
            slots.push(slot);
        }

        StrategyRun { slots, end_marker: marker }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            episode("Static City", 1, 1, 22 * 60),
            episode("Static City", 1, 2, 22 * 60),
            movie("Night Signal", 90 * 60, &["noir"]),
            commercial(30),
            commercial(60),
        ])
    }

    #[test]
    fn test_no_repeats_within_run() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(5);
        let run = Basic.generate(ts("2024-01-01 00:00:00"), Duration::hours(3), &catalog, &mut rng);

        let mut primaries: Vec<usize> = run.slots.iter().map(|s| s.primary.item).collect();
        let before = primaries.len();
        primaries.sort_unstable();
        primaries.dedup();
        assert_eq!(primaries.len(), before, "a primary repeated within one run");
    }

    #[test]
    fn test_slots_are_ordered_and_non_overlapping() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(5);
        let run = Basic.generate(ts("2024-01-01 00:00:00"), Duration::hours(3), &catalog, &mut rng);
        assert!(!run.slots.is_empty());

        for pair in run.slots.windows(2) {
            assert!(pair[0].last_placement_end() <= pair[1].slot_start());
        }
    }

    #[test]
    fn test_exhausted_pool_ends_early_on_half_hour() {
        // One short episode, no commercials: pool runs dry long before 3h.
        let catalog = Catalog::new(vec![episode("Static City", 1, 1, 22 * 60)]);
        let mut rng = StdRng::seed_from_u64(2);
        let run = Basic.generate(ts("2024-01-01 00:00:00"), Duration::hours(3), &catalog, &mut rng);

        assert_eq!(run.slots.len(), 1);
        // Marker lands on a half-hour boundary after the early exit
        let minute = run.end_marker.format("%M:%S").to_string();
        assert!(minute == "00:00" || minute == "30:00", "marker at {minute}");
    }

    #[test]
    fn test_empty_catalog_returns_empty_run() {
        let catalog = Catalog::new(vec![]);
        let mut rng = StdRng::seed_from_u64(2);
        let run = Basic.generate(ts("2024-01-01 00:00:00"), Duration::hours(3), &catalog, &mut rng);
        assert!(run.slots.is_empty());
    }
}
