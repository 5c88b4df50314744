//! Per-channel day orchestration.
//!
//! Walks one 24-hour window with a single mutable marker: draw a strategy
//! from the channel's list, draw a nominal 3–5h block duration (clamped to
//! the remaining day), run the strategy, and resume from the marker it
//! returned. The rotation strategies (MTV, PPV) claim the rest of the day.

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use rusqlite::Connection;

use cathode_common::{Result, StrategyKind};
use cathode_db::queries::schedule;

use crate::catalog::Catalog;
use crate::placement::{flatten, Block};
use crate::strategy::registry;

/// Consecutive no-progress strategy runs tolerated before giving up on the
/// rest of the day (degenerate catalogs only).
const MAX_STALLED_RUNS: u32 = 8;

/// One configured channel.
#[derive(Debug, Clone)]
pub struct Channel {
    pub number: u32,
    pub name: String,
    pub description: String,
    pub strategies: Vec<StrategyKind>,
}

/// Build one channel's full-day block list, starting at `day_start`.
pub fn build_day(
    channel: &Channel,
    catalog: &Catalog,
    day_start: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> Vec<Block> {
    let day_end = day_start + Duration::hours(24);
    let strategies = registry();
    let mut blocks = Vec::new();
    let mut marker = day_start;
    let mut stalled = 0u32;

    if channel.strategies.is_empty() || catalog.is_empty() {
        tracing::warn!(channel = channel.number, "no strategies or empty catalog, day left empty");
        return blocks;
    }

    while marker < day_end {
        let Some(&kind) = channel.strategies.choose(rng) else {
            break;
        };

        let remaining = day_end - marker;
        let duration = match kind {
            // Rotation strategies run unbounded; hand them the whole tail
            StrategyKind::Mtv | StrategyKind::Ppv => remaining,
            _ => {
                let nominal = Duration::hours(rng.gen_range(3..=5));
                nominal.min(remaining)
            }
        };

        tracing::info!(
            channel = channel.number,
            strategy = %kind,
            block_start = %marker,
            block_hours = duration.num_hours(),
            "generating block"
        );
        let run = strategies[&kind].generate(marker, duration, catalog, rng);

        // MTV is designed to run unbounded; pin the marker rather than
        // trusting a marker from an infinite rotation.
        let reached = if kind == StrategyKind::Mtv && !run.slots.is_empty() {
            day_end
        } else {
            run.end_marker
        };

        if run.slots.is_empty() && reached <= marker {
            stalled += 1;
            if stalled >= MAX_STALLED_RUNS {
                tracing::warn!(
                    channel = channel.number,
                    "no strategy can make progress, abandoning rest of day"
                );
                break;
            }
            continue;
        }
        stalled = 0;

        blocks.push(Block {
            start: marker,
            end: reached,
            strategy: kind,
            slots: run.slots,
        });
        marker = reached;
    }

    blocks
}

/// Generate a channel's day and atomically persist it.
pub fn generate_and_store(
    conn: &mut Connection,
    channel: &Channel,
    catalog: &Catalog,
    day_start: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> Result<usize> {
    let blocks = build_day(channel, catalog, day_start, rng);
    let rows = flatten(catalog, channel.number, &blocks);
    tracing::info!(
        channel = channel.number,
        blocks = blocks.len(),
        rows = rows.len(),
        "persisting schedule"
    );
    schedule::replace_channel(conn, channel.number, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn full_catalog() -> Catalog {
        let mut items = Vec::new();
        for season in 1..=2 {
            for ep in 1..=10 {
                items.push(episode("Static City", season, ep, 22 * 60));
            }
        }
        items.push(movie("Night Signal", 90 * 60, &["noir"]));
        items.push(movie("Rerun Heat", 110 * 60, &["noir", "action"]));
        items.push(commercial(15));
        items.push(commercial(30));
        items.push(commercial(45));
        items.push(music_video("Neon Drive", 240));
        items.push(music_video("Glass Tower", 260));
        items.push(ident(8, &["mtvident"]));
        Catalog::new(items)
    }

    fn channel(strategies: Vec<StrategyKind>) -> Channel {
        Channel {
            number: 1,
            name: "CCN".into(),
            description: "Cathode Classic Network".into(),
            strategies,
        }
    }

    #[test]
    fn test_blocks_tile_the_day() {
        let catalog = full_catalog();
        let day_start = ts("2024-06-15 00:00:00");
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let blocks = build_day(
                &channel(vec![
                    StrategyKind::Basic,
                    StrategyKind::MoviesByTag,
                    StrategyKind::TvMarathon,
                ]),
                &catalog,
                day_start,
                &mut rng,
            );
            assert!(!blocks.is_empty());
            assert_eq!(blocks[0].start, day_start);
            for pair in blocks.windows(2) {
                assert_eq!(pair[0].end, pair[1].start, "seed {seed}: gap between blocks");
            }
            assert!(
                blocks.last().unwrap().end >= day_start + Duration::hours(24),
                "seed {seed}: day not covered"
            );
        }
    }

    #[test]
    fn test_mtv_claims_rest_of_day() {
        let catalog = full_catalog();
        let day_start = ts("2024-06-15 00:00:00");
        let mut rng = StdRng::seed_from_u64(2);
        let blocks = build_day(&channel(vec![StrategyKind::Mtv]), &catalog, day_start, &mut rng);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].end, day_start + Duration::hours(24));
    }

    #[test]
    fn test_degenerate_catalog_gives_up_cleanly() {
        // MoviesByTag can never place anything without movies
        let catalog = Catalog::new(vec![commercial(30)]);
        let mut rng = StdRng::seed_from_u64(2);
        let blocks = build_day(
            &channel(vec![StrategyKind::MoviesByTag]),
            &catalog,
            ts("2024-06-15 00:00:00"),
            &mut rng,
        );
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_nominal_blocks_clamped_to_day() {
        let catalog = full_catalog();
        let day_start = ts("2024-06-15 00:00:00");
        let mut rng = StdRng::seed_from_u64(6);
        let blocks = build_day(
            &channel(vec![StrategyKind::TvMarathon, StrategyKind::Basic]),
            &catalog,
            day_start,
            &mut rng,
        );
        // No block may overshoot the day by more than one slot's span
        let overshoot = blocks.last().unwrap().end - (day_start + Duration::hours(24));
        assert!(overshoot < Duration::hours(4), "overshoot {overshoot}");
    }
}
