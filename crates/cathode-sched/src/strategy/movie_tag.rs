//! Tag-filtered movie blocks.

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use cathode_common::{ContentKind, StrategyKind};

use crate::catalog::Catalog;
use crate::strategy::{fill_slot, Strategy, StrategyRun};

/// Samples 1–2 tags from the vocabulary, keeps movies whose tag set
/// intersects, shuffles, and consumes them until the block is met. Zero
/// matching movies produces an empty run the orchestrator must tolerate.
pub struct MoviesByTag;

impl Strategy for MoviesByTag {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MoviesByTag
    }

    fn generate(
        &self,
        start: NaiveDateTime,
        duration: Duration,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> StrategyRun {
        let vocab = catalog.tag_vocabulary();
        if vocab.is_empty() {
            tracing::warn!("no tag vocabulary, movie block is empty");
            return StrategyRun::empty(start);
        }

        let sample_size = rng.gen_range(1..=2usize).min(vocab.len());
        let sampled: Vec<&String> = vocab.choose_multiple(rng, sample_size).collect();

        let mut movies: Vec<usize> = catalog
            .indices_of(ContentKind::Movie)
            .into_iter()
            .filter(|&i| {
                catalog
                    .item(i)
                    .tags
                    .iter()
                    .any(|t| sampled.iter().any(|s| *s == t))
            })
            .collect();
        if movies.is_empty() {
            tracing::warn!(tags = ?sampled, "no movies match sampled tags, block is empty");
            return StrategyRun::empty(start);
        }
        movies.shuffle(rng);

        let commercials = catalog.indices_of(ContentKind::Commercial);
        let mut slots = Vec::new();
        let mut marker = start;
        let mut total = Duration::zero();

        for &movie in &movies {
            if total >= duration {
                break;
            }
            let (slot, after) = fill_slot(catalog, movie, marker, &commercials, rng);
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

    #[test]
    fn test_only_matching_movies_are_scheduled() {
        // One tag in the vocabulary, so the sample always hits "noir".
        let catalog = Catalog::new(vec![
            movie("Night Signal", 90 * 60, &["noir"]),
            movie("Rerun Heat", 90 * 60, &["noir"]),
            commercial(30),
        ]);
        let mut rng = StdRng::seed_from_u64(21);
        let run = MoviesByTag.generate(ts("2024-01-01 00:00:00"), Duration::hours(3), &catalog, &mut rng);

        assert!(!run.slots.is_empty());
        for slot in &run.slots {
            assert_eq!(catalog.item(slot.primary.item).kind, ContentKind::Movie);
        }
    }

    #[test]
    fn test_no_movies_yields_empty_run() {
        let catalog = Catalog::new(vec![episode("Static City", 1, 1, 1300), commercial(30)]);
        let mut rng = StdRng::seed_from_u64(1);
        let start = ts("2024-01-01 06:00:00");
        let run = MoviesByTag.generate(start, Duration::hours(3), &catalog, &mut rng);
        assert!(run.slots.is_empty());
        assert_eq!(run.end_marker, start);
    }

    #[test]
    fn test_stops_when_matches_run_out() {
        let catalog = Catalog::new(vec![movie("Night Signal", 90 * 60, &["noir"]), commercial(30)]);
        let mut rng = StdRng::seed_from_u64(3);
        let run = MoviesByTag.generate(ts("2024-01-01 00:00:00"), Duration::hours(12), &catalog, &mut rng);
        // One matching movie: one slot, then graceful stop
        assert_eq!(run.slots.len(), 1);
    }
}
