//! Music-video rotation: video bursts broken up by commercials and idents.

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use cathode_common::{ContentKind, StrategyKind};

use crate::catalog::Catalog;
use crate::placement::{Placement, Slot};
use crate::sizer::slot_size_or_max;
use crate::strategy::{Strategy, StrategyRun};

/// Ident tag the rotation prefers for its bumpers.
const IDENT_TAG: &str = "mtvident";

/// Plays shuffled runs of 3–5 music videos, then 2–4 commercials and exactly
/// one ident, and starts the next run. The working pool refills from source
/// and reshuffles whenever it empties, so the rotation never terminates on
/// pool exhaustion — only the window boundary stops it.
pub struct Mtv;

impl Strategy for Mtv {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Mtv
    }

    fn generate(
        &self,
        start: NaiveDateTime,
        duration: Duration,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> StrategyRun {
        // Zero-runtime videos would stall the marker forever
        let source: Vec<usize> = catalog
            .indices_of(ContentKind::MusicVideo)
            .into_iter()
            .filter(|&i| catalog.item(i).runtime_secs > 0)
            .collect();
        if source.is_empty() {
            tracing::warn!("no playable music videos, rotation block is empty");
            return StrategyRun::empty(start);
        }

        let commercials = catalog.indices_of(ContentKind::Commercial);
        let idents = catalog.ident_indices(IDENT_TAG);
        let end = start + duration;

        let mut working = source.clone();
        working.shuffle(rng);

        let mut slots: Vec<Slot> = Vec::new();
        let mut marker = start;
        let mut counter = 0usize;
        let mut burst_len = rng.gen_range(3..=5usize);

        while marker < end {
            // Working pool is refilled eagerly below, so this always pops
            let Some(video) = working.pop() else { break };
            let placement = Placement::new(catalog, video, marker);
            marker = placement.end;
            let mut slot = Slot::unpadded(placement, slot_size_or_max(catalog.item(video).runtime_secs));
            counter += 1;

            if working.is_empty() {
                tracing::debug!("music-video pool exhausted, refilling");
                working = source.clone();
                working.shuffle(rng);
            }

            if counter == burst_len {
                let break_count = rng.gen_range(2..=4usize).min(commercials.len());
                for &c in commercials.choose_multiple(rng, break_count) {
                    let filler = Placement::new(catalog, c, marker);
                    marker = filler.end;
                    slot.filler.push(filler);
                }
                if let Some(&i) = idents.choose(rng) {
                    let filler = Placement::new(catalog, i, marker);
                    marker = filler.end;
                    slot.filler.push(filler);
                }
                slot.slot_end = slot.last_placement_end();

                counter = 0;
                burst_len = rng.gen_range(3..=5usize);
            }

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

    fn rotation_catalog() -> Catalog {
        Catalog::new(vec![
            music_video("Neon Drive", 240),
            music_video("Glass Tower", 260),
            music_video("Afterimage", 220),
            commercial(30),
            commercial(45),
            commercial(60),
            ident(8, &["mtvident"]),
        ])
    }

    #[test]
    fn test_rotation_covers_window_despite_small_pool() {
        // 3 videos, 2h window: only refilling gets us there
        let catalog = rotation_catalog();
        let mut rng = StdRng::seed_from_u64(33);
        let start = ts("2024-01-01 00:00:00");
        let run = Mtv.generate(start, Duration::hours(2), &catalog, &mut rng);

        assert!(run.end_marker >= start + Duration::hours(2));
        assert!(run.slots.len() > 3);
    }

    #[test]
    fn test_breaks_have_commercials_and_one_ident() {
        let catalog = rotation_catalog();
        let mut rng = StdRng::seed_from_u64(33);
        let run = Mtv.generate(ts("2024-01-01 00:00:00"), Duration::hours(2), &catalog, &mut rng);

        let breaks: Vec<&Slot> = run.slots.iter().filter(|s| !s.filler.is_empty()).collect();
        assert!(!breaks.is_empty());
        for slot in breaks {
            let idents = slot
                .filler
                .iter()
                .filter(|f| catalog.item(f.item).kind == ContentKind::Ident)
                .count();
            let commercials = slot.filler.len() - idents;
            assert_eq!(idents, 1, "each break carries exactly one ident");
            assert!((2..=4).contains(&commercials), "break had {commercials} commercials");
            // Ident closes the break
            let last = slot.filler.last().unwrap();
            assert_eq!(catalog.item(last.item).kind, ContentKind::Ident);
        }
    }

    #[test]
    fn test_timeline_is_contiguous() {
        let catalog = rotation_catalog();
        let mut rng = StdRng::seed_from_u64(7);
        let start = ts("2024-01-01 00:00:00");
        let run = Mtv.generate(start, Duration::minutes(90), &catalog, &mut rng);

        let mut cursor = start;
        for slot in &run.slots {
            assert_eq!(slot.primary.start, cursor);
            cursor = slot.primary.end;
            for filler in &slot.filler {
                assert_eq!(filler.start, cursor);
                cursor = filler.end;
            }
        }
        assert_eq!(cursor, run.end_marker);
    }

    #[test]
    fn test_no_videos_yields_empty_run() {
        let catalog = Catalog::new(vec![commercial(30)]);
        let mut rng = StdRng::seed_from_u64(1);
        let start = ts("2024-01-01 00:00:00");
        let run = Mtv.generate(start, Duration::hours(24), &catalog, &mut rng);
        assert!(run.slots.is_empty());
        assert_eq!(run.end_marker, start);
    }
}
