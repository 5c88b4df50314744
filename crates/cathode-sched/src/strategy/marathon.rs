//! TV-series marathon blocks: ordered episode runs of one show.

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use cathode_common::{ContentKind, StrategyKind};

use crate::catalog::Catalog;
use crate::strategy::{fill_slot, Strategy, StrategyRun};

/// Episodes taken in marathon runs, per starting point.
const MAX_RUN_LEN: usize = 20;

/// Picks one show, sorts its episodes by (season, episode), starts at a
/// random index, and plays up to the next 20 episodes in that fixed order —
/// no reshuffling mid-run.
pub struct TvMarathon;

impl Strategy for TvMarathon {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TvMarathon
    }

    fn generate(
        &self,
        start: NaiveDateTime,
        duration: Duration,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> StrategyRun {
        let shows = catalog.show_names();
        let Some(&show) = shows.choose(rng) else {
            tracing::warn!("no shows in catalog, marathon block is empty");
            return StrategyRun::empty(start);
        };

        let episodes = catalog.episodes_of(show);
        let start_idx = rng.gen_range(0..episodes.len());
        let run = &episodes[start_idx..(start_idx + MAX_RUN_LEN).min(episodes.len())];
        tracing::debug!(show, episodes = run.len(), "marathon run selected");

        let commercials = catalog.indices_of(ContentKind::Commercial);
        let mut slots = Vec::new();
        let mut marker = start;
        let mut total = Duration::zero();

        for &episode in run {
            if total >= duration {
                break;
            }
            let (slot, after) = fill_slot(catalog, episode, marker, &commercials, rng);
            total += Duration::seconds(i64::from(slot.size.secs()));
            marker = after;
            slots.push(slot);
        }

        StrategyRun { slots, end_marker: marker }
    }
}
