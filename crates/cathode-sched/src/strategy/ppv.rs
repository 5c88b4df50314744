//! Pay-per-view loop: one movie, back-to-back, no filler.

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::RngCore;

use cathode_common::{ContentKind, StrategyKind};

use crate::catalog::Catalog;
use crate::placement::{Placement, Slot};
use crate::sizer::slot_size_or_max;
use crate::strategy::{Strategy, StrategyRun};

/// Repeats a single random movie until the window is covered. Each
/// repetition is its own placement with contiguous start/end — over a 24h
/// window a 5400s movie yields exactly floor(86400/5400) = 16 repeats.
pub struct Ppv;

impl Strategy for Ppv {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ppv
    }

    fn generate(
        &self,
        start: NaiveDateTime,
        duration: Duration,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> StrategyRun {
        let movies = catalog.indices_of(ContentKind::Movie);
        let Some(&movie) = movies.choose(rng) else {
            tracing::warn!("no movies in catalog, PPV block is empty");
            return StrategyRun::empty(start);
        };

        let runtime = catalog.runtime(movie);
        if runtime <= Duration::zero() {
            tracing::warn!(filepath = %catalog.item(movie).filepath, "zero-runtime movie, PPV block is empty");
            return StrategyRun::empty(start);
        }

        let size = slot_size_or_max(catalog.item(movie).runtime_secs);
        let mut slots = Vec::new();
        let mut marker = start;
        let mut total = Duration::zero();

        while total < duration {
            let placement = Placement::new(catalog, movie, marker);
            marker = placement.end;
            total = total + runtime;
            slots.push(Slot::unpadded(placement, size));
        }

        StrategyRun { slots, end_marker: marker }
    }
}
