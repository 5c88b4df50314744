//! Scheduling strategies.
//!
//! Each strategy turns (start, duration, catalog) into an ordered run of
//! slots plus the marker it actually reached. Strategies never fail on an
//! empty pool: they return whatever they accumulated and let the orchestrator
//! move on. The marker may overshoot the requested window by at most one
//! item's runtime — items are never split across a boundary.

use chrono::{Duration, NaiveDateTime};
use rand::RngCore;
use std::collections::HashMap;

use cathode_common::StrategyKind;

use crate::catalog::Catalog;
use crate::packer::pack_filler;
use crate::placement::{Placement, Slot};
use crate::sizer::slot_size_or_max;

mod basic;
mod marathon;
mod movie_tag;
mod mtv;
mod ppv;

pub use basic::Basic;
pub use marathon::TvMarathon;
pub use movie_tag::MoviesByTag;
pub use mtv::Mtv;
pub use ppv::Ppv;

/// What one strategy produced for one block.
#[derive(Debug, Clone)]
pub struct StrategyRun {
    pub slots: Vec<Slot>,
    /// The authoritative timeline position the orchestrator resumes from.
    pub end_marker: NaiveDateTime,
}

impl StrategyRun {
    /// An empty run that made no progress past `at`.
    pub fn empty(at: NaiveDateTime) -> Self {
        Self {
            slots: Vec::new(),
            end_marker: at,
        }
    }
}

/// Common contract for block-level scheduling algorithms.
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn generate(
        &self,
        start: NaiveDateTime,
        duration: Duration,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> StrategyRun;
}

/// Registry of all strategies, keyed by kind.
pub fn registry() -> HashMap<StrategyKind, Box<dyn Strategy>> {
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(Basic),
        Box::new(MoviesByTag),
        Box::new(TvMarathon),
        Box::new(Ppv),
        Box::new(Mtv),
    ];
    strategies.into_iter().map(|s| (s.kind(), s)).collect()
}

/// Place `primary` at `marker`, size its slot, and pack commercials up to the
/// slot boundary. Returns the slot and the marker the packer reached.
pub(crate) fn fill_slot(
    catalog: &Catalog,
    primary: usize,
    marker: NaiveDateTime,
    commercials: &[usize],
    rng: &mut dyn RngCore,
) -> (Slot, NaiveDateTime) {
    let placement = Placement::new(catalog, primary, marker);
    let size = slot_size_or_max(catalog.item(primary).runtime_secs);
    let mut slot = Slot::sized(placement, size);

    let packed = pack_filler(catalog, commercials, slot.primary.end, slot.slot_end, rng);
    let marker_after = if packed.filler.is_empty() {
        slot.primary.end
    } else {
        packed.marker
    };
    slot.filler = packed.filler;
    (slot, marker_after)
}
