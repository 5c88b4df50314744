//! Timeline placements and their flattening into persisted rows.
//!
//! A `Placement` is a fresh (item index, start, end) record built per
//! scheduling decision — catalog records themselves are never touched. Slots
//! group a primary placement with its trailing filler; blocks group the slots
//! one strategy produced for one stretch of the day.

use chrono::{Duration, NaiveDateTime};

use cathode_common::{ContentKind, SlotSize, StrategyKind};
use cathode_db::models::ScheduleRow;

use crate::catalog::Catalog;

/// One item placed on the timeline. `end - start` equals the item's
/// whole-second runtime exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub item: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Placement {
    pub fn new(catalog: &Catalog, item: usize, start: NaiveDateTime) -> Self {
        let end = start + catalog.runtime(item);
        Self { item, start, end }
    }
}

/// One scheduling unit: a primary program plus trailing filler up to the
/// slot boundary. Unpadded slots (PPV repeats, music videos) end exactly at
/// their last placement instead of a bucket boundary.
#[derive(Debug, Clone)]
pub struct Slot {
    pub primary: Placement,
    pub size: SlotSize,
    pub slot_end: NaiveDateTime,
    pub filler: Vec<Placement>,
}

impl Slot {
    /// A bucket-sized slot starting at the primary's start.
    pub fn sized(primary: Placement, size: SlotSize) -> Self {
        let slot_end = primary.start + Duration::seconds(i64::from(size.secs()));
        Self {
            primary,
            size,
            slot_end,
            filler: Vec::new(),
        }
    }

    /// A slot that claims only its primary's runtime (no padding target).
    pub fn unpadded(primary: Placement, size: SlotSize) -> Self {
        let slot_end = primary.end;
        Self {
            primary,
            size,
            slot_end,
            filler: Vec::new(),
        }
    }

    pub fn slot_start(&self) -> NaiveDateTime {
        self.primary.start
    }

    /// End of the last placement in the slot (primary if no filler).
    pub fn last_placement_end(&self) -> NaiveDateTime {
        self.filler.last().map_or(self.primary.end, |f| f.end)
    }
}

/// A contiguous chunk of a channel's day generated by one strategy.
#[derive(Debug, Clone)]
pub struct Block {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub strategy: StrategyKind,
    pub slots: Vec<Slot>,
}

/// Flatten a placement into the denormalized row the store persists.
///
/// Program rows carry their metadata; filler rows leave the program fields
/// NULL and put the kind literal in `tags`.
pub fn row_for(catalog: &Catalog, channel_number: u32, placement: &Placement) -> ScheduleRow {
    let item = catalog.item(placement.item);
    let (name, show_name, season, episode, overview, tags) = match item.kind {
        ContentKind::Tv => (
            Some(item.title.clone()),
            item.show_name.clone(),
            item.season,
            item.episode,
            item.overview.clone(),
            item.tags_joined(),
        ),
        ContentKind::Movie => (
            Some(item.title.clone()),
            None,
            None,
            None,
            item.overview.clone(),
            item.tags_joined(),
        ),
        kind => (None, None, None, None, None, kind.to_string()),
    };

    ScheduleRow {
        id: None,
        channel_number,
        name,
        show_name,
        season,
        episode,
        overview,
        tags,
        runtime: item.runtime_raw.clone(),
        filepath: item.filepath.clone(),
        start: placement.start,
        end: placement.end,
    }
}

/// Flatten a day's blocks into ordered schedule rows.
pub fn flatten(catalog: &Catalog, channel_number: u32, blocks: &[Block]) -> Vec<ScheduleRow> {
    let mut rows = Vec::new();
    for block in blocks {
        for slot in &block.slots {
            rows.push(row_for(catalog, channel_number, &slot.primary));
            for filler in &slot.filler {
                rows.push(row_for(catalog, channel_number, filler));
            }
        }
    }
    rows
}
