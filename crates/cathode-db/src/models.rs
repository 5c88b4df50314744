//! Rust models matching the catalog and schedule schemas.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use cathode_common::ContentKind;

/// One immutable catalog record.
///
/// Loaded once per scheduling run and never mutated; placements made from it
/// live in separate structs (see `cathode-sched`). `runtime_secs` is the
/// float-then-truncate conversion of the catalog's decimal-string runtime;
/// `runtime_raw` keeps the original string because schedule rows carry it
/// through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub id: i64,
    pub kind: ContentKind,
    pub title: String,
    pub overview: Option<String>,
    pub external_ref: Option<String>,
    pub tags: Vec<String>,
    pub runtime_secs: u32,
    pub runtime_raw: String,
    pub filepath: String,
    // TV-only fields
    pub show_name: Option<String>,
    pub season: Option<i32>,
    pub episode: Option<i32>,
}

impl ContentItem {
    /// Parse a catalog runtime string ("1352" or "1352.04") to whole seconds.
    pub fn parse_runtime(raw: &str) -> Option<u32> {
        let secs = raw.trim().parse::<f64>().ok()?;
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        Some(secs as u32)
    }

    /// Tags joined back into the catalog's comma-separated form.
    pub fn tags_joined(&self) -> String {
        self.tags.join(",")
    }
}

/// One persisted schedule row: a program or filler placement on a channel.
///
/// Program rows carry name/show metadata; filler rows leave those NULL and
/// put the kind literal in `tags`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleRow {
    pub id: Option<i64>,
    pub channel_number: u32,
    pub name: Option<String>,
    pub show_name: Option<String>,
    pub season: Option<i32>,
    pub episode: Option<i32>,
    pub overview: Option<String>,
    pub tags: String,
    pub runtime: String,
    pub filepath: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runtime() {
        assert_eq!(ContentItem::parse_runtime("1352"), Some(1352));
        assert_eq!(ContentItem::parse_runtime("1352.94"), Some(1352));
        assert_eq!(ContentItem::parse_runtime(" 90.0 "), Some(90));
        assert_eq!(ContentItem::parse_runtime("-5"), None);
        assert_eq!(ContentItem::parse_runtime("NaN"), None);
        assert_eq!(ContentItem::parse_runtime("twenty"), None);
    }
}
