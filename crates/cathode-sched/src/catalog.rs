//! In-memory catalog snapshot for one scheduling run.
//!
//! Records are immutable once loaded; strategies hand out `usize` indices
//! into this snapshot and pair them with freshly-built placements, so the
//! same item can appear on the timeline any number of times without aliasing.

use chrono::Duration;
use std::collections::BTreeSet;

use cathode_common::ContentKind;
use cathode_db::models::ContentItem;

/// Immutable content snapshot shared by every strategy in a run.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<ContentItem>,
}

impl Catalog {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, idx: usize) -> &ContentItem {
        &self.items[idx]
    }

    /// Whole-second runtime of an item as a duration.
    pub fn runtime(&self, idx: usize) -> Duration {
        Duration::seconds(i64::from(self.items[idx].runtime_secs))
    }

    /// Indices of every item in the snapshot.
    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.items.len()).collect()
    }

    /// Indices of items of one kind.
    pub fn indices_of(&self, kind: ContentKind) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of idents carrying a given tag; all idents when none match.
    pub fn ident_indices(&self, tag: &str) -> Vec<usize> {
        let tagged: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.kind == ContentKind::Ident && item.tags.iter().any(|t| t == tag)
            })
            .map(|(i, _)| i)
            .collect();
        if tagged.is_empty() {
            self.indices_of(ContentKind::Ident)
        } else {
            tagged
        }
    }

    /// Unique show names that have at least one episode.
    pub fn show_names(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .items
            .iter()
            .filter(|item| item.kind == ContentKind::Tv)
            .filter_map(|item| item.show_name.as_deref())
            .collect();
        set.into_iter().collect()
    }

    /// Episode indices of one show, sorted by (season, episode) ascending.
    pub fn episodes_of(&self, show: &str) -> Vec<usize> {
        let mut eps: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.kind == ContentKind::Tv && item.show_name.as_deref() == Some(show)
            })
            .map(|(i, _)| i)
            .collect();
        eps.sort_by_key(|&i| {
            (
                self.items[i].season.unwrap_or(0),
                self.items[i].episode.unwrap_or(0),
            )
        });
        eps
    }

    /// The unique tag vocabulary across program content (filler tags like
    /// "commercial" are not programming tags and stay out).
    pub fn tag_vocabulary(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .items
            .iter()
            .filter(|item| item.kind.is_program())
            .flat_map(|item| item.tags.iter().map(String::as_str))
            .collect();
        set.into_iter().map(String::from).collect()
    }
}
