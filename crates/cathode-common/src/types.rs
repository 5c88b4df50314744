//! Core type definitions for catalog content, strategies, and slot sizes.
//!
//! Kinds are serialized in lowercase snake_case to match the catalog's kind
//! literals; strategy names keep the spelling used in channel configuration
//! files (`Basic`, `MoviesByTag`, `TVMarathon`, `PPV`, `MTV`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of catalog content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// A TV episode belonging to a show/season/episode hierarchy.
    Tv,
    /// A feature film.
    Movie,
    /// A commercial used as slot filler.
    Commercial,
    /// A music video for rotation blocks.
    MusicVideo,
    /// A channel ident/bumper.
    Ident,
}

impl ContentKind {
    /// True for content that can headline a slot (not filler).
    pub fn is_program(self) -> bool {
        matches!(self, Self::Tv | Self::Movie)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tv => write!(f, "tv"),
            Self::Movie => write!(f, "movie"),
            Self::Commercial => write!(f, "commercial"),
            Self::MusicVideo => write!(f, "music_video"),
            Self::Ident => write!(f, "ident"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tv" => Ok(Self::Tv),
            "movie" => Ok(Self::Movie),
            "commercial" => Ok(Self::Commercial),
            // The original catalog wrote "musicvideo" with no separator.
            "music_video" | "musicvideo" => Ok(Self::MusicVideo),
            "ident" => Ok(Self::Ident),
            other => Err(crate::Error::invalid_input(format!(
                "unknown content kind: {other}"
            ))),
        }
    }
}

/// A pluggable scheduling strategy, selected per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Random non-commercial fill with commercial padding.
    Basic,
    /// Movie blocks filtered by sampled tags.
    MoviesByTag,
    /// Ordered episode runs of a single show.
    #[serde(rename = "TVMarathon")]
    TvMarathon,
    /// A single movie looped back-to-back for the whole window.
    #[serde(rename = "PPV")]
    Ppv,
    /// Music-video rotation with commercial/ident breaks.
    #[serde(rename = "MTV")]
    Mtv,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "Basic"),
            Self::MoviesByTag => write!(f, "MoviesByTag"),
            Self::TvMarathon => write!(f, "TVMarathon"),
            Self::Ppv => write!(f, "PPV"),
            Self::Mtv => write!(f, "MTV"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Basic" => Ok(Self::Basic),
            "MoviesByTag" => Ok(Self::MoviesByTag),
            "TVMarathon" => Ok(Self::TvMarathon),
            "PPV" => Ok(Self::Ppv),
            "MTV" => Ok(Self::Mtv),
            other => Err(crate::Error::invalid_input(format!(
                "unknown strategy: {other}"
            ))),
        }
    }
}

/// Fixed slot bucket sizes, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotSize {
    M30,
    M60,
    M90,
    M120,
    M180,
    M240,
}

impl SlotSize {
    /// All buckets in ascending order.
    pub const ALL: [SlotSize; 6] = [
        Self::M30,
        Self::M60,
        Self::M90,
        Self::M120,
        Self::M180,
        Self::M240,
    ];

    /// Bucket size in minutes.
    pub fn minutes(self) -> u32 {
        match self {
            Self::M30 => 30,
            Self::M60 => 60,
            Self::M90 => 90,
            Self::M120 => 120,
            Self::M180 => 180,
            Self::M240 => 240,
        }
    }

    /// Bucket size in seconds.
    pub fn secs(self) -> u32 {
        self.minutes() * 60
    }
}

impl fmt::Display for SlotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.minutes())
    }
}
