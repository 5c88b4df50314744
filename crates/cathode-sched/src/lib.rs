//! Cathode-Sched: the schedule-generation engine.
//!
//! Builds a synthetic 24-hour broadcast day per channel: interchangeable
//! strategies pick programming per block, slots are sized to fixed buckets,
//! commercials pack the remainder, and the finished timeline persists as
//! gapless, non-overlapping rows. The now-playing resolver answers "what
//! plays right now, and how far in" for the live player.
//!
//! Randomness is injected everywhere (`&mut dyn RngCore`) so tests can pin a
//! seed; production passes `rand::thread_rng()`.

pub mod catalog;
pub mod channel;
pub mod packer;
pub mod placement;
pub mod resolver;
pub mod sizer;
pub mod strategy;

#[cfg(test)]
pub(crate) mod testutil;

pub use catalog::Catalog;
pub use channel::{build_day, generate_and_store, Channel};
pub use placement::{Block, Placement, Slot};
pub use resolver::{resolve, NowPlaying};
pub use strategy::{registry, Strategy, StrategyRun};
