//! Cathode: a synthetic broadcast station.
//!
//! Library surface for the `cathode` binary: configuration loading and the
//! live playback side (player control trait, mpv IPC client, keyboard task).
//! The scheduling engine itself lives in `cathode-sched`.

pub mod config;
pub mod keys;
pub mod playback;
