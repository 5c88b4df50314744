//! Now-playing resolution: what plays right now, and how far in.

use chrono::NaiveDateTime;
use rusqlite::Connection;

use cathode_common::{Error, Result};
use cathode_db::models::ScheduleRow;
use cathode_db::queries::schedule;

/// The active row on a channel plus the seek offset into its file.
#[derive(Debug, Clone)]
pub struct NowPlaying {
    pub row: ScheduleRow,
    /// Seconds into the item; fed to the player's seek on channel switch.
    pub seek_offset_secs: i64,
}

/// Find the item active on `channel_number` at `now`.
///
/// `NoActiveSlot` means nothing is persisted for this instant (schedule not
/// generated yet, or a degenerate run left a hole); callers retry after a
/// short backoff rather than treating it as fatal.
pub fn resolve(conn: &Connection, channel_number: u32, now: NaiveDateTime) -> Result<NowPlaying> {
    let row = schedule::row_active_at(conn, channel_number, now)?
        .ok_or(Error::NoActiveSlot { channel: channel_number })?;
    let seek_offset_secs = (now - row.start).num_seconds();
    Ok(NowPlaying { row, seek_offset_secs })
}
