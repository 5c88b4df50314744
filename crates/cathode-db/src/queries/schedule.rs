//! Schedule persistence queries.
//!
//! A rebuild is always clear-then-append for one channel, wrapped in a single
//! transaction so the playback loop never observes a half-cleared schedule.
//! There is no update-in-place.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Row};

use cathode_common::time::{day_bounds, format_ts, parse_ts};
use cathode_common::{Error, Result};

use crate::models::ScheduleRow;

fn map_row(row: &Row<'_>) -> rusqlite::Result<(ScheduleRow, String, String)> {
    Ok((
        ScheduleRow {
            id: Some(row.get(0)?),
            channel_number: row.get(1)?,
            name: row.get(2)?,
            show_name: row.get(3)?,
            season: row.get(4)?,
            episode: row.get(5)?,
            overview: row.get(6)?,
            tags: row.get(7)?,
            runtime: row.get(8)?,
            filepath: row.get(9)?,
            // placeholders, fixed up from the raw strings below
            start: NaiveDateTime::MIN,
            end: NaiveDateTime::MIN,
        },
        row.get::<_, String>(10)?,
        row.get::<_, String>(11)?,
    ))
}

fn finish_row((mut row, start, end): (ScheduleRow, String, String)) -> Result<ScheduleRow> {
    row.start = parse_ts(&start)?;
    row.end = parse_ts(&end)?;
    Ok(row)
}

const SELECT_COLS: &str = "id, channel_number, name, show_name, season, episode, overview, \
                           tags, runtime, filepath, start_at, end_at";

fn insert_row(conn: &Connection, row: &ScheduleRow) -> Result<()> {
    conn.execute(
        "INSERT INTO schedule (channel_number, name, show_name, season, episode, overview,
                               tags, runtime, filepath, start_at, end_at)
         VALUES (:channel, :name, :show_name, :season, :episode, :overview,
                 :tags, :runtime, :filepath, :start_at, :end_at)",
        rusqlite::named_params! {
            ":channel": row.channel_number,
            ":name": row.name,
            ":show_name": row.show_name,
            ":season": row.season,
            ":episode": row.episode,
            ":overview": row.overview,
            ":tags": row.tags,
            ":runtime": row.runtime,
            ":filepath": row.filepath,
            ":start_at": format_ts(row.start),
            ":end_at": format_ts(row.end),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// Atomically replace one channel's schedule with the given rows.
///
/// Old rows stay visible to readers until the transaction commits.
pub fn replace_channel(
    conn: &mut Connection,
    channel_number: u32,
    rows: &[ScheduleRow],
) -> Result<usize> {
    let tx = conn
        .transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    tx.execute(
        "DELETE FROM schedule WHERE channel_number = ?",
        [channel_number],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    for row in rows {
        insert_row(&tx, row)?;
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;
    tracing::info!(channel = channel_number, rows = rows.len(), "schedule replaced");
    Ok(rows.len())
}

/// All rows for a channel, ordered by start ascending.
pub fn rows_for_channel(conn: &Connection, channel_number: u32) -> Result<Vec<ScheduleRow>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLS} FROM schedule WHERE channel_number = ? ORDER BY start_at, id"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let mapped = stmt
        .query_map([channel_number], map_row)
        .map_err(|e| Error::database(e.to_string()))?;

    let mut rows = Vec::new();
    for raw in mapped {
        rows.push(finish_row(raw.map_err(|e| Error::database(e.to_string()))?)?);
    }
    Ok(rows)
}

/// The row whose `[start, end)` interval contains `at`, if any.
pub fn row_active_at(
    conn: &Connection,
    channel_number: u32,
    at: NaiveDateTime,
) -> Result<Option<ScheduleRow>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLS} FROM schedule
             WHERE channel_number = :channel AND start_at <= :at AND end_at > :at
             ORDER BY start_at, id LIMIT 1"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let raw = stmt
        .query_row(
            rusqlite::named_params! {
                ":channel": channel_number,
                ":at": format_ts(at),
            },
            map_row,
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            e => Err(Error::database(e.to_string())),
        })?;

    raw.map(finish_row).transpose()
}

/// Whether any row for this channel starts within the given day.
///
/// Used as the freshness check before regenerating a schedule.
pub fn has_rows_for_day(conn: &Connection, channel_number: u32, date: NaiveDate) -> Result<bool> {
    let (day_start, day_end) = day_bounds(date);
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM schedule
             WHERE channel_number = :channel AND start_at >= :start AND start_at < :end",
            rusqlite::named_params! {
                ":channel": channel_number,
                ":start": format_ts(day_start),
                ":end": format_ts(day_end),
            },
            |row| row.get(0),
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(count > 0)
}
