//! Timestamp helpers shared by the scheduler and the persistence layer.
//!
//! Schedule rows store local wall-clock timestamps as `YYYY-MM-DD HH:MM:SS`
//! strings, so everything here works on [`NaiveDateTime`].

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::{Error, Result};

/// Timestamp format used by persisted schedule rows.
pub const SQL_TS: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp the way schedule rows store it.
pub fn format_ts(ts: NaiveDateTime) -> String {
    ts.format(SQL_TS).to_string()
}

/// Parse a persisted `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn parse_ts(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, SQL_TS)
        .map_err(|e| Error::invalid_input(format!("bad timestamp {s:?}: {e}")))
}

/// Round a marker up to the next half-hour boundary (:00 or :30).
///
/// A marker already sitting exactly on a boundary is returned unchanged.
pub fn next_half_hour(marker: NaiveDateTime) -> NaiveDateTime {
    let past_hour = marker.minute() * 60 + marker.second();
    if past_hour == 0 || past_hour == 30 * 60 {
        return marker;
    }
    let truncated = marker
        .with_minute(0)
        .and_then(|m| m.with_second(0))
        .and_then(|m| m.with_nanosecond(0))
        .unwrap_or(marker);
    if past_hour < 30 * 60 {
        truncated + Duration::minutes(30)
    } else {
        truncated + Duration::hours(1)
    }
}

/// Midnight-to-midnight bounds of one broadcast day.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    (start, start + Duration::hours(24))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_ts(s).unwrap()
    }

    #[test]
    fn test_format_parse_round_trip() {
        let t = ts("2024-01-01 08:30:00");
        assert_eq!(format_ts(t), "2024-01-01 08:30:00");
        assert!(parse_ts("2024-13-99 99:00:00").is_err());
    }

    #[test]
    fn test_next_half_hour() {
        assert_eq!(next_half_hour(ts("2024-01-01 08:10:12")), ts("2024-01-01 08:30:00"));
        assert_eq!(next_half_hour(ts("2024-01-01 08:31:00")), ts("2024-01-01 09:00:00"));
        // Boundaries stay put
        assert_eq!(next_half_hour(ts("2024-01-01 08:30:00")), ts("2024-01-01 08:30:00"));
        assert_eq!(next_half_hour(ts("2024-01-01 08:00:00")), ts("2024-01-01 08:00:00"));
        // Day rollover
        assert_eq!(next_half_hour(ts("2024-01-01 23:45:01")), ts("2024-01-02 00:00:00"));
    }

    #[test]
    fn test_day_bounds() {
        let (start, end) = day_bounds(ts("2024-06-15 12:00:00").date());
        assert_eq!(start, ts("2024-06-15 00:00:00"));
        assert_eq!(end, ts("2024-06-16 00:00:00"));
        assert_eq!(end - start, Duration::hours(24));
    }
}
