//! The live playback loop.
//!
//! A long-lived task that keeps the player pointed at whatever the schedule
//! says is on: it polls sub-second, consumes channel-switch signals at the
//! top of each iteration, and on every (re)tune resolves the active item and
//! hands the player a `(filepath, seek offset)` pair. A missing schedule is
//! not fatal — the loop backs off and retries until rows appear.

mod mpv;

pub use mpv::MpvPlayer;

use chrono::{Local, NaiveDateTime};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use cathode_common::Error as CathodeError;
use cathode_db::pool::{get_conn, DbPool};
use cathode_sched::resolver::resolve;

use crate::keys::{step_channel, KeyCommand};

/// Backoff before re-querying when nothing is scheduled right now.
const NO_SLOT_BACKOFF: Duration = Duration::from_secs(1);

/// The control surface the loop drives. mpv in production; tests record.
#[async_trait::async_trait]
pub trait PlayerControl: Send + Sync {
    async fn load_file(&self, path: &str) -> anyhow::Result<()>;
    async fn seek(&self, offset_secs: f64) -> anyhow::Result<()>;
    async fn show_channel(&self, number: u32) -> anyhow::Result<()>;
}

/// Resolve the active item on `channel` and point the player at it.
///
/// Returns the end timestamp of the item now playing, or `None` when the
/// channel has nothing scheduled at `now`.
pub async fn tune<P: PlayerControl>(
    player: &P,
    pool: &DbPool,
    channel: u32,
    now: NaiveDateTime,
) -> anyhow::Result<Option<NaiveDateTime>> {
    let conn = get_conn(pool)?;
    let now_playing = match resolve(&conn, channel, now) {
        Ok(np) => np,
        Err(CathodeError::NoActiveSlot { .. }) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        channel,
        filepath = %now_playing.row.filepath,
        seek = now_playing.seek_offset_secs,
        until = %now_playing.row.end,
        "tuning"
    );
    player.load_file(&now_playing.row.filepath).await?;
    if now_playing.seek_offset_secs > 0 {
        player.seek(now_playing.seek_offset_secs as f64).await?;
    }
    player.show_channel(channel).await?;
    Ok(Some(now_playing.row.end))
}

/// Run the playback loop until a quit command arrives.
pub async fn run_loop<P: PlayerControl>(
    player: &P,
    pool: &DbPool,
    channels: &[u32],
    start_channel: u32,
    poll_interval: Duration,
    commands: &mut mpsc::Receiver<KeyCommand>,
) -> anyhow::Result<()> {
    let mut current = start_channel;
    let mut playing_until: Option<NaiveDateTime> = None;

    loop {
        // Channel-switch signals are consumed at the top of each iteration
        let mut switched = false;
        while let Ok(command) = commands.try_recv() {
            match command {
                KeyCommand::Quit => {
                    tracing::info!("quit requested");
                    return Ok(());
                }
                KeyCommand::ChannelUp => {
                    current = step_channel(channels, current, true);
                    switched = true;
                }
                KeyCommand::ChannelDown => {
                    current = step_channel(channels, current, false);
                    switched = true;
                }
            }
        }
        if switched {
            tracing::info!(channel = current, "channel changed");
            playing_until = None;
        }

        let now = Local::now().naive_local();
        let needs_tune = playing_until.map_or(true, |end| now >= end);
        if needs_tune {
            match tune(player, pool, current, now).await? {
                Some(end) => playing_until = Some(end),
                None => {
                    tracing::warn!(channel = current, "nothing scheduled right now, retrying");
                    sleep(NO_SLOT_BACKOFF).await;
                    continue;
                }
            }
        }

        sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cathode_common::time::parse_ts;
    use cathode_db::models::ScheduleRow;
    use cathode_db::pool::init_memory_schedule_pool;
    use cathode_db::queries::schedule;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPlayer {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl PlayerControl for RecordingPlayer {
        async fn load_file(&self, path: &str) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("load {path}"));
            Ok(())
        }

        async fn seek(&self, offset_secs: f64) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("seek {offset_secs}"));
            Ok(())
        }

        async fn show_channel(&self, number: u32) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("osd {number}"));
            Ok(())
        }
    }

    fn seeded_pool() -> DbPool {
        let pool = init_memory_schedule_pool().unwrap();
        let mut conn = get_conn(&pool).unwrap();
        let row = ScheduleRow {
            id: None,
            channel_number: 1,
            name: Some("Pilot".into()),
            show_name: Some("Static City".into()),
            season: Some(1),
            episode: Some(1),
            overview: None,
            tags: "drama".into(),
            runtime: "1800".into(),
            filepath: "/tv/static-city/s01e01.mkv".into(),
            start: parse_ts("2024-01-01 08:00:00").unwrap(),
            end: parse_ts("2024-01-01 08:30:00").unwrap(),
        };
        schedule::replace_channel(&mut conn, 1, &[row]).unwrap();
        pool
    }

    #[tokio::test]
    async fn test_tune_loads_seeks_and_overlays() {
        let pool = seeded_pool();
        let player = RecordingPlayer::default();

        let until = tune(&player, &pool, 1, parse_ts("2024-01-01 08:10:00").unwrap())
            .await
            .unwrap();
        assert_eq!(until, Some(parse_ts("2024-01-01 08:30:00").unwrap()));

        let calls = player.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                "load /tv/static-city/s01e01.mkv".to_string(),
                "seek 600".to_string(),
                "osd 1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_tune_at_item_start_skips_seek() {
        let pool = seeded_pool();
        let player = RecordingPlayer::default();

        tune(&player, &pool, 1, parse_ts("2024-01-01 08:00:00").unwrap())
            .await
            .unwrap();
        let calls = player.calls.lock().unwrap();
        assert!(!calls.iter().any(|c| c.starts_with("seek")));
    }

    #[tokio::test]
    async fn test_tune_with_empty_schedule_is_none() {
        let pool = seeded_pool();
        let player = RecordingPlayer::default();

        let until = tune(&player, &pool, 7, parse_ts("2024-01-01 08:10:00").unwrap())
            .await
            .unwrap();
        assert_eq!(until, None);
        assert!(player.calls.lock().unwrap().is_empty());
    }
}
