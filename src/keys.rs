//! Keyboard input: channel up/down and quit.
//!
//! A blocking task reads raw-mode key events and forwards them as commands;
//! the playback loop consumes them at the top of each poll iteration. Keys
//! follow the remote-style bindings: `w`/Up = channel up, `s`/Down = channel
//! down, `q` = quit.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;
use std::time::Duration;
use tokio::sync::mpsc;

/// A consumed key press, already mapped to intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    ChannelUp,
    ChannelDown,
    Quit,
}

/// Step through the channel list with wrap-around.
pub fn step_channel(channels: &[u32], current: u32, up: bool) -> u32 {
    if channels.is_empty() {
        return current;
    }
    let pos = channels.iter().position(|&c| c == current).unwrap_or(0);
    let next = if up {
        (pos + 1) % channels.len()
    } else {
        (pos + channels.len() - 1) % channels.len()
    };
    channels[next]
}

/// Spawn the blocking key-reader task. Raw mode is held for the task's
/// lifetime and restored when a quit is seen or the receiver goes away.
pub fn spawn_key_task(tx: mpsc::Sender<KeyCommand>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        if let Err(e) = terminal::enable_raw_mode() {
            tracing::warn!("could not enable raw mode, keyboard disabled: {e}");
            return;
        }
        let result = read_loop(&tx);
        let _ = terminal::disable_raw_mode();
        if let Err(e) = result {
            tracing::warn!("keyboard reader stopped: {e}");
        }
    })
}

fn read_loop(tx: &mpsc::Sender<KeyCommand>) -> std::io::Result<()> {
    loop {
        if !event::poll(Duration::from_millis(100))? {
            if tx.is_closed() {
                return Ok(());
            }
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let command = match key.code {
            KeyCode::Char('w') | KeyCode::Up => KeyCommand::ChannelUp,
            KeyCode::Char('s') | KeyCode::Down => KeyCommand::ChannelDown,
            KeyCode::Char('q') | KeyCode::Esc => KeyCommand::Quit,
            _ => continue,
        };
        let quitting = command == KeyCommand::Quit;
        if tx.blocking_send(command).is_err() || quitting {
            return Ok(());
        }
    }
}
