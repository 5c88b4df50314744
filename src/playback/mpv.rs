//! mpv JSON-IPC client.
//!
//! Spawns mpv with `--input-ipc-server` and speaks newline-delimited JSON
//! over the Unix socket. Requests carry a `request_id`; the reader skips
//! unsolicited event lines until the matching response arrives. The playback
//! loop issues one command at a time, so a sequential request/response
//! exchange is all this needs.

use anyhow::{anyhow, Context};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout, Duration};

use crate::config::PlayerConfig;
use crate::playback::PlayerControl;

/// How long one IPC round trip may take before we assume mpv is wedged.
const IPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Attempts to connect to the IPC socket after spawning mpv.
const CONNECT_ATTEMPTS: u32 = 40;

pub struct MpvPlayer {
    child: Child,
    writer: Mutex<OwnedWriteHalf>,
    reader: Mutex<Lines<BufReader<OwnedReadHalf>>>,
    next_req_id: AtomicU64,
}

impl MpvPlayer {
    /// Spawn mpv and connect to its IPC socket.
    pub async fn spawn(config: &PlayerConfig) -> anyhow::Result<Self> {
        let socket = &config.ipc_socket;
        if Path::new(socket).exists() {
            let _ = std::fs::remove_file(socket);
        }

        let child = Command::new(&config.mpv_bin)
            .arg(format!("--input-ipc-server={socket}"))
            .arg("--idle=yes")
            .arg("--force-window=yes")
            .args(&config.extra_args)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", config.mpv_bin))?;

        // The socket appears a moment after the process starts
        let mut stream = None;
        for _ in 0..CONNECT_ATTEMPTS {
            match UnixStream::connect(socket).await {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(_) => sleep(Duration::from_millis(100)).await,
            }
        }
        let stream = stream.ok_or_else(|| anyhow!("mpv IPC socket {socket} never came up"))?;
        tracing::info!(socket, "connected to mpv");

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            child,
            writer: Mutex::new(write_half),
            reader: Mutex::new(BufReader::new(read_half).lines()),
            next_req_id: AtomicU64::new(1),
        })
    }

    /// Send one command and await its response, skipping event lines.
    async fn command(&self, command: Value) -> anyhow::Result<Value> {
        let req_id = self.next_req_id.fetch_add(1, Ordering::Relaxed);
        let mut raw = serde_json::to_string(&json!({
            "command": command,
            "request_id": req_id,
        }))?;
        raw.push('\n');

        {
            let mut writer = self.writer.lock().await;
            writer.write_all(raw.as_bytes()).await?;
        }

        let mut reader = self.reader.lock().await;
        timeout(IPC_TIMEOUT, async {
            loop {
                let line = reader
                    .next_line()
                    .await?
                    .ok_or_else(|| anyhow!("mpv closed the IPC socket"))?;
                let value: Value = match serde_json::from_str(&line) {
                    Ok(v) => v,
                    Err(_) => continue,
                };
                if value.get("request_id").and_then(Value::as_u64) != Some(req_id) {
                    // Unsolicited event or stale reply
                    continue;
                }
                match value.get("error").and_then(Value::as_str) {
                    Some("success") => return Ok(value),
                    Some(err) => return Err(anyhow!("mpv error: {err}")),
                    None => return Err(anyhow!("malformed mpv response: {line}")),
                }
            }
        })
        .await
        .map_err(|_| anyhow!("mpv IPC timeout for req={req_id}"))?
    }

    /// Poll get_property until mpv knows the file's duration, meaning the
    /// file is actually loaded and seekable.
    async fn wait_until_loaded(&self) -> anyhow::Result<()> {
        for _ in 0..CONNECT_ATTEMPTS {
            if self.command(json!(["get_property", "duration"])).await.is_ok() {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        Err(anyhow!("file never became seekable"))
    }

    /// Terminate the mpv process.
    pub async fn shutdown(mut self) {
        let _ = self.command(json!(["quit"])).await;
        let _ = self.child.wait().await;
    }
}

#[async_trait::async_trait]
impl PlayerControl for MpvPlayer {
    async fn load_file(&self, path: &str) -> anyhow::Result<()> {
        tracing::debug!(path, "loadfile");
        self.command(json!(["loadfile", path, "replace"])).await?;
        self.wait_until_loaded().await
    }

    async fn seek(&self, offset_secs: f64) -> anyhow::Result<()> {
        tracing::debug!(offset_secs, "seek");
        self.command(json!(["set_property", "time-pos", offset_secs]))
            .await?;
        Ok(())
    }

    async fn show_channel(&self, number: u32) -> anyhow::Result<()> {
        self.command(json!(["show-text", format!("CH {number}"), 2000]))
            .await?;
        Ok(())
    }
}
