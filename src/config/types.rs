//! Configuration types.

use serde::{Deserialize, Serialize};

use cathode_common::{Error, Result, StrategyKind};
use cathode_sched::Channel;

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

/// Where the read-only content catalog lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub db_path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: "catalog.db".to_string(),
        }
    }
}

/// Where generated schedules are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub db_path: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            db_path: "schedule.db".to_string(),
        }
    }
}

/// mpv player settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// mpv binary to spawn.
    #[serde(default = "default_mpv_bin")]
    pub mpv_bin: String,
    /// Unix socket path for mpv's JSON IPC.
    #[serde(default = "default_ipc_socket")]
    pub ipc_socket: String,
    /// Playback-loop poll interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Extra arguments passed to mpv (video output, hwdec, ...).
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_mpv_bin() -> String {
    "mpv".to_string()
}

fn default_ipc_socket() -> String {
    "/tmp/cathode-mpv.sock".to_string()
}

fn default_poll_interval_ms() -> u64 {
    250
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mpv_bin: default_mpv_bin(),
            ipc_socket: default_ipc_socket(),
            poll_interval_ms: default_poll_interval_ms(),
            extra_args: Vec::new(),
        }
    }
}

/// One configured channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    pub number: u32,
    #[serde(default)]
    pub description: String,
    /// Strategy names as the scheduler knows them: Basic, MoviesByTag,
    /// TVMarathon, PPV, MTV.
    pub strategies: Vec<String>,
}

impl ChannelConfig {
    /// Parse into the scheduler's channel type, rejecting unknown strategies.
    pub fn to_channel(&self) -> Result<Channel> {
        let strategies = self
            .strategies
            .iter()
            .map(|s| s.parse::<StrategyKind>())
            .collect::<Result<Vec<_>>>()
            .map_err(|e| Error::config(format!("channel {}: {e}", self.number)))?;
        Ok(Channel {
            number: self.number,
            name: self.name.clone(),
            description: self.description.clone(),
            strategies,
        })
    }
}
