mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./cathode.toml",
        "~/.config/cathode/config.toml",
        "/etc/cathode/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration.
fn validate_config(config: &Config) -> Result<()> {
    if config.player.poll_interval_ms == 0 {
        anyhow::bail!("Player poll interval cannot be 0");
    }
    if config.player.poll_interval_ms > 500 {
        tracing::warn!(
            interval_ms = config.player.poll_interval_ms,
            "poll interval above 500ms, channel switches will feel sluggish"
        );
    }

    let mut seen = std::collections::HashSet::new();
    for channel in &config.channels {
        if !seen.insert(channel.number) {
            anyhow::bail!("Duplicate channel number {}", channel.number);
        }
        if channel.strategies.is_empty() {
            anyhow::bail!("Channel {} has no strategies", channel.number);
        }
        // Surfaces unknown strategy names at load time
        channel.to_channel()?;
    }

    Ok(())
}
