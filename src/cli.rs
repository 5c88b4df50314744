use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cathode")]
#[command(author, version, about = "Synthetic broadcast station: schedules channels and drives mpv")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate today's schedule for all channels (or one)
    Schedule {
        /// Only rebuild this channel number
        #[arg(long)]
        channel: Option<u32>,

        /// Regenerate even if today is already covered
        #[arg(long)]
        force: bool,

        /// Log the generated rows after building
        #[arg(long)]
        show: bool,
    },

    /// Start the live player on a channel
    Play {
        /// Channel number to tune first (defaults to the lowest configured)
        #[arg(long)]
        channel: Option<u32>,
    },

    /// Resolve what a channel is playing right now
    NowPlaying {
        /// Channel number to query
        channel: u32,

        /// Query time as 'YYYY-MM-DD HH:MM:SS' instead of now
        #[arg(long)]
        at: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
