mod cli;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use rand::thread_rng;

use cathode::{config, keys, playback};
use cathode_common::time::{day_bounds, format_ts, parse_ts};
use cathode_db::models::ScheduleRow;
use cathode_db::pool::{get_conn, init_catalog_pool, init_schedule_pool, DbPool};
use cathode_db::queries::{catalog, schedule};
use cathode_sched::{generate_and_store, resolve, Catalog};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise derive a filter from the verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "cathode=trace,cathode_sched=trace,cathode_db=debug,cathode_common=debug".to_string()
        } else {
            "cathode=info,cathode_sched=info,cathode_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Schedule {
            channel,
            force,
            show,
        } => run_schedule(cli.config.as_deref(), channel, force, show),
        Commands::Play { channel } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_play(cli.config.as_deref(), channel))
        }
        Commands::NowPlaying { channel, at } => {
            run_now_playing(cli.config.as_deref(), channel, at.as_deref())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("cathode {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// The channels a schedule run covers: all of them, or the one requested.
fn requested_channels(
    configs: &[config::ChannelConfig],
    only: Option<u32>,
) -> Result<Vec<&config::ChannelConfig>> {
    match only {
        Some(number) => {
            let found = configs.iter().find(|c| c.number == number);
            match found {
                Some(c) => Ok(vec![c]),
                None => anyhow::bail!("Channel {} is not configured", number),
            }
        }
        None => Ok(configs.iter().collect()),
    }
}

fn open_pools(config: &config::Config) -> Result<(DbPool, DbPool)> {
    let catalog_path = shellexpand::tilde(&config.catalog.db_path);
    let schedule_path = shellexpand::tilde(&config.schedule.db_path);
    let catalog_pool = init_catalog_pool(catalog_path.as_ref())?;
    let schedule_pool = init_schedule_pool(schedule_path.as_ref())?;
    Ok((catalog_pool, schedule_pool))
}

fn run_schedule(
    config_path: Option<&std::path::Path>,
    only_channel: Option<u32>,
    force: bool,
    show: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    if config.channels.is_empty() {
        anyhow::bail!("No channels configured, nothing to schedule");
    }

    let (catalog_pool, schedule_pool) = open_pools(&config)?;
    let conn = get_conn(&catalog_pool)?;
    let items = catalog::load_catalog(&conn)?;
    if items.is_empty() {
        anyhow::bail!("Catalog is empty, add content before scheduling");
    }
    let catalog = Catalog::new(items);
    tracing::info!(items = catalog.len(), "catalog loaded");

    let today = Local::now().date_naive();
    let (day_start, _) = day_bounds(today);
    let mut rng = thread_rng();

    for channel_config in requested_channels(&config.channels, only_channel)? {
        let channel = channel_config.to_channel()?;

        let mut conn = get_conn(&schedule_pool)?;
        if !force && schedule::has_rows_for_day(&conn, channel.number, today)? {
            tracing::info!(
                channel = channel.number,
                "schedule for today already exists, skipping (use --force to rebuild)"
            );
            continue;
        }

        let stored = generate_and_store(&mut conn, &channel, &catalog, day_start, &mut rng)?;
        println!(
            "Channel {} ({}): {} items scheduled",
            channel.number, channel.name, stored
        );

        if show {
            for row in schedule::rows_for_channel(&conn, channel.number)? {
                println!(
                    "  {} - {}  {}",
                    format_ts(row.start),
                    format_ts(row.end),
                    describe_row(&row)
                );
            }
        }
    }

    Ok(())
}

async fn run_play(
    config_path: Option<&std::path::Path>,
    start_channel: Option<u32>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    if config.channels.is_empty() {
        anyhow::bail!("No channels configured, nothing to play");
    }

    let mut channels: Vec<u32> = config.channels.iter().map(|c| c.number).collect();
    channels.sort_unstable();
    let first = match start_channel {
        Some(n) if channels.contains(&n) => n,
        Some(n) => anyhow::bail!("Channel {} is not configured", n),
        None => channels[0],
    };

    let (_, schedule_pool) = open_pools(&config)?;
    let poll = tokio::time::Duration::from_millis(config.player.poll_interval_ms);

    let player = playback::MpvPlayer::spawn(&config.player).await?;
    let (tx, mut rx) = tokio::sync::mpsc::channel(16);
    let key_task = keys::spawn_key_task(tx);

    let result = playback::run_loop(&player, &schedule_pool, &channels, first, poll, &mut rx).await;

    drop(rx);
    player.shutdown().await;
    let _ = key_task.await;
    result
}

fn run_now_playing(
    config_path: Option<&std::path::Path>,
    channel: u32,
    at: Option<&str>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let schedule_path = shellexpand::tilde(&config.schedule.db_path);
    let pool = init_schedule_pool(schedule_path.as_ref())?;
    let conn = get_conn(&pool)?;

    let when = match at {
        Some(s) => parse_ts(s)?,
        None => Local::now().naive_local(),
    };

    let now_playing = resolve(&conn, channel, when)?;
    println!("Channel {} at {}", channel, format_ts(when));
    println!("  {}", describe_row(&now_playing.row));
    println!("  File:   {}", now_playing.row.filepath);
    println!(
        "  Window: {} - {}",
        format_ts(now_playing.row.start),
        format_ts(now_playing.row.end)
    );
    println!("  Offset: {}s", now_playing.seek_offset_secs);
    Ok(())
}

fn validate_config(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    println!("Configuration is valid");
    println!("  Catalog DB:  {}", config.catalog.db_path);
    println!("  Schedule DB: {}", config.schedule.db_path);
    println!("  Channels:    {}", config.channels.len());
    for channel in &config.channels {
        println!(
            "    {} {} [{}]",
            channel.number,
            channel.name,
            channel.strategies.join(", ")
        );
    }
    Ok(())
}

fn describe_row(row: &ScheduleRow) -> String {
    match (&row.show_name, &row.name) {
        (Some(show), Some(name)) => format!("{show} - {name}"),
        (None, Some(name)) => name.clone(),
        _ => row.filepath.clone(),
    }
}
