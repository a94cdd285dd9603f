//! `wxdash` - CLI and terminal dashboard
//!
//! This binary runs the live weather dashboard and a handful of one-shot
//! commands for fetching, inspecting and configuring.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::{mpsc, watch};

use wxdash::cli::{
    Cli, Command, ConfigCommand, DashboardCommand, FetchCommand, HistoryCommand, OutputFormat,
};
use wxdash::dashboard::{self, App};
use wxdash::logging::LogRedirect;
use wxdash::{
    init_logging, Config, OpenWeatherClient, Poller, RetryPolicy, Storage, WeatherReading,
    WeatherSource,
};

/// Capacity of the poller-to-dashboard channel.
const UPDATE_BUFFER: usize = 16;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();
    let config_path = cli.config.clone();
    let command = cli.into_command();

    let redirect = init_logging(verbosity);

    match command {
        Command::Dashboard(cmd) => handle_dashboard(&load_config(config_path)?, cmd, &redirect),
        Command::Fetch(cmd) => handle_fetch(&load_config(config_path)?, cmd),
        Command::History(cmd) => handle_history(&load_config(config_path)?, &cmd),
        Command::Status(cmd) => handle_status(&load_config(config_path)?, cmd.json),
        // Config commands load (or validate) on their own.
        Command::Config(cmd) => handle_config(config_path, cmd),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("failed to load configuration")
}

fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    let policy = RetryPolicy::new(config.storage.connect_attempts, config.connect_wait());
    let path = config.database_path();
    Storage::open_with_retry(&path, &policy)
        .with_context(|| format!("could not open database at {}", path.display()))
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn city_or_default(config: &Config, city: Option<String>) -> String {
    city.map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| config.dashboard.default_city.clone())
}

fn handle_dashboard(
    config: &Config,
    cmd: DashboardCommand,
    redirect: &LogRedirect,
) -> anyhow::Result<()> {
    let city = city_or_default(config, cmd.city);
    let interval = cmd
        .refresh
        .map_or_else(|| config.refresh_interval(), std::time::Duration::from_secs);

    let client = OpenWeatherClient::new(&config.api)?;
    let storage = open_storage(config)?;

    // Connection retries go to stderr; once the dashboard owns the terminal
    // logging moves to a file.
    let log_path = Config::default_log_path();
    redirect
        .to_file(&log_path)
        .with_context(|| format!("could not open log file {}", log_path.display()))?;

    let rt = runtime()?;

    let (city_tx, city_rx) = watch::channel(city.clone());
    let (update_tx, mut update_rx) = mpsc::channel(UPDATE_BUFFER);

    let poller = Poller::new(client, storage)
        .with_history_limit(config.dashboard.history_limit)
        .with_interval(interval);
    let task = rt.spawn(poller.run(city_rx, update_tx));

    let mut app = App::new(city, config.api.units);
    let mut terminal = ratatui::init();
    let result = dashboard::run(&mut terminal, &mut app, &mut update_rx, &city_tx);
    ratatui::restore();

    drop(city_tx);
    drop(update_rx);
    task.abort();
    rt.shutdown_timeout(std::time::Duration::from_secs(1));

    result.map_err(Into::into)
}

fn handle_fetch(config: &Config, cmd: FetchCommand) -> anyhow::Result<()> {
    let city = city_or_default(config, cmd.city);
    let client = OpenWeatherClient::new(&config.api)?;
    let rt = runtime()?;

    let mut reading = match rt.block_on(client.current(&city)) {
        Ok(reading) => reading,
        Err(e) => {
            tracing::debug!("fetch failed: {e}");
            anyhow::bail!(e.user_message());
        }
    };

    if !cmd.no_save {
        let storage = open_storage(config)?;
        reading.id = Some(storage.insert(&reading)?);
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        println!("{}", reading.summary(config.api.units));
        if let Some(id) = reading.id {
            println!("  Stored as:    #{id}");
        }
    }
    Ok(())
}

fn handle_history(config: &Config, cmd: &HistoryCommand) -> anyhow::Result<()> {
    let city = city_or_default(config, cmd.city.clone());
    let storage = open_storage(config)?;
    let readings = storage.recent_for_city(&city, cmd.limit)?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&readings)?),
        OutputFormat::Plain => {
            for reading in &readings {
                println!(
                    "{}\t{:.1}\t{:.0}\t{:.0}\t{:.1}\t{}",
                    format_local(reading),
                    reading.temperature,
                    reading.humidity,
                    reading.pressure,
                    reading.wind_speed,
                    reading.description
                );
            }
        }
        OutputFormat::Table => {
            if readings.is_empty() {
                println!("No readings stored for {city}.");
                return Ok(());
            }
            println!(
                "{:<19}  {:>7}  {:>8}  {:>8}  {:>6}  Description",
                "Time", "Temp", "Humidity", "Pressure", "Wind"
            );
            for reading in &readings {
                println!(
                    "{:<19}  {:>7.1}  {:>8.0}  {:>8.0}  {:>6.1}  {}",
                    format_local(reading),
                    reading.temperature,
                    reading.humidity,
                    reading.pressure,
                    reading.wind_speed,
                    reading.headline()
                );
            }
        }
    }
    Ok(())
}

fn format_local(reading: &WeatherReading) -> String {
    reading
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;
    let cities = storage.cities()?;

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "default_city": config.dashboard.default_city,
            "api_key_configured": config.api.key.is_some(),
            "stats": stats,
            "cities": cities,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("wxdash status");
    println!("-------------");
    println!("Database:      {}", storage.path().display());
    println!("Size:          {} bytes", stats.db_size_bytes);
    println!("Readings:      {}", stats.total_readings);
    if let (Some(oldest), Some(newest)) = (stats.oldest_reading, stats.newest_reading) {
        println!("Oldest:        {}", oldest.to_rfc3339());
        println!("Newest:        {}", newest.to_rfc3339());
    }
    println!("Default city:  {}", config.dashboard.default_city);
    println!(
        "API key:       {}",
        if config.api.key.is_some() {
            "configured"
        } else {
            "missing"
        }
    );

    if !cities.is_empty() {
        println!();
        println!("Cities:");
        for summary in &cities {
            println!(
                "  {:<24} {:>6} readings, last {}",
                summary.city,
                summary.readings,
                summary.last_seen.to_rfc3339()
            );
        }
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?.redacted();
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!(
                    "  Key:                {}",
                    config.api.key.as_deref().unwrap_or("(not set)")
                );
                println!("  Base URL:           {}", config.api.base_url);
                println!("  Units:              {}", config.api.units);
                println!("  Timeout (secs):     {}", config.api.timeout_secs);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Connect attempts:   {}", config.storage.connect_attempts);
                println!("  Connect wait (s):   {}", config.storage.connect_wait_secs);
                println!();
                println!("[Dashboard]");
                println!("  Default city:       {}", config.dashboard.default_city);
                println!(
                    "  Refresh (secs):     {}",
                    config.dashboard.refresh_interval_secs
                );
                println!("  History limit:      {}", config.dashboard.history_limit);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => anyhow::bail!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
