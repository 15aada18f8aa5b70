//! anisync daemon
//!
//! Mirrors AniList's seasonal anime catalog into a local SQLite database,
//! re-syncing on a fixed interval.

mod config;
mod error;
mod schedule;

use anisync_anilist::AniListClient;

use crate::config::AppConfig;
use crate::error::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let path = config::config_path()?;
    log::info!("Loading config from {}", path.display());
    let config = AppConfig::load(&path)?;

    let client = AniListClient::new(&config.client_settings())?;
    let options = config.sync_options();
    log::info!(
        "Syncing {} into {}",
        client.endpoint(),
        options.database_path.display()
    );

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(schedule::run_forever(&client, &options, &config.schedule));
    Ok(())
}
