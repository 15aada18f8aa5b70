//! Daemon configuration, read once at startup from a TOML file.
//!
//! Lookup order: `$ANISYNC_CONFIG`, then `./config/config.toml`, then
//! `~/.config/anisync/config.toml` (platform config dir). Only the database
//! path is required; every other key has a default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anisync_anilist::{ANILIST_ENDPOINT, ClientSettings, MAX_PER_PAGE};
use anisync_sync::{ReconcileOptions, SyncOptions};
use serde::Deserialize;

use crate::error::CliError;

/// Environment variable overriding the config file location.
pub(crate) const CONFIG_ENV: &str = "ANISYNC_CONFIG";

const LOCAL_CONFIG: &str = "config/config.toml";

/// Longest accepted sync interval: one year.
const MAX_INTERVAL_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AppConfig {
    pub(crate) database: DatabaseConfig,
    #[serde(default)]
    pub(crate) anilist: AniListConfig,
    #[serde(default)]
    pub(crate) schedule: ScheduleConfig,
    #[serde(default)]
    pub(crate) sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DatabaseConfig {
    pub(crate) path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AniListConfig {
    pub(crate) endpoint: String,
    pub(crate) per_page: u32,
    pub(crate) request_timeout_secs: u64,
    pub(crate) min_request_interval_ms: u64,
}

impl Default for AniListConfig {
    fn default() -> Self {
        Self {
            endpoint: ANILIST_ENDPOINT.to_string(),
            per_page: MAX_PER_PAGE,
            request_timeout_secs: 30,
            min_request_interval_ms: 700,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ScheduleConfig {
    pub(crate) warmup_secs: u64,
    pub(crate) interval_hours: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            warmup_secs: 120,
            interval_hours: 12,
        }
    }
}

impl ScheduleConfig {
    pub(crate) fn warmup(&self) -> Duration {
        Duration::from_secs(self.warmup_secs)
    }

    pub(crate) fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours * 60 * 60)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SyncConfig {
    pub(crate) transactional: bool,
}

impl AppConfig {
    /// Parse and validate a config document.
    pub(crate) fn parse(text: &str) -> Result<Self, CliError> {
        let config: AppConfig =
            toml::from_str(text).map_err(|e| CliError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the config file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("Could not read {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
            .map_err(|e| CliError::config(format!("{} ({})", e, path.display())))
    }

    fn validate(&self) -> Result<(), CliError> {
        if self.database.path.as_os_str().is_empty() {
            return Err(CliError::config("database.path must not be empty"));
        }
        if !(1..=MAX_PER_PAGE).contains(&self.anilist.per_page) {
            return Err(CliError::config(format!(
                "anilist.per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.anilist.per_page
            )));
        }
        if !(1..=MAX_INTERVAL_HOURS).contains(&self.schedule.interval_hours) {
            return Err(CliError::config(format!(
                "schedule.interval_hours must be between 1 and {}, got {}",
                MAX_INTERVAL_HOURS, self.schedule.interval_hours
            )));
        }
        Ok(())
    }

    pub(crate) fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            endpoint: self.anilist.endpoint.clone(),
            timeout: Duration::from_secs(self.anilist.request_timeout_secs),
            min_request_interval: Duration::from_millis(self.anilist.min_request_interval_ms),
        }
    }

    pub(crate) fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            database_path: self.database.path.clone(),
            per_page: self.anilist.per_page,
            reconcile: ReconcileOptions {
                transactional: self.sync.transactional,
            },
        }
    }
}

/// Resolve which config file to read.
pub(crate) fn config_path() -> Result<PathBuf, CliError> {
    resolve_config_path(
        std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        Path::new(LOCAL_CONFIG),
        dirs::config_dir(),
    )
}

fn resolve_config_path(
    from_env: Option<PathBuf>,
    local: &Path,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, CliError> {
    if let Some(path) = from_env.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    if local.is_file() {
        return Ok(local.to_path_buf());
    }
    config_dir
        .map(|d| d.join("anisync").join("config.toml"))
        .ok_or_else(|| {
            CliError::config(format!(
                "Could not determine config directory; set {}",
                CONFIG_ENV
            ))
        })
}
