//! One full sync cycle: fetch every partition, then reconcile the snapshot.

use std::path::PathBuf;

use anisync_anilist::{MAX_PER_PAGE, MediaItem, SeasonQuery};
use anisync_db::{CatalogStats, SchemaError};
use thiserror::Error;

use crate::partition::{current_year, enumerate_partitions};
use crate::progress::SyncProgress;
use crate::reconcile::{ReconcileOptions, ReconcileStats, reconcile_all};
use crate::walk::{PageSource, walk_partition};

/// Failures that abort a cycle before any record is written.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Could not open database at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
    #[error("Database at {path} did not respond: {source}")]
    Ping {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
}

/// Options for a sync cycle.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub database_path: PathBuf,
    pub per_page: u32,
    pub reconcile: ReconcileOptions,
}

impl SyncOptions {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            per_page: MAX_PER_PAGE,
            reconcile: ReconcileOptions::default(),
        }
    }
}

/// Counters from the fetch phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchStats {
    pub partitions: u64,
    pub pages: u64,
    pub failed_pages: u64,
    pub requests: u64,
    pub records: u64,
}

/// Every record fetched in one cycle, in partition then page order.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub records: Vec<MediaItem>,
    pub stats: FetchStats,
}

/// Result of a completed cycle.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub fetch: FetchStats,
    pub reconcile: ReconcileStats,
    /// Table sizes after reconciliation, if they could be read.
    pub catalog: Option<CatalogStats>,
}

/// Walk every partition sequentially and collect all records in memory.
pub async fn fetch_snapshot<S: PageSource>(
    source: &S,
    partitions: &[SeasonQuery],
    per_page: u32,
    progress: &dyn SyncProgress,
) -> Snapshot {
    let mut snapshot = Snapshot::default();
    let total = partitions.len();

    for (i, partition) in partitions.iter().enumerate() {
        progress.on_partition(i + 1, total, partition);

        let result = walk_partition(source, partition, per_page).await;
        snapshot.stats.partitions += 1;
        snapshot.stats.pages += result.pages.len() as u64;
        snapshot.stats.failed_pages += u64::from(result.failed_pages);
        snapshot.stats.requests += u64::from(result.requests);
        snapshot.records.extend(result.into_records());
    }

    snapshot.stats.records = snapshot.records.len() as u64;
    snapshot
}

/// Run one sync cycle for the current year's partitions.
pub async fn run_sync_cycle<S: PageSource>(
    source: &S,
    options: &SyncOptions,
    progress: &dyn SyncProgress,
) -> Result<SyncReport, SyncError> {
    let partitions = enumerate_partitions(current_year());
    run_sync_cycle_for(source, &partitions, options, progress).await
}

/// Run one sync cycle over the given partitions.
///
/// The whole remote snapshot is fetched before the database is opened, so a
/// storage outage never interrupts fetching and a remote outage is seen
/// before any connection is attempted.
pub async fn run_sync_cycle_for<S: PageSource>(
    source: &S,
    partitions: &[SeasonQuery],
    options: &SyncOptions,
    progress: &dyn SyncProgress,
) -> Result<SyncReport, SyncError> {
    progress.on_phase(&format!(
        "Beginning to sync media at {}",
        chrono::Local::now().to_rfc2822()
    ));

    let snapshot = fetch_snapshot(source, partitions, options.per_page, progress).await;
    log::info!(
        "Made {} requests fetching {} partitions ({} records, {} failed pages)",
        snapshot.stats.requests,
        snapshot.stats.partitions,
        snapshot.stats.records,
        snapshot.stats.failed_pages,
    );

    let path = &options.database_path;
    let conn = anisync_db::open_database(path).map_err(|source| SyncError::Open {
        path: path.clone(),
        source,
    })?;
    anisync_db::ping(&conn).map_err(|source| SyncError::Ping {
        path: path.clone(),
        source,
    })?;

    progress.on_phase(&format!("Reconciling {} records", snapshot.records.len()));
    let reconcile = reconcile_all(&conn, &snapshot.records, &options.reconcile, progress);

    let catalog = match anisync_db::catalog_stats(&conn) {
        Ok(stats) => Some(stats),
        Err(e) => {
            log::warn!("Could not read catalog stats: {}", e);
            None
        }
    };

    log::info!(
        "Closing database connection at {}",
        chrono::Local::now().to_rfc2822()
    );
    if let Err((_, e)) = conn.close() {
        log::warn!("Failed to close database connection: {}", e);
    }

    progress.on_complete("Sync cycle complete");

    Ok(SyncReport {
        fetch: snapshot.stats,
        reconcile,
        catalog,
    })
}
