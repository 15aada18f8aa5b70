//! Season-by-season AniList sync into the media database.
//!
//! This crate owns the sync engine: enumerating season partitions, walking
//! their pages, and reconciling the fetched records into storage.

pub mod cycle;
pub mod partition;
pub mod progress;
pub mod reconcile;
pub mod walk;

pub use cycle::{
    FetchStats, Snapshot, SyncError, SyncOptions, SyncReport, fetch_snapshot, run_sync_cycle,
    run_sync_cycle_for,
};
pub use partition::{current_year, enumerate_partitions};
pub use progress::{LogProgress, SilentProgress, SyncProgress};
pub use reconcile::{ReconcileOptions, ReconcileStats, reconcile_all, reconcile_record};
pub use walk::{PageSource, PartitionResult, walk_partition};
