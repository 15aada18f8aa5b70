//! Sync progress reporting.

use anisync_anilist::SeasonQuery;

/// Trait for receiving sync progress updates.
pub trait SyncProgress {
    /// Called before each partition is walked.
    fn on_partition(&self, current: usize, total: usize, partition: &SeasonQuery);

    /// Called after each record is reconciled.
    fn on_record(&self, current: usize, total: usize, title: &str);

    /// Called when a phase starts (e.g., "Reconciling 812 records").
    fn on_phase(&self, message: &str);

    /// Called when the cycle is complete.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl SyncProgress for SilentProgress {
    fn on_partition(&self, _current: usize, _total: usize, _partition: &SeasonQuery) {}
    fn on_record(&self, _current: usize, _total: usize, _title: &str) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl SyncProgress for LogProgress {
    fn on_partition(&self, current: usize, total: usize, partition: &SeasonQuery) {
        log::info!("  [{}/{}] Fetching {}", current, total, partition);
    }

    fn on_record(&self, current: usize, total: usize, title: &str) {
        if current.is_multiple_of(250) || current == total {
            log::info!("  [{}/{}] {}", current, total, title);
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
