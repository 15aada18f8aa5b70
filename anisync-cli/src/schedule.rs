//! The daemon loop: warm up, then run a sync cycle on a fixed interval.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;
use tokio::time::{Instant, MissedTickBehavior};

use anisync_sync::{LogProgress, PageSource, SyncOptions, SyncReport, run_sync_cycle};

use crate::config::ScheduleConfig;

/// Run cycles forever. A failed cycle is logged and the loop waits for the
/// next tick; cycles never overlap.
pub(crate) async fn run_forever<S: PageSource>(
    source: &S,
    options: &SyncOptions,
    schedule: &ScheduleConfig,
) {
    let warmup = schedule.warmup();
    if !warmup.is_zero() {
        log::info!("Waiting {}s before the first sync", warmup.as_secs());
        tokio::time::sleep(warmup).await;
    }

    let mut ticker = tokio::time::interval_at(Instant::now(), schedule.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let started = chrono::Local::now();
        run_cycle(source, options).await;
        if let Ok(delta) = chrono::Duration::from_std(schedule.interval()) {
            log::info!("Next sync at {}", (started + delta).to_rfc2822());
        }
    }
}

/// One cycle behind the error boundary. Returns whether the cycle completed.
pub(crate) async fn run_cycle<S: PageSource>(source: &S, options: &SyncOptions) -> bool {
    match run_sync_cycle(source, options, &LogProgress).await {
        Ok(report) => {
            print_report(&report);
            true
        }
        Err(e) => {
            log::error!("Sync cycle failed: {}", e);
            false
        }
    }
}

fn print_report(report: &SyncReport) {
    for (level, line) in summary_lines(report) {
        log::log!(level, "{}", line);
    }
}

/// The end-of-cycle summary. env_logger writes to stderr, so colour support
/// is checked on stderr.
fn summary_lines(report: &SyncReport) -> Vec<(log::Level, String)> {
    use log::Level::{Info, Warn};

    let fetch = &report.fetch;
    let stats = &report.reconcile;
    let mut lines = vec![
        (
            Info,
            format!("{}", "Sync complete".if_supports_color(Stderr, |t| t.bold())),
        ),
        (Info, format!("  Partitions:       {:>6}", fetch.partitions)),
        (Info, format!("  Requests:         {:>6}", fetch.requests)),
    ];
    if fetch.failed_pages > 0 {
        lines.push((
            Info,
            format!(
                "  Failed pages:     {:>6}",
                fetch.failed_pages.if_supports_color(Stderr, |t| t.yellow()),
            ),
        ));
    }
    lines.extend([
        (Info, format!("  Records fetched:  {:>6}", fetch.records)),
        (Info, format!("  Media created:    {:>6}", stats.media_created)),
        (Info, format!("  Media updated:    {:>6}", stats.media_updated)),
        (Info, format!("  Titles written:   {:>6}", stats.titles_written)),
        (Info, format!("  Synonyms written: {:>6}", stats.synonyms_written)),
        (Info, format!("  Genre links:      {:>6}", stats.genre_links_written)),
    ]);
    if stats.genres_created > 0 {
        lines.push((Info, format!("  New genres:       {:>6}", stats.genres_created)));
    }
    if stats.errors > 0 {
        lines.push((
            Warn,
            format!(
                "  Errors:           {:>6}",
                stats.errors.if_supports_color(Stderr, |t| t.red()),
            ),
        ));
    }
    if stats.records_rolled_back > 0 {
        lines.push((Warn, format!("  Rolled back:      {:>6}", stats.records_rolled_back)));
    }

    if let Some(catalog) = &report.catalog {
        lines.push((
            Info,
            format!(
                "  Catalog: {} media, {} titles, {} synonyms, {} genres",
                catalog.media.if_supports_color(Stderr, |t| t.green()),
                catalog.titles,
                catalog.synonyms,
                catalog.genres,
            ),
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use anisync_anilist::{FetchError, Page, PageRequest, SeasonQuery};
    use anisync_db::CatalogStats;
    use anisync_sync::{FetchStats, ReconcileStats};

    use super::*;

    struct Offline;

    impl PageSource for Offline {
        fn fetch_page(
            &self,
            _query: &SeasonQuery,
            _request: PageRequest,
        ) -> impl Future<Output = Result<Page, FetchError>> {
            std::future::ready(Err(FetchError::MissingData))
        }
    }

    #[tokio::test]
    async fn offline_remote_still_completes_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let options = SyncOptions::new(dir.path().join("media.db"));

        assert!(run_cycle(&Offline, &options).await);
    }

    #[tokio::test]
    async fn storage_failure_is_contained() {
        let dir = tempfile::tempdir().unwrap();
        let options = SyncOptions::new(dir.path().join("missing").join("media.db"));

        assert!(!run_cycle(&Offline, &options).await);
    }

    fn report(errors: u64) -> SyncReport {
        SyncReport {
            fetch: FetchStats {
                partitions: 20,
                pages: 40,
                failed_pages: 1,
                requests: 41,
                records: 1900,
            },
            reconcile: ReconcileStats {
                records: 1900,
                media_created: 12,
                media_updated: 1888,
                errors,
                ..Default::default()
            },
            catalog: Some(CatalogStats {
                media: 1450,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn summary_has_no_blank_lines() {
        let lines = summary_lines(&report(0));

        assert!(lines.iter().all(|(_, line)| !line.trim().is_empty()));
        assert!(lines.iter().any(|(_, line)| line.contains("Requests") && line.contains("41")));
        assert!(lines.iter().any(|(_, line)| line.contains("1450")));
        assert!(lines.iter().all(|(level, _)| *level == log::Level::Info));
    }

    #[test]
    fn summary_warns_on_errors() {
        let lines = summary_lines(&report(3));

        let (level, line) = lines
            .iter()
            .find(|(_, line)| line.contains("Errors"))
            .unwrap();
        assert_eq!(*level, log::Level::Warn);
        assert!(line.contains('3'));
    }
}
