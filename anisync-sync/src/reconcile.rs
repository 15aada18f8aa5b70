//! Merging fetched media records into the database.
//!
//! Every record is keyed by its AniList id. The media row is upserted, then
//! each child collection (titles, synonyms, genre links) is deleted and
//! re-inserted so it always mirrors the latest fetch. Steps run one after the
//! other; a failed step is logged and counted and the next step still runs.

use anisync_anilist::MediaItem;
use anisync_db::{MediaFields, OperationError, Upserted, operations};
use rusqlite::Connection;

use crate::progress::SyncProgress;

/// Options controlling the reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Wrap each record's steps in one transaction, rolling the record back
    /// when any step fails. Off by default: partial writes are kept.
    pub transactional: bool,
}

/// Statistics from a reconciliation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileStats {
    pub records: u64,
    pub media_created: u64,
    pub media_updated: u64,
    pub titles_written: u64,
    pub synonyms_written: u64,
    pub genre_links_written: u64,
    pub genres_created: u64,
    pub errors: u64,
    pub records_rolled_back: u64,
}

impl ReconcileStats {
    fn absorb(&mut self, other: &ReconcileStats) {
        self.records += other.records;
        self.media_created += other.media_created;
        self.media_updated += other.media_updated;
        self.titles_written += other.titles_written;
        self.synonyms_written += other.synonyms_written;
        self.genre_links_written += other.genre_links_written;
        self.genres_created += other.genres_created;
        self.errors += other.errors;
        self.records_rolled_back += other.records_rolled_back;
    }
}

/// Reconcile every record, one at a time.
pub fn reconcile_all(
    conn: &Connection,
    records: &[MediaItem],
    options: &ReconcileOptions,
    progress: &dyn SyncProgress,
) -> ReconcileStats {
    let mut stats = ReconcileStats::default();
    let total = records.len();

    for (i, item) in records.iter().enumerate() {
        if options.transactional {
            reconcile_in_transaction(conn, item, &mut stats);
        } else {
            reconcile_record(conn, item, &mut stats);
        }
        progress.on_record(i + 1, total, item.title.display_title());
    }

    stats
}

fn reconcile_in_transaction(conn: &Connection, item: &MediaItem, stats: &mut ReconcileStats) {
    if let Err(e) = conn.execute_batch("BEGIN IMMEDIATE") {
        log::warn!("Could not begin transaction for media {}: {}", item.id, e);
        stats.records += 1;
        stats.errors += 1;
        return;
    }

    let mut record = ReconcileStats::default();
    reconcile_record(conn, item, &mut record);

    if record.errors == 0 {
        match conn.execute_batch("COMMIT") {
            Ok(()) => {
                stats.absorb(&record);
                return;
            }
            Err(e) => {
                log::warn!("Could not commit media {}: {}", item.id, e);
                record.errors += 1;
            }
        }
    }

    let _ = conn.execute_batch("ROLLBACK");
    stats.records += 1;
    stats.errors += record.errors;
    stats.records_rolled_back += 1;
}

/// Reconcile one record: upsert the media row, then replace its titles,
/// synonyms and genre links.
///
/// Returns the media primary key, or `None` when the media row could not be
/// written (the child steps are skipped in that case).
pub fn reconcile_record(
    conn: &Connection,
    item: &MediaItem,
    stats: &mut ReconcileStats,
) -> Option<i64> {
    stats.records += 1;

    let pk = match upsert(conn, item) {
        Ok(Upserted::Created(pk)) => {
            log::debug!("Inserted {} ({})", item.title.display_title(), item.id);
            stats.media_created += 1;
            pk
        }
        Ok(Upserted::Updated(pk)) => {
            log::debug!("Updated {} ({})", item.title.display_title(), item.id);
            stats.media_updated += 1;
            pk
        }
        Err(e) => {
            log::warn!("Could not upsert media {}: {}", item.id, e);
            stats.errors += 1;
            return None;
        }
    };

    match replace_titles(conn, pk, item) {
        Ok(n) => stats.titles_written += n,
        Err(e) => {
            log::warn!("Could not replace titles for media {}: {}", item.id, e);
            stats.errors += 1;
        }
    }

    match replace_synonyms(conn, pk, item) {
        Ok(n) => stats.synonyms_written += n,
        Err(e) => {
            log::warn!("Could not replace synonyms for media {}: {}", item.id, e);
            stats.errors += 1;
        }
    }

    match replace_genres(conn, pk, item, stats) {
        Ok(n) => stats.genre_links_written += n,
        Err(e) => {
            log::warn!("Could not replace genres for media {}: {}", item.id, e);
            stats.errors += 1;
        }
    }

    Some(pk)
}

fn upsert(conn: &Connection, item: &MediaItem) -> Result<Upserted, OperationError> {
    let start_date = item
        .start_date
        .normalized()
        .map(|d| d.format("%Y-%m-%d").to_string());
    if start_date.is_none() {
        log::debug!(
            "No usable start date for media {} ({:?})",
            item.id,
            item.start_date
        );
    }

    operations::upsert_media(
        conn,
        &MediaFields {
            guid: item.id,
            title: item.title.display_title(),
            start_date: start_date.as_deref(),
        },
    )
}

fn replace_titles(conn: &Connection, pk: i64, item: &MediaItem) -> Result<u64, OperationError> {
    operations::delete_titles(conn, pk)?;

    let mut written = 0;
    for title in item.title.variants() {
        operations::insert_title(conn, pk, title)?;
        written += 1;
    }
    Ok(written)
}

fn replace_synonyms(conn: &Connection, pk: i64, item: &MediaItem) -> Result<u64, OperationError> {
    operations::delete_synonyms(conn, pk)?;

    let mut written = 0;
    for synonym in non_blank(&item.synonyms) {
        operations::insert_synonym(conn, pk, synonym)?;
        written += 1;
    }
    Ok(written)
}

fn replace_genres(
    conn: &Connection,
    pk: i64,
    item: &MediaItem,
    stats: &mut ReconcileStats,
) -> Result<u64, OperationError> {
    operations::delete_genre_links(conn, pk)?;

    let mut written = 0;
    for genre in non_blank(&item.genres) {
        let (genre_id, created) = operations::find_or_create_genre(conn, genre)?;
        if created {
            log::debug!("Inserted genre {}", genre);
            stats.genres_created += 1;
        }
        if operations::link_genre(conn, pk, genre_id)? {
            written += 1;
        }
    }
    Ok(written)
}

fn non_blank(values: &[String]) -> impl Iterator<Item = &str> {
    values.iter().map(|v| v.trim()).filter(|v| !v.is_empty())
}
