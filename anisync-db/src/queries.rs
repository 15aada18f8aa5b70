//! Read queries for the media database.

use rusqlite::{params, Connection, Row};

use crate::operations::OperationError;

/// A stored `media` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRow {
    pub pk_media_id: i64,
    pub guid: i64,
    pub title: String,
    pub start_date: Option<String>,
    pub created: String,
    pub modified: String,
}

/// Find the media row for an external id.
pub fn media_by_guid(conn: &Connection, guid: i64) -> Result<Option<MediaRow>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT pk_media_id, guid, title, start_date, created, modified
         FROM media WHERE guid = ?1",
    )?;
    match stmt.query_row(params![guid], row_to_media) {
        Ok(m) => Ok(Some(m)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn row_to_media(row: &Row<'_>) -> rusqlite::Result<MediaRow> {
    Ok(MediaRow {
        pk_media_id: row.get(0)?,
        guid: row.get(1)?,
        title: row.get(2)?,
        start_date: row.get(3)?,
        created: row.get(4)?,
        modified: row.get(5)?,
    })
}

/// Titles of a media item, in insertion order.
pub fn titles_for_media(conn: &Connection, pk_media_id: i64) -> Result<Vec<String>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT title FROM media_titles WHERE fk_media_id = ?1 ORDER BY rowid")?;
    let rows = stmt.query_map(params![pk_media_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Synonyms of a media item, in insertion order.
pub fn synonyms_for_media(
    conn: &Connection,
    pk_media_id: i64,
) -> Result<Vec<String>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT synonym FROM media_synonyms WHERE fk_media_id = ?1 ORDER BY rowid")?;
    let rows = stmt.query_map(params![pk_media_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Genre names linked to a media item, sorted by name.
pub fn genres_for_media(conn: &Connection, pk_media_id: i64) -> Result<Vec<String>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT g.genre FROM media_genres mg
         JOIN genres g ON g.pk_genre_id = mg.fk_genre_id
         WHERE mg.fk_media_id = ?1
         ORDER BY g.genre",
    )?;
    let rows = stmt.query_map(params![pk_media_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Row counts across the media tables.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub media: i64,
    pub titles: i64,
    pub synonyms: i64,
    pub genres: i64,
    pub genre_links: i64,
}

pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let count = |table: &str| -> Result<i64, OperationError> {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?)
    };

    Ok(CatalogStats {
        media: count("media")?,
        titles: count("media_titles")?,
        synonyms: count("media_synonyms")?,
        genres: count("genres")?,
        genre_links: count("media_genres")?,
    })
}
