//! Write operations for media rows and their child tables.

use rusqlite::{params, Connection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
}

/// Column values written to a `media` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaFields<'a> {
    pub guid: i64,
    pub title: &'a str,
    /// `YYYY-MM-DD`, or `None` when the start date is unknown.
    pub start_date: Option<&'a str>,
}

/// Outcome of [`upsert_media`], carrying the row's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created(i64),
    Updated(i64),
}

impl Upserted {
    pub fn id(self) -> i64 {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

// ── Media Operations ────────────────────────────────────────────────────────

/// Find the primary key of the media row for an external id.
pub fn find_media_id(conn: &Connection, guid: i64) -> Result<Option<i64>, OperationError> {
    let mut stmt = conn.prepare_cached("SELECT pk_media_id FROM media WHERE guid = ?1")?;
    let result = stmt.query_row(params![guid], |row| row.get::<_, i64>(0));
    match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert a new media row. Returns the generated primary key.
pub fn insert_media(conn: &Connection, media: &MediaFields<'_>) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO media (guid, title, start_date, created, modified)
         VALUES (?1, ?2, ?3, datetime('now'), datetime('now'))",
        params![media.guid, media.title, media.start_date],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update title, start date and modification time of an existing media row.
/// The primary key, guid and creation time are left alone.
pub fn update_media(
    conn: &Connection,
    pk_media_id: i64,
    media: &MediaFields<'_>,
) -> Result<(), OperationError> {
    let changed = conn.execute(
        "UPDATE media SET title = ?2, start_date = ?3, modified = datetime('now')
         WHERE pk_media_id = ?1",
        params![pk_media_id, media.title, media.start_date],
    )?;
    if changed == 0 {
        return Err(OperationError::NotFound {
            entity_type: "media".to_string(),
            id: pk_media_id.to_string(),
        });
    }
    Ok(())
}

/// Insert the media row for `media.guid`, or update it if one already exists.
pub fn upsert_media(conn: &Connection, media: &MediaFields<'_>) -> Result<Upserted, OperationError> {
    match find_media_id(conn, media.guid)? {
        Some(id) => {
            update_media(conn, id, media)?;
            Ok(Upserted::Updated(id))
        }
        None => insert_media(conn, media).map(Upserted::Created),
    }
}

// ── Title / Synonym Operations ──────────────────────────────────────────────

/// Remove every title row for a media item. Returns the number removed.
pub fn delete_titles(conn: &Connection, pk_media_id: i64) -> Result<usize, OperationError> {
    Ok(conn.execute(
        "DELETE FROM media_titles WHERE fk_media_id = ?1",
        params![pk_media_id],
    )?)
}

pub fn insert_title(conn: &Connection, pk_media_id: i64, title: &str) -> Result<(), OperationError> {
    conn.prepare_cached("INSERT INTO media_titles (fk_media_id, title) VALUES (?1, ?2)")?
        .execute(params![pk_media_id, title])?;
    Ok(())
}

/// Remove every synonym row for a media item. Returns the number removed.
pub fn delete_synonyms(conn: &Connection, pk_media_id: i64) -> Result<usize, OperationError> {
    Ok(conn.execute(
        "DELETE FROM media_synonyms WHERE fk_media_id = ?1",
        params![pk_media_id],
    )?)
}

pub fn insert_synonym(
    conn: &Connection,
    pk_media_id: i64,
    synonym: &str,
) -> Result<(), OperationError> {
    conn.prepare_cached("INSERT INTO media_synonyms (fk_media_id, synonym) VALUES (?1, ?2)")?
        .execute(params![pk_media_id, synonym])?;
    Ok(())
}

// ── Genre Operations ────────────────────────────────────────────────────────

/// Find a genre by exact (case-sensitive) name.
pub fn find_genre_id(conn: &Connection, genre: &str) -> Result<Option<i64>, OperationError> {
    let mut stmt = conn.prepare_cached("SELECT pk_genre_id FROM genres WHERE genre = ?1")?;
    let result = stmt.query_row(params![genre], |row| row.get::<_, i64>(0));
    match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert a new genre. Returns the generated ID.
pub fn insert_genre(conn: &Connection, genre: &str) -> Result<i64, OperationError> {
    conn.execute("INSERT INTO genres (genre) VALUES (?1)", params![genre])?;
    Ok(conn.last_insert_rowid())
}

/// Look up a genre by name, creating it on first use.
///
/// Returns the genre id and whether it was created by this call.
pub fn find_or_create_genre(conn: &Connection, genre: &str) -> Result<(i64, bool), OperationError> {
    match find_genre_id(conn, genre)? {
        Some(id) => Ok((id, false)),
        None => insert_genre(conn, genre).map(|id| (id, true)),
    }
}

/// Remove every genre link for a media item. Shared genre rows are kept.
pub fn delete_genre_links(conn: &Connection, pk_media_id: i64) -> Result<usize, OperationError> {
    Ok(conn.execute(
        "DELETE FROM media_genres WHERE fk_media_id = ?1",
        params![pk_media_id],
    )?)
}

/// Link a media item to a genre. Returns false if the link already existed.
pub fn link_genre(
    conn: &Connection,
    pk_media_id: i64,
    pk_genre_id: i64,
) -> Result<bool, OperationError> {
    let inserted = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO media_genres (fk_media_id, fk_genre_id) VALUES (?1, ?2)",
        )?
        .execute(params![pk_media_id, pk_genre_id])?;
    Ok(inserted > 0)
}
