//! SQLite schema creation and version checks.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database schema is newer than this build: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Create all tables and indexes if they don't exist.
///
/// Idempotent; safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Open or create a media database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        create_schema(&conn)?;
    } else if version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Liveness check: run a trivial query against the connection.
pub fn ping(conn: &Connection) -> Result<(), SchemaError> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))?;
    Ok(())
}

/// Get the current schema version, or 0 if no schema exists.
fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- One row per AniList media id
CREATE TABLE IF NOT EXISTS media (
    pk_media_id INTEGER PRIMARY KEY AUTOINCREMENT,
    guid INTEGER NOT NULL UNIQUE,
    title TEXT NOT NULL,
    start_date TEXT,
    created TEXT NOT NULL,
    modified TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS media_titles (
    fk_media_id INTEGER NOT NULL REFERENCES media(pk_media_id) ON DELETE CASCADE,
    title TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_media_titles_media ON media_titles(fk_media_id);

CREATE TABLE IF NOT EXISTS media_synonyms (
    fk_media_id INTEGER NOT NULL REFERENCES media(pk_media_id) ON DELETE CASCADE,
    synonym TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_media_synonyms_media ON media_synonyms(fk_media_id);

-- Shared genre names; comparison uses the default BINARY collation (case-sensitive)
CREATE TABLE IF NOT EXISTS genres (
    pk_genre_id INTEGER PRIMARY KEY AUTOINCREMENT,
    genre TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS media_genres (
    fk_media_id INTEGER NOT NULL REFERENCES media(pk_media_id) ON DELETE CASCADE,
    fk_genre_id INTEGER NOT NULL REFERENCES genres(pk_genre_id),
    PRIMARY KEY (fk_media_id, fk_genre_id)
);
CREATE INDEX IF NOT EXISTS idx_media_genres_genre ON media_genres(fk_genre_id);
"#;
