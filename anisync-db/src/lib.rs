//! SQLite persistence layer for synced AniList media.
//!
//! Provides schema creation, write operations for media rows and their
//! title/synonym/genre child tables, and read queries, backed by SQLite
//! (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    MediaFields, OperationError, Upserted, delete_genre_links, delete_synonyms, delete_titles,
    find_genre_id, find_media_id, find_or_create_genre, insert_genre, insert_media,
    insert_synonym, insert_title, link_genre, update_media, upsert_media,
};
pub use queries::{
    CatalogStats, MediaRow, catalog_stats, genres_for_media, media_by_guid, synonyms_for_media,
    titles_for_media,
};
pub use rusqlite::Connection;
pub use schema::{SchemaError, open_database, open_memory, ping};
