use anisync_db::*;

fn fields(guid: i64, title: &str) -> MediaFields<'_> {
    MediaFields {
        guid,
        title,
        start_date: Some("2023-10-01"),
    }
}

#[test]
fn upsert_media_creates_then_updates() {
    let conn = open_memory().unwrap();

    let first = upsert_media(&conn, &fields(101, "Frieren")).unwrap();
    assert!(matches!(first, Upserted::Created(_)));

    let second = upsert_media(
        &conn,
        &MediaFields {
            guid: 101,
            title: "Frieren: Beyond Journey's End",
            start_date: None,
        },
    )
    .unwrap();
    assert_eq!(second, Upserted::Updated(first.id()));

    let row = media_by_guid(&conn, 101).unwrap().unwrap();
    assert_eq!(row.pk_media_id, first.id());
    assert_eq!(row.title, "Frieren: Beyond Journey's End");
    assert_eq!(row.start_date, None);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn update_keeps_created_timestamp() {
    let conn = open_memory().unwrap();
    let id = insert_media(&conn, &fields(5, "Old")).unwrap();
    conn.execute(
        "UPDATE media SET created = '2001-01-01 00:00:00', modified = '2001-01-01 00:00:00'",
        [],
    )
    .unwrap();

    update_media(&conn, id, &fields(5, "New")).unwrap();

    let row = media_by_guid(&conn, 5).unwrap().unwrap();
    assert_eq!(row.created, "2001-01-01 00:00:00");
    assert_ne!(row.modified, "2001-01-01 00:00:00");
}

#[test]
fn update_missing_media_is_not_found() {
    let conn = open_memory().unwrap();
    let err = update_media(&conn, 999, &fields(1, "x")).unwrap_err();
    assert!(matches!(err, OperationError::NotFound { .. }));
}

#[test]
fn find_media_id_distinguishes_absent() {
    let conn = open_memory().unwrap();
    assert_eq!(find_media_id(&conn, 42).unwrap(), None);
    let id = insert_media(&conn, &fields(42, "x")).unwrap();
    assert_eq!(find_media_id(&conn, 42).unwrap(), Some(id));
}

#[test]
fn duplicate_guid_insert_is_rejected() {
    let conn = open_memory().unwrap();
    insert_media(&conn, &fields(7, "a")).unwrap();
    assert!(insert_media(&conn, &fields(7, "b")).is_err());
}

#[test]
fn genre_lookup_is_case_sensitive() {
    let conn = open_memory().unwrap();
    let (action, created) = find_or_create_genre(&conn, "Action").unwrap();
    assert!(created);

    let (again, created) = find_or_create_genre(&conn, "Action").unwrap();
    assert_eq!(again, action);
    assert!(!created);

    let (lower, created) = find_or_create_genre(&conn, "action").unwrap();
    assert!(created);
    assert_ne!(lower, action);
}

#[test]
fn link_genre_ignores_duplicates() {
    let conn = open_memory().unwrap();
    let media = insert_media(&conn, &fields(1, "x")).unwrap();
    let genre = insert_genre(&conn, "Drama").unwrap();

    assert!(link_genre(&conn, media, genre).unwrap());
    assert!(!link_genre(&conn, media, genre).unwrap());
    assert_eq!(genres_for_media(&conn, media).unwrap(), vec!["Drama"]);
}

#[test]
fn child_rows_require_existing_media() {
    let conn = open_memory().unwrap();
    assert!(insert_title(&conn, 12345, "orphan").is_err());
    assert!(insert_synonym(&conn, 12345, "orphan").is_err());
}

#[test]
fn deleting_children_only_touches_one_media() {
    let conn = open_memory().unwrap();
    let a = insert_media(&conn, &fields(1, "a")).unwrap();
    let b = insert_media(&conn, &fields(2, "b")).unwrap();
    insert_title(&conn, a, "A").unwrap();
    insert_title(&conn, b, "B").unwrap();
    insert_synonym(&conn, a, "A syn").unwrap();
    let genre = insert_genre(&conn, "Comedy").unwrap();
    link_genre(&conn, a, genre).unwrap();
    link_genre(&conn, b, genre).unwrap();

    assert_eq!(delete_titles(&conn, a).unwrap(), 1);
    assert_eq!(delete_synonyms(&conn, a).unwrap(), 1);
    assert_eq!(delete_genre_links(&conn, a).unwrap(), 1);

    assert!(titles_for_media(&conn, a).unwrap().is_empty());
    assert_eq!(titles_for_media(&conn, b).unwrap(), vec!["B"]);
    assert_eq!(genres_for_media(&conn, b).unwrap(), vec!["Comedy"]);
    // The shared genre row survives unlinking
    assert_eq!(find_genre_id(&conn, "Comedy").unwrap(), Some(genre));
}

#[test]
fn deleting_media_cascades_to_children() {
    let conn = open_memory().unwrap();
    let id = insert_media(&conn, &fields(3, "x")).unwrap();
    insert_title(&conn, id, "X").unwrap();
    insert_synonym(&conn, id, "Ex").unwrap();
    let genre = insert_genre(&conn, "Sports").unwrap();
    link_genre(&conn, id, genre).unwrap();

    conn.execute("DELETE FROM media WHERE pk_media_id = ?1", [id])
        .unwrap();

    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(stats.media, 0);
    assert_eq!(stats.titles, 0);
    assert_eq!(stats.synonyms, 0);
    assert_eq!(stats.genre_links, 0);
    assert_eq!(stats.genres, 1);
}
