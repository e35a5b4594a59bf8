// tests/store_test.rs — Integration test: SQLite round-trip (store + persistence trait)

use pretty_assertions::assert_eq;
use rusqlite::Connection;

use tripmate::core::itinerary::{ItineraryMetadata, ItinerarySummary, Pace};
use tripmate::core::types::{ChatTurn, Role};
use tripmate::memory::schema;
use tripmate::memory::store::Store;
use tripmate::memory::{open_store, spawn_store_server, PersistenceStore};

/// Create an in-memory SQLite store with schema applied.
fn test_store() -> Store {
    let conn = Connection::open_in_memory().unwrap();
    schema::run_migrations(&conn).unwrap();
    Store::new(conn)
}

fn summary(destination: &str) -> ItinerarySummary {
    ItinerarySummary {
        content: format!("Three days in {destination}"),
        metadata: ItineraryMetadata {
            origin: "Lisbon".into(),
            destination: destination.into(),
            start_date: "2026-05-01".into(),
            end_date: "2026-05-04".into(),
            interests: vec!["Food".into()],
            pace: Pace::Normal,
        },
    }
}

#[test]
fn test_duplicate_email_is_refused() {
    let store = test_store();

    assert!(store
        .insert_user("u1", "ana@example.com", "hash", "salt")
        .unwrap());
    assert!(!store
        .insert_user("u2", "ana@example.com", "other", "salt2")
        .unwrap());

    let user = store.find_user_by_email("ana@example.com").unwrap().unwrap();
    assert_eq!(user.uid, "u1");
    assert!(store.find_user_by_email("bob@example.com").unwrap().is_none());
}

#[test]
fn test_recent_messages_are_chronological_and_limited() {
    let store = test_store();
    for i in 1..=10 {
        store
            .insert_message(&format!("m{i}"), "u1", "user", &format!("t{i}"))
            .unwrap();
    }

    let rows = store.recent_messages("u1", 8).unwrap();
    let contents: Vec<String> = rows.into_iter().map(|r| r.content).collect();
    let expected: Vec<String> = (3..=10).map(|i| format!("t{i}")).collect();
    assert_eq!(contents, expected);
}

#[test]
fn test_messages_are_per_user() {
    let store = test_store();
    store.insert_message("a", "u1", "user", "mine").unwrap();
    store.insert_message("b", "u2", "user", "theirs").unwrap();

    let rows = store.recent_messages("u1", 8).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].content, "mine");
    assert!(store.recent_messages("u3", 8).unwrap().is_empty());
}

#[test]
fn test_recent_itineraries_newest_first() {
    let store = test_store();
    for i in 1..=7 {
        store
            .insert_itinerary(&format!("i{i}"), "u1", &format!("plan {i}"), "{}")
            .unwrap();
    }

    let rows = store.recent_itineraries("u1", 5).unwrap();
    let ids: Vec<String> = rows.into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["i7", "i6", "i5", "i4", "i3"]);
}

#[test]
fn test_open_store_creates_file_and_migrates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tripmate.db");

    let store = open_store(&path).unwrap();
    assert!(path.exists());
    drop(store);

    let conn = Connection::open(&path).unwrap();
    assert_eq!(
        schema::current_version(&conn).unwrap(),
        schema::latest_version()
    );
}

#[tokio::test]
async fn test_persistence_trait_round_trip() {
    let (handle, _join) = spawn_store_server(test_store());

    for i in 1..=5 {
        handle
            .append_message("u1", &ChatTurn::user(format!("q{i}")))
            .await
            .unwrap();
        handle
            .append_message("u1", &ChatTurn::assistant(format!("a{i}")))
            .await
            .unwrap();
    }

    let turns = handle.load_recent_messages("u1", 4).await.unwrap();
    assert_eq!(
        turns,
        vec![
            ChatTurn::user("q4"),
            ChatTurn::assistant("a4"),
            ChatTurn::user("q5"),
            ChatTurn::assistant("a5"),
        ]
    );
    assert_eq!(turns[0].role(), Role::User);
}

#[tokio::test]
async fn test_itinerary_metadata_survives_storage() {
    let (handle, _join) = spawn_store_server(test_store());

    handle.append_itinerary("u1", &summary("Porto")).await.unwrap();
    handle.append_itinerary("u1", &summary("Madrid")).await.unwrap();

    let saved = handle.load_recent_itineraries("u1", 5).await.unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].summary, summary("Madrid"));
    assert_eq!(saved[1].summary, summary("Porto"));
    assert!(handle
        .load_recent_itineraries("u2", 5)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_bad_metadata_rows_are_skipped() {
    let store = test_store();
    store
        .insert_itinerary("broken", "u1", "plan", "not json")
        .unwrap();
    let (handle, _join) = spawn_store_server(store);

    handle.append_itinerary("u1", &summary("Porto")).await.unwrap();

    let saved = handle.load_recent_itineraries("u1", 5).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].summary.metadata.destination, "Porto");
}
