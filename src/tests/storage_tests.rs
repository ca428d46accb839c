use crate::cleaning::{flatten_details, FieldMap};
use crate::errors::StorageError;
use crate::storage::{load_flat, load_raw, persist_flat, persist_raw, FileStore, ObjectStore};
use crate::tests::utils::{discovered_state, sample_detail};
use serde_json::json;

#[test]
fn raw_session_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let mut state = discovered_state(&[1, 2]);
    state.detail_cookie = Some("ASP.NET_SessionId=abc".into());
    state.details = vec![sample_detail(1), json!({ "ListingID": 2 })];
    state.discovered_at = Some(chrono::Utc::now());

    persist_raw(&store, &state, "raw.json").unwrap();
    assert_eq!(load_raw(&store, "raw.json").unwrap(), state);
}

#[test]
fn flat_table_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let table = flatten_details(&[sample_detail(1), json!({})], &FieldMap::default());

    persist_flat(&store, &table, "clean.json").unwrap();
    let loaded = load_flat(&store, "clean.json").unwrap();

    assert_eq!(loaded, table);
    assert_eq!(loaded.columns, table.columns);
}

#[test]
fn coordinates_survive_a_round_trip_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let mut state = discovered_state(&[7]);
    state.details = vec![json!({
        "ListingID": 7,
        "Latitude": -14.858354483486679,
        "Longitude": 43.712162516958244
    })];

    persist_raw(&store, &state, "raw.json").unwrap();
    let loaded = load_raw(&store, "raw.json").unwrap();
    assert_eq!(loaded, state);
    assert_eq!(loaded.details[0]["Longitude"].as_f64(), Some(43.712162516958244));

    let table = flatten_details(&loaded.details, &FieldMap::default());
    persist_flat(&store, &table, "clean.json").unwrap();
    let flat = load_flat(&store, "clean.json").unwrap();
    assert_eq!(flat, table);
    assert_eq!(flat.cell(0, "Latitude"), Some(&json!(-14.858354483486679)));
}

#[test]
fn put_creates_missing_directories_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    store.put("a/b/c.bin", b"first").unwrap();
    store.put("a/b/c.bin", b"second").unwrap();

    assert_eq!(store.get("a/b/c.bin").unwrap(), b"second".to_vec());
}

#[test]
fn missing_source_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let err = load_raw(&store, "missing.json").unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[test]
fn corrupt_payload_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store.put("raw.json", b"{ \"locality\": ").unwrap();

    let err = load_raw(&store, "raw.json").unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { .. }));

    // valid JSON, wrong shape
    store.put("clean.json", b"[1, 2, 3]").unwrap();
    let err = load_flat(&store, "clean.json").unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { .. }));
}
