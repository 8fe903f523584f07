//! Snapshot round trips and the load-or-create lifecycle.
#![cfg(feature = "builder")]

use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use toponym_core::{DataPaths, Database, GeoError, SharedDatabase};

const GEONAMES: &str = include_str!("fixtures/allCountries.txt");
const ALTERNATE_NAMES: &str = include_str!("fixtures/alternateNames.txt");

fn data_dir() -> (TempDir, DataPaths) {
    let dir = tempfile::tempdir().expect("temp dir");
    let paths = DataPaths::in_dir(dir.path());
    fs::write(&paths.geonames, GEONAMES).unwrap();
    fs::write(&paths.alternate_names, ALTERNATE_NAMES).unwrap();
    (dir, paths)
}

#[test]
fn snapshot_round_trip_preserves_queries() {
    let (dir, paths) = data_dir();
    let db = Database::build_from_files(&paths).unwrap();

    let snapshot = dir.path().join("nested").join("snapshot.bin");
    db.save(&snapshot).unwrap();
    let loaded = Database::load(&snapshot).unwrap();

    assert_eq!(loaded, db);
    let en = db.language_id("en");
    assert_eq!(
        loaded.search("Frank", en, 10).unwrap(),
        db.search("Frank", en, 10).unwrap()
    );
    assert_eq!(
        loaded.proximity(50.1, 8.6, 5, 50.0).unwrap(),
        db.proximity(50.1, 8.6, 5, 50.0).unwrap()
    );
}

#[test]
fn load_or_create_builds_then_reuses_snapshot() {
    let (_dir, paths) = data_dir();
    assert!(!paths.database.exists());

    let built = Database::load_or_create(&paths).unwrap();
    assert!(paths.database.exists());
    assert_eq!(built.len(), 13);

    let reused = Database::load_or_create(&paths).unwrap();
    assert_eq!(reused, built);
}

#[test]
fn unreadable_snapshot_is_rebuilt() {
    let (_dir, paths) = data_dir();
    fs::write(&paths.database, b"not a snapshot").unwrap();

    let db = Database::load_or_create(&paths).unwrap();
    assert_eq!(db.len(), 13);
    assert!(Database::load(&paths.database).is_ok());
}

#[test]
fn malformed_source_aborts_build() {
    let (_dir, paths) = data_dir();
    let broken = GEONAMES.replacen("52.52437", "not-a-number", 1);
    fs::write(&paths.geonames, broken).unwrap();

    let err = Database::build_from_files(&paths).unwrap_err();
    match err {
        GeoError::MalformedLine { file, line, .. } => {
            assert_eq!(file, "allCountries.txt");
            assert_eq!(line, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_sources_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::in_dir(dir.path());
    let err = Database::load_or_create(&paths).unwrap_err();
    assert!(matches!(err, GeoError::NotFound(_)));
    assert!(matches!(Database::load(&paths.database), Err(GeoError::NotFound(_))));
}

#[test]
fn shared_database_serves_readers_during_swap() {
    let (_dir, paths) = data_dir();
    let shared = SharedDatabase::new(Database::build_from_files(&paths).unwrap());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let db: Arc<Database> = shared.current();
                    let hits = db.search("Berlin", db.language_id("en"), 5).unwrap();
                    assert!(!hits.is_empty());
                }
            })
        })
        .collect();

    let previous = shared.replace(Database::build_from_files(&paths).unwrap());
    assert_eq!(previous.len(), 13);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(shared.current().len(), 13);
}
