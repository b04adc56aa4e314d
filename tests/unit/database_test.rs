//! Unit tests for the gitlab-reporter database layer (connection, migrations, store).

use gitlab_reporter::database::kv_store::{PROFILES_KEY, RULES_KEY};
use gitlab_reporter::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use gitlab_reporter::database::{Database, KeyValueStore, SqliteStore};
use tempfile::TempDir;

#[test]
fn test_open_in_memory_succeeds() {
    assert!(Database::open_in_memory().is_ok());
}

#[test]
fn test_migrations_create_kv_table() {
    let db = Database::open_in_memory().unwrap();
    let exists: bool = db
        .connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='kv_store'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(exists, "kv_store should exist after migrations");
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_values_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("store.db");

    {
        let db = Database::open(&path).unwrap();
        let store = SqliteStore::new(db.connection());
        store.set(RULES_KEY, "example.com staging").unwrap();
    }

    let db = Database::open(&path).unwrap();
    let store = SqliteStore::new(db.connection());
    assert_eq!(
        store.get(RULES_KEY).unwrap(),
        Some("example.com staging".to_string())
    );
    assert_eq!(store.get(PROFILES_KEY).unwrap(), None);
}

#[test]
fn test_reopen_does_not_rerun_migrations() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("store.db");
    drop(Database::open(&path).unwrap());

    let db = Database::open(&path).unwrap();
    let rows: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, CURRENT_SCHEMA_VERSION as i64);
}
