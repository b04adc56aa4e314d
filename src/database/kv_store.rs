//! Persisted key/value store.
//!
//! Each logical document lives in one row of `kv_store`. There are no
//! transactions across keys; two writers to the same key are last-write-wins.

use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, OptionalExtension};

use crate::types::errors::StoreError;

/// Key of the JSON-serialized profile map.
pub const PROFILES_KEY: &str = "projectsProfile";
/// Key of the selected profile name (`""`, a name, or `"auto"`).
pub const SELECTED_PROFILE_KEY: &str = "selectedProfile";
/// Key of the newline-delimited rules text.
pub const RULES_KEY: &str = "rules";
/// Key of the editor ids recorded for the current rules text.
pub const RULE_IDS_KEY: &str = "ruleIds";

/// Durable get/set over string documents.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Store backed by the `kv_store` table of a SQLite connection.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl<'a> KeyValueStore for SqliteStore<'a> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Self::now()],
        )?;
        Ok(())
    }
}
