//! gitlab-reporter database layer.
//!
//! Provides SQLite connection management, schema migrations and the
//! key/value store holding the profile, selection and rules documents.
//!
//! # Usage
//!
//! ```no_run
//! use gitlab_reporter::database::{Database, KeyValueStore, SqliteStore};
//!
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! let store = SqliteStore::new(db.connection());
//! store.set("rules", "example.com staging").expect("write failed");
//! ```

pub mod connection;
pub mod kv_store;
pub mod migrations;

pub use connection::Database;
pub use kv_store::{KeyValueStore, SqliteStore};
