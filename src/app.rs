//! App Core for gitlab-reporter.
//!
//! Holds the database and the settings engine shared by RPC handlers.
//! Managers are created on demand because they borrow the store.

use std::path::PathBuf;

use log::info;

use crate::database::connection::Database;
use crate::database::kv_store::SqliteStore;
use crate::platform;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

pub struct App {
    pub db: Database,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Opens the database at `db_path` and loads settings from the default location.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::open(db_path, None)
    }

    /// Opens the database at `db_path`, loading settings from `settings_path`
    /// when given. A malformed settings file is an error; a missing one is not.
    pub fn open(
        db_path: &str,
        settings_path: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        settings_engine.load()?;

        let db = Database::open(db_path)?;
        info!("Opened store at {}", db_path);

        Ok(Self { db, settings_engine })
    }

    /// Returns the store view over the database.
    ///
    /// ```no_run
    /// use gitlab_reporter::app::App;
    /// use gitlab_reporter::managers::profile_manager::{ProfileManager, ProfileManagerTrait};
    ///
    /// let app = App::new("gitlab-reporter.db").unwrap();
    /// let store = app.store();
    /// let profiles = ProfileManager::new(&store).list_profiles().unwrap();
    /// ```
    pub fn store(&self) -> SqliteStore<'_> {
        SqliteStore::new(self.db.connection())
    }
}

/// Database location: the data directory joined with the configured file name.
pub fn default_database_path(database_file: &str) -> PathBuf {
    platform::get_data_dir().join(database_file)
}
