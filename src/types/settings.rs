use serde::{Deserialize, Serialize};

/// Top-level settings for the native host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReporterSettings {
    pub storage: StorageSettings,
    pub network: NetworkSettings,
    pub logging: LoggingSettings,
}

/// Where the persisted store lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// File name of the SQLite database inside the data directory.
    pub database_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: "gitlab-reporter.db".to_string(),
        }
    }
}

/// HTTP client settings for GitLab and version endpoint calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("gitlab-reporter/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Log filter used when `RUST_LOG` is not set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
