// gitlab-reporter platform abstraction
// Resolves where the settings file and the SQLite store live on each OS.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Directory name used under the per-user config and data roots.
pub const APP_DIR_NAME: &str = "gitlab-reporter";

/// Environment variable that relocates the data directory (stores, sessions).
pub const DATA_DIR_ENV: &str = "GITLAB_REPORTER_DATA_DIR";

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/gitlab-reporter` or `~/.config/gitlab-reporter`
/// - **macOS**: `~/Library/Application Support/gitlab-reporter`
/// - **Windows**: `%APPDATA%/gitlab-reporter`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::config_root().join(APP_DIR_NAME)
    }
    #[cfg(target_os = "macos")]
    {
        macos::app_support_root().join(APP_DIR_NAME)
    }
    #[cfg(target_os = "windows")]
    {
        windows::roaming_root().join(APP_DIR_NAME)
    }
}

/// Returns the data directory, honouring [`DATA_DIR_ENV`].
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    #[cfg(target_os = "linux")]
    {
        linux::data_root().join(APP_DIR_NAME)
    }
    #[cfg(target_os = "macos")]
    {
        macos::app_support_root().join(APP_DIR_NAME)
    }
    #[cfg(target_os = "windows")]
    {
        windows::roaming_root().join(APP_DIR_NAME)
    }
}
