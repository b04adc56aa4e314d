// macOS keeps both config and data under Application Support.

use std::env;
use std::path::PathBuf;

/// `~/Library/Application Support`.
pub fn app_support_root() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
}
