// Windows keeps both config and data under the roaming AppData folder.

use std::env;
use std::path::PathBuf;

/// `%APPDATA%`.
pub fn roaming_root() -> PathBuf {
    PathBuf::from(
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming")),
    )
}
