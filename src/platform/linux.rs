// Linux roots follow the XDG base directory spec.

use std::env;
use std::path::PathBuf;

fn home() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

fn xdg_or(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => fallback,
    }
}

/// `$XDG_CONFIG_HOME` or `~/.config`.
pub fn config_root() -> PathBuf {
    xdg_or("XDG_CONFIG_HOME", home().join(".config"))
}

/// `$XDG_DATA_HOME` or `~/.local/share`.
pub fn data_root() -> PathBuf {
    xdg_or("XDG_DATA_HOME", home().join(".local").join("share"))
}
