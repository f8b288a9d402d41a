//! Path utilities for edgestore.
//!
//! All data lives under `~/.edgestore/` unless `EDGESTORE_HOME` says
//! otherwise:
//! - `config.toml` - configuration
//! - `stores/<name>/store.db` - one database per named store

use std::path::PathBuf;

/// Environment variable overriding the home directory.
pub const HOME_ENV: &str = "EDGESTORE_HOME";

/// Returns the edgestore home directory.
pub fn home_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".edgestore")
}

/// Returns the default config file path.
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default directory that holds the stores.
pub fn default_root() -> PathBuf {
    home_dir().join("stores")
}
