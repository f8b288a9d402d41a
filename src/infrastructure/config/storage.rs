//! Storage configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::adapter::sqlite::database::connection::{ConnectionOptions, JournalMode};
use crate::error::{ConfigError, Result};
use crate::store::settings::StoreSettings;

/// The `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one subdirectory per store. Falls back to the
    /// caller's default when unset.
    pub root: Option<PathBuf>,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
    pub journal_mode: JournalMode,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let defaults = ConnectionOptions::default();
        Self {
            root: None,
            pool_size: defaults.pool_size,
            busy_timeout_ms: u64::try_from(defaults.busy_timeout.as_millis()).unwrap_or(5000),
            journal_mode: defaults.journal_mode,
        }
    }
}

impl StorageConfig {
    /// Store settings rooted at the configured root, or `default_root`.
    #[must_use]
    pub fn to_settings(&self, default_root: &Path) -> StoreSettings {
        let root = self
            .root
            .clone()
            .unwrap_or_else(|| default_root.to_path_buf());
        StoreSettings::new(root)
            .with_pool_size(self.pool_size)
            .with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
            .with_journal_mode(self.journal_mode)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.pool_size",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.root.as_ref().is_some_and(|r| r.as_os_str().is_empty()) {
            return Err(ConfigError::MissingField {
                field: "storage.root",
            }
            .into());
        }
        Ok(())
    }
}
