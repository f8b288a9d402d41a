//! Where stores live and how their databases are opened.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapter::sqlite::database::connection::{ConnectionOptions, JournalMode};
use crate::error::{Error, Result};

/// Settings shared by every store a registry opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Directory under which each store gets its own subdirectory.
    pub root: PathBuf,
    pub connection: ConnectionOptions,
}

impl StoreSettings {
    /// Settings rooted at `root` with default connection options.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            connection: ConnectionOptions::default(),
        }
    }

    #[must_use]
    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.connection.pool_size = pool_size;
        self
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.connection.busy_timeout = busy_timeout;
        self
    }

    #[must_use]
    pub fn with_journal_mode(mut self, journal_mode: JournalMode) -> Self {
        self.connection.journal_mode = journal_mode;
        self
    }

    /// Directory of the store called `name`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidStoreName`] if `name` could escape the root or
    /// is not a plain directory name.
    pub fn store_dir(&self, name: &str) -> Result<PathBuf> {
        validate_store_name(name)?;
        Ok(self.root.join(name))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Store names map one-to-one onto directory names, so only a conservative
/// character set is accepted.
///
/// # Errors
/// Returns [`Error::InvalidStoreName`] describing the first problem found.
pub fn validate_store_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidStoreName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("name must not start with '.'"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(invalid(&format!("character '{c}' is not allowed")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_dir_is_deterministic() {
        let settings = StoreSettings::new("/data/stores");
        assert_eq!(
            settings.store_dir("tasks").unwrap(),
            PathBuf::from("/data/stores/tasks")
        );
        assert_eq!(
            settings.store_dir("tasks").unwrap(),
            settings.store_dir("tasks").unwrap()
        );
    }

    #[test]
    fn accepts_plain_names() {
        for name in ["tasks", "user_42", "v1.2", "a-b"] {
            assert!(validate_store_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_names_that_escape_root() {
        for name in ["", "..", ".hidden", "a/b", "a\\b", "sp ace"] {
            assert!(
                matches!(validate_store_name(name), Err(Error::InvalidStoreName { .. })),
                "{name}"
            );
        }
    }

    #[test]
    fn builder_overrides_connection_options() {
        let settings = StoreSettings::new("/tmp/x")
            .with_pool_size(2)
            .with_busy_timeout(Duration::from_millis(250))
            .with_journal_mode(JournalMode::Delete);
        assert_eq!(settings.connection.pool_size, 2);
        assert_eq!(settings.connection.busy_timeout, Duration::from_millis(250));
        assert_eq!(settings.connection.journal_mode, JournalMode::Delete);
    }
}
