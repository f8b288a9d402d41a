//! Open engine handle for one named store.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::info;

use crate::adapter::sqlite::database::connection::{
    create_pool, run_migrations, set_journal_mode, ConnectionOptions, DbConnection, DbPool,
    MEMORY_URL,
};
use crate::error::{Error, Result};

/// File name of the database inside a store's directory.
pub const DATABASE_FILE: &str = "store.db";

/// The pool behind a named store. Closing drops the pool; any later
/// checkout fails with [`Error::StoreClosed`].
#[derive(Debug)]
pub struct StoreHandle {
    name: String,
    location: Option<PathBuf>,
    pool: RwLock<Option<DbPool>>,
}

impl StoreHandle {
    /// Open (creating if needed) the store database inside `dir`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, or the database
    /// cannot be opened or migrated.
    pub fn open(name: &str, dir: &Path, options: &ConnectionOptions) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(DATABASE_FILE);
        let pool = create_pool(&path.to_string_lossy(), options)?;
        set_journal_mode(&pool, options.journal_mode)?;
        run_migrations(&pool)?;

        info!(
            store = %name,
            path = %path.display(),
            journal_mode = %options.journal_mode,
            "Store opened"
        );
        Ok(Self {
            name: name.to_string(),
            location: Some(path),
            pool: RwLock::new(Some(pool)),
        })
    }

    /// Open a private in-memory store. Nothing survives the handle.
    ///
    /// # Errors
    /// Returns an error if the database cannot be created or migrated.
    pub fn in_memory(name: &str) -> Result<Self> {
        let pool = create_pool(MEMORY_URL, &ConnectionOptions::default())?;
        run_migrations(&pool)?;
        Ok(Self::from_pool(name, pool))
    }

    /// Wrap a pool whose database is already migrated.
    #[must_use]
    pub fn from_pool(name: &str, pool: DbPool) -> Self {
        Self {
            name: name.to_string(),
            location: None,
            pool: RwLock::new(Some(pool)),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Database file, or `None` for in-memory and adopted pools.
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Check out a connection.
    ///
    /// # Errors
    /// Returns [`Error::StoreClosed`] after [`close`](Self::close), or a
    /// connection error if the pool is exhausted.
    pub fn connection(&self) -> Result<DbConnection> {
        let pool = self
            .pool
            .read()
            .clone()
            .ok_or_else(|| Error::StoreClosed {
                store: self.name.clone(),
            })?;
        Ok(pool.get()?)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.pool.read().is_some()
    }

    /// Release the pool. Returns false if the handle was already closed.
    pub fn close(&self) -> bool {
        let closed = self.pool.write().take().is_some();
        if closed {
            info!(store = %self.name, "Store closed");
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_directory_and_database() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("alpha");
        let handle = StoreHandle::open("alpha", &dir, &ConnectionOptions::default()).unwrap();

        assert!(dir.join(DATABASE_FILE).exists());
        assert_eq!(handle.location(), Some(dir.join(DATABASE_FILE).as_path()));
        assert!(handle.connection().is_ok());
    }

    #[test]
    fn closed_handle_refuses_connections() {
        let handle = StoreHandle::in_memory("mem").unwrap();
        assert!(handle.is_open());
        assert!(handle.close());
        assert!(!handle.close());

        assert!(matches!(
            handle.connection(),
            Err(Error::StoreClosed { ref store }) if store == "mem"
        ));
    }

    #[test]
    fn reopening_existing_store_keeps_schema() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("beta");
        let first = StoreHandle::open("beta", &dir, &ConnectionOptions::default()).unwrap();
        first.close();

        let second = StoreHandle::open("beta", &dir, &ConnectionOptions::default()).unwrap();
        assert!(second.connection().is_ok());
    }
}
