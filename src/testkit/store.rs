//! Temporary stores for tests.

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use crate::adapter::json::JsonSerializer;
use crate::store::facade::StoreFacade;
use crate::store::handle::StoreHandle;
use crate::store::registry::{open_store, StoreRegistry};
use crate::store::settings::StoreSettings;

/// A registry rooted in a temporary directory removed on drop.
pub struct TempRegistry {
    registry: StoreRegistry,
    root: TempDir,
}

impl TempRegistry {
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let registry = StoreRegistry::new(StoreSettings::new(root.path()));
        Self { registry, root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }
}

impl Default for TempRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TempRegistry {
    type Target = StoreRegistry;

    fn deref(&self) -> &StoreRegistry {
        &self.registry
    }
}

/// A facade over a private in-memory database.
///
/// # Panics
/// Panics if the database cannot be created.
#[must_use]
pub fn memory_store(name: &str) -> StoreFacade {
    let handle = StoreHandle::in_memory(name).expect("open in-memory store");
    open_store(handle, Arc::new(JsonSerializer::new()))
}
