//! Named-store registry.
//!
//! Hands out one [`StoreFacade`] per store name and owns the lifecycle of the
//! engine handles behind them. Opening happens under the registry lock, so
//! concurrent callers asking for the same name get the same facade and the
//! database is opened once.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::facade::StoreFacade;
use super::handle::StoreHandle;
use super::settings::StoreSettings;
use crate::adapter::json::JsonSerializer;
use crate::error::Result;
use crate::port::serializer::Serializer;

/// Cache of open stores keyed by name.
#[derive(Debug)]
pub struct StoreRegistry<S: Serializer = JsonSerializer> {
    settings: StoreSettings,
    serializer: Arc<S>,
    stores: Mutex<HashMap<String, Arc<StoreFacade<S>>>>,
}

impl StoreRegistry<JsonSerializer> {
    /// Registry whose stores decode payloads as JSON.
    #[must_use]
    pub fn new(settings: StoreSettings) -> Self {
        Self::with_serializer(settings, JsonSerializer::new())
    }
}

impl<S: Serializer> StoreRegistry<S> {
    #[must_use]
    pub fn with_serializer(settings: StoreSettings, serializer: S) -> Self {
        Self {
            settings,
            serializer: Arc::new(serializer),
            stores: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// The facade for `name`, opening the store on first use.
    ///
    /// # Errors
    /// Returns [`Error::InvalidStoreName`](crate::error::Error::InvalidStoreName)
    /// for a name that is not a plain directory name, or an error if the
    /// store cannot be opened.
    pub fn get_or_create(&self, name: &str) -> Result<Arc<StoreFacade<S>>> {
        let mut stores = self.stores.lock();
        if let Some(store) = stores.get(name) {
            return Ok(Arc::clone(store));
        }

        let dir = self.settings.store_dir(name)?;
        let handle = StoreHandle::open(name, &dir, &self.settings.connection)?;
        let store = Arc::new(open_store(handle, Arc::clone(&self.serializer)));
        stores.insert(name.to_string(), Arc::clone(&store));
        debug!(
            store = %name,
            format = self.serializer.format(),
            open = stores.len(),
            "Store cached"
        );
        Ok(store)
    }

    /// The facade for `name` if it is already open.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<StoreFacade<S>>> {
        self.stores.lock().get(name).cloned()
    }

    /// Close and evict `name`. Facades handed out earlier fail with
    /// `StoreClosed` from then on. Returns false if the store was not open.
    pub fn close(&self, name: &str) -> bool {
        let removed = self.stores.lock().remove(name);
        match removed {
            Some(store) => {
                store.handle().close();
                true
            }
            None => false,
        }
    }

    /// Close every open store. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let drained: Vec<_> = self.stores.lock().drain().collect();
        for (_, store) in &drained {
            store.handle().close();
        }
        drained.len()
    }

    /// Names of the open stores, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<S: Serializer> Drop for StoreRegistry<S> {
    fn drop(&mut self) {
        for store in self.stores.get_mut().values() {
            store.handle().close();
        }
    }
}

/// Build a facade over an engine handle that is already open.
#[must_use]
pub fn open_store<S: Serializer>(handle: StoreHandle, serializer: Arc<S>) -> StoreFacade<S> {
    StoreFacade::new(handle, serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn registry() -> (TempDir, StoreRegistry) {
        let root = TempDir::new().unwrap();
        let registry = StoreRegistry::new(StoreSettings::new(root.path()));
        (root, registry)
    }

    #[test]
    fn get_or_create_caches_by_name() {
        let (_root, registry) = registry();
        let a = registry.get_or_create("alpha").unwrap();
        let b = registry.get_or_create("alpha").unwrap();
        let c = registry.get_or_create("beta").unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.names(), vec!["alpha", "beta"]);
    }

    #[test]
    fn get_does_not_open() {
        let (root, registry) = registry();
        assert!(registry.get("alpha").is_none());
        assert!(!root.path().join("alpha").exists());

        registry.get_or_create("alpha").unwrap();
        assert!(registry.get("alpha").is_some());
    }

    #[test]
    fn invalid_name_is_rejected() {
        let (_root, registry) = registry();
        let err = registry.get_or_create("../escape").unwrap_err();
        assert!(matches!(err, Error::InvalidStoreName { .. }));
        assert!(registry.names().is_empty());
    }

    #[test]
    fn close_evicts_and_invalidates() {
        let (_root, registry) = registry();
        let store = registry.get_or_create("alpha").unwrap();

        assert!(registry.close("alpha"));
        assert!(!registry.close("alpha"));
        assert!(registry.get("alpha").is_none());
        assert!(matches!(store.change_count(), Err(Error::StoreClosed { .. })));
    }

    #[test]
    fn reopening_after_close_gives_fresh_facade() {
        let (_root, registry) = registry();
        let first = registry.get_or_create("alpha").unwrap();
        registry.close("alpha");

        let second = registry.get_or_create("alpha").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.change_count().unwrap(), 0);
    }

    #[test]
    fn close_all_reports_count() {
        let (_root, registry) = registry();
        registry.get_or_create("a").unwrap();
        registry.get_or_create("b").unwrap();

        assert_eq!(registry.close_all(), 2);
        assert!(registry.names().is_empty());
        assert_eq!(registry.close_all(), 0);
    }

    #[test]
    fn open_store_wraps_existing_handle() {
        let handle = StoreHandle::in_memory("adopted").unwrap();
        let store = open_store(handle, Arc::new(JsonSerializer::new()));
        assert_eq!(store.name(), "adopted");
        assert_eq!(store.change_count().unwrap(), 0);
    }
}
