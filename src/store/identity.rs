//! Memoized identity metadata per record type.
//!
//! The first time a record type passes through a facade its binding (Rust
//! type name and identifier field) is computed and cached; later calls read
//! the cached entry. Entries are inserted through `DashMap::entry`, so two
//! threads racing on the same type see one fully built binding.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::entity::{EntityDescriptor, Record};
use crate::error::{Error, Result};

/// Identity metadata resolved once per record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    pub type_name: &'static str,
    pub id_field: &'static str,
}

/// Thread-safe memo of [`TypeBinding`]s, plus the guard that keeps one
/// collection from being written by two record types.
#[derive(Debug, Default)]
pub struct IdentityTable {
    bindings: DashMap<TypeId, Arc<TypeBinding>>,
    collections: DashMap<String, TypeId>,
}

impl IdentityTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding for `T`, bound to the descriptor's collection.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescriptor`] if the collection name is blank or
    /// the collection is already bound to a different record type.
    pub fn resolve<T: Record>(&self, entity: &EntityDescriptor<T>) -> Result<Arc<TypeBinding>> {
        let name = entity.name();
        if name.trim().is_empty() {
            return Err(Error::InvalidDescriptor {
                name: name.to_string(),
                reason: "collection name is blank".into(),
            });
        }

        let handle = entity.type_handle();
        let bound = *self
            .collections
            .entry(name.to_string())
            .or_insert(handle.id())
            .value();
        if bound != handle.id() {
            let other = self
                .bindings
                .get(&bound)
                .map_or("another type", |b| b.type_name);
            return Err(Error::InvalidDescriptor {
                name: name.to_string(),
                reason: format!("collection already holds {other}, not {handle}"),
            });
        }

        let binding = self
            .bindings
            .entry(handle.id())
            .or_insert_with(|| {
                Arc::new(TypeBinding {
                    type_name: handle.name(),
                    id_field: T::ID_FIELD,
                })
            })
            .value()
            .clone();
        Ok(binding)
    }

    /// Number of record types seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
