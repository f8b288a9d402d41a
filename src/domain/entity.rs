//! Persistable record types and the descriptors that name their collections.
//!
//! Every record kept by a store implements [`Record`], which exposes its
//! business identifier through a plain accessor. Collections are named by an
//! [`EntityDescriptor`], which also carries the concrete record type so that
//! no type is ever looked up from a string at call time.
//!
//! # Examples
//!
//! ```
//! use edgestore::domain::entity::{EntityDescriptor, Record};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Note {
//!     #[serde(rename = "businessId", default)]
//!     business_id: String,
//!     title: String,
//! }
//!
//! impl Record for Note {
//!     fn business_id(&self) -> &str {
//!         &self.business_id
//!     }
//! }
//!
//! const NOTES: EntityDescriptor<Note> = EntityDescriptor::new("note");
//! assert_eq!(NOTES.name(), "note");
//! ```

use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Field name under which records serialize their business identifier.
pub const DEFAULT_ID_FIELD: &str = "businessId";

/// A record type that can be persisted through a store.
///
/// Implementors must serialize their identifier under [`Record::ID_FIELD`] so
/// that filters on that field resolve to the identifier index.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Serialized name of the business identifier field.
    const ID_FIELD: &'static str = DEFAULT_ID_FIELD;

    /// The caller-meaningful key identifying this record.
    fn business_id(&self) -> &str;
}

/// Runtime identity of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle {
    id: TypeId,
    name: &'static str,
}

impl TypeHandle {
    /// Handle for the record type `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified Rust type name, for diagnostics only.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Names the collection that holds records of type `T`.
///
/// Descriptors are usually declared once as constants next to the record
/// type. [`EntityDescriptor::named`] builds one from a runtime name for
/// schemaless records such as [`Document`](crate::domain::document::Document).
pub struct EntityDescriptor<T> {
    name: Cow<'static, str>,
    _record: PhantomData<fn() -> T>,
}

impl<T> EntityDescriptor<T> {
    /// Descriptor with a static collection name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            _record: PhantomData,
        }
    }

    /// Descriptor with a collection name known only at runtime.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: 'static> EntityDescriptor<T> {
    #[must_use]
    pub fn type_handle(&self) -> TypeHandle {
        TypeHandle::of::<T>()
    }
}

impl<T> Clone for EntityDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for EntityDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("name", &self.name)
            .field("type", &type_name::<T>())
            .finish()
    }
}
