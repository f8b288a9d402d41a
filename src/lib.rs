//! Edgestore - a local persistence facade with an append-only change log.
//!
//! Applications create, update, delete and query typed records through a
//! [`StoreFacade`](store::facade::StoreFacade). Every accepted mutation is
//! written together with one entry in the store's change log, which
//! downstream synchronization consumers read.
//!
//! # Architecture
//!
//! - **`domain`** - Record identity, provenance, filters and change records
//! - **`port`** - The payload [`Serializer`](port::serializer::Serializer)
//!   contract
//! - **`adapter`** - JSON serializer and the SQLite persistence adapters
//!   (record collections, filter translation, change log)
//! - **`store`** - The facade, the named-store registry and engine handles
//! - **`infrastructure`** - Configuration and logging setup
//! - **`cli`** - The `edgestore` command-line tool
//!
//! # Features
//!
//! - `testkit` - Fixtures and temporary stores for integration tests
//!
//! # Example
//!
//! ```no_run
//! use edgestore::domain::context::MutationContext;
//! use edgestore::domain::document::Document;
//! use edgestore::domain::entity::EntityDescriptor;
//! use edgestore::domain::filter::Filter;
//! use edgestore::store::registry::StoreRegistry;
//! use edgestore::store::settings::StoreSettings;
//!
//! # fn main() -> edgestore::error::Result<()> {
//! let registry = StoreRegistry::new(StoreSettings::new("/var/lib/edgestore"));
//! let store = registry.get_or_create("tasks")?;
//! let tasks: EntityDescriptor<Document> = EntityDescriptor::new("task");
//!
//! let id = store.create(
//!     &tasks,
//!     br#"{"businessId":"t-1","status":"running"}"#,
//!     &MutationContext::default(),
//! )?;
//! let running = store.query(&tasks, &[Filter::eq("status", "running")])?;
//! assert_eq!(running[0].business_id, id);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
pub mod store;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
