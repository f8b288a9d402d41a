//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`records`] — Sample record types (`Task`, `TaskProgress`) and their
//!   descriptors.
//! - [`store`] — Temporary registries and in-memory stores.

pub mod records;
pub mod store;
