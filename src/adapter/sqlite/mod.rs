//! SQLite persistence adapters.
//!
//! Provides the record collections, filter translation and change log that
//! back a store, using Diesel ORM over an r2d2 connection pool.

pub mod change_log;
pub mod collection;
pub mod database;
pub mod query;
