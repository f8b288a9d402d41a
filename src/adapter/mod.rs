//! Implementations of ports (hexagonal adapters) and the storage engine
//! bindings.

pub mod json;
pub mod sqlite;
