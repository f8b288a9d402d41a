//! Store-agnostic types: record identity, provenance, filters and change log
//! entries. Nothing here touches storage.

pub mod change;
pub mod context;
pub mod document;
pub mod entity;
pub mod filter;
