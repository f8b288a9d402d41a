//! Store facade, registry and the engine handles they manage.

pub mod facade;
pub mod handle;
pub mod identity;
pub mod registry;
pub mod settings;
