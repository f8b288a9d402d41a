//! Configuration sections and loading.

pub mod logging;
pub mod settings;
pub mod storage;
