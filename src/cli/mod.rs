//! CLI module graph.

pub mod changes;
pub mod command;
pub mod filter;
pub mod output;
pub mod paths;
pub mod record;
pub mod run;
