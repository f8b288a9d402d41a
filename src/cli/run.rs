//! Command dispatch: configuration, logging and store lifecycle around each
//! subcommand.

use std::path::Path;

use anyhow::{Context, Result};

use super::command::{Cli, Commands};
use super::{changes, output, paths, record};
use crate::infrastructure::config::logging::LoggingConfig;
use crate::infrastructure::config::settings::Config;
use crate::store::registry::StoreRegistry;

/// Load configuration: an explicit `--config` must exist, the default path
/// is used only if present.
///
/// # Errors
/// Returns an error if the file cannot be read or is invalid.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }
    let default = paths::default_config();
    if default.exists() {
        return Config::load(&default)
            .with_context(|| format!("failed to load config from {}", default.display()));
    }
    Ok(Config::default())
}

fn logging_for(cli: &Cli, config: &LoggingConfig) -> LoggingConfig {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error".to_string(),
        (false, 0) => config.level.clone(),
        (false, 1) => "debug".to_string(),
        (false, _) => "trace".to_string(),
    };
    LoggingConfig {
        level,
        format: config.format.clone(),
    }
}

/// Run a parsed command line.
///
/// # Errors
/// Returns any configuration, validation or storage error the command hit.
pub fn execute(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let config = load_config(cli.config.as_deref())?;
    logging_for(&cli, &config.logging).init();

    let mut settings = config.storage.to_settings(&paths::default_root());
    if let Some(root) = &cli.root {
        settings.root.clone_from(root);
    }
    let registry = StoreRegistry::new(settings);

    let result = match &cli.command {
        Commands::Create(args) => record::create(&registry, args),
        Commands::Update(args) => record::update(&registry, args),
        Commands::Delete(args) => record::delete(&registry, args),
        Commands::Get(args) => record::get(&registry, args),
        Commands::Query(args) => record::query(&registry, args),
        Commands::Changes(args) => changes::list(&registry, args),
    };
    registry.close_all();
    result
}
