//! Command-line interface definitions.
//!
//! Every subcommand opens the named store through a store registry rooted at
//! the configured directory and works on schemaless
//! [`Document`](crate::domain::document::Document) records.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Local record store with an append-only change log
#[derive(Parser, Debug)]
#[command(name = "edgestore")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file [default: ~/.edgestore/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the stores (overrides storage.root)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the edgestore CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a record and print its business identifier
    Create(CreateArgs),

    /// Replace an existing record
    Update(UpdateArgs),

    /// Delete a record
    Delete(DeleteArgs),

    /// Fetch one record by business identifier
    Get(GetArgs),

    /// List records matching filters
    Query(QueryArgs),

    /// Show the change log
    Changes(ChangesArgs),
}

/// Store and collection a command works on.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Store name
    #[arg(long)]
    pub store: String,

    /// Collection (entity) name
    #[arg(long)]
    pub entity: String,
}

/// Provenance recorded with a mutation.
#[derive(Args, Debug, Clone)]
pub struct Provenance {
    /// Origin of the change
    #[arg(long, default_value = crate::domain::context::DEFAULT_SOURCE)]
    pub source: String,

    /// Who made the change
    #[arg(long)]
    pub actor: Option<String>,

    /// Why the change was made
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub target: Target,

    #[command(flatten)]
    pub provenance: Provenance,

    /// JSON payload, or `-` to read standard input
    pub payload: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub target: Target,

    /// Business identifier of the record
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub provenance: Provenance,

    /// JSON payload, or `-` to read standard input
    pub payload: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: Target,

    /// Business identifier of the record
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub provenance: Provenance,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: Target,

    /// Business identifier of the record
    #[arg(long)]
    pub id: String,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub target: Target,

    /// Equality filter FIELD=VALUE (repeatable)
    #[arg(long = "eq", value_name = "FIELD=VALUE")]
    pub eq: Vec<String>,

    /// Membership filter FIELD=A,B,... (repeatable)
    #[arg(long = "in", value_name = "FIELD=LIST")]
    pub is_in: Vec<String>,

    /// Greater-than filter FIELD=N (repeatable)
    #[arg(long = "gt", value_name = "FIELD=N")]
    pub gt: Vec<String>,

    /// Less-than filter FIELD=N (repeatable)
    #[arg(long = "lt", value_name = "FIELD=N")]
    pub lt: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ChangesArgs {
    /// Store name
    #[arg(long)]
    pub store: String,

    /// Only changes with an id greater than this
    #[arg(long)]
    pub after: Option<i64>,

    /// Maximum number of changes to show
    #[arg(long)]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "edgestore", "get", "--store", "s", "--entity", "e", "--id", "x", "--json", "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Get(_)));
    }

    #[test]
    fn create_defaults_source_to_ui() {
        let cli = Cli::try_parse_from(["edgestore", "create", "--store", "s", "--entity", "e"])
            .unwrap();
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.provenance.source, "ui");
        assert!(args.payload.is_none());
    }

    #[test]
    fn query_collects_repeated_filters() {
        let cli = Cli::try_parse_from([
            "edgestore", "query", "--store", "s", "--entity", "e", "--eq", "a=1", "--eq", "b=x",
            "--in", "c=1,2", "--gt", "d=3",
        ])
        .unwrap();
        let Commands::Query(args) = cli.command else {
            panic!("expected query");
        };
        assert_eq!(args.eq, vec!["a=1", "b=x"]);
        assert_eq!(args.is_in, vec!["c=1,2"]);
        assert_eq!(args.gt, vec!["d=3"]);
        assert!(args.lt.is_empty());
    }

    #[test]
    fn update_requires_id() {
        assert!(Cli::try_parse_from(["edgestore", "update", "--store", "s", "--entity", "e"]).is_err());
    }
}
