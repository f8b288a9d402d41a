use clap::Parser;
use edgestore::cli::command::Cli;
use edgestore::cli::{output, run};

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = run::execute(cli) {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
