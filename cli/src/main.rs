//! neoalzette-autosearch CLI
//!
//! Thin command-line shell over the search engine's library entry points.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{run_search, run_table, SearchArgs, TableArgs};
use neoalzette_autosearch::Error;

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Parser)]
#[command(name = "neoalzette-autosearch")]
#[command(about = "Branch-and-bound best-trail search for the NeoAlzette ARX primitive", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for the best differential or linear trail.
    Search(SearchArgs),
    /// Build a pDDT or cLAT table and print summary statistics.
    Table(TableArgs),
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result: Result<()> = match cli.command {
        Commands::Search(args) => run_search(&args),
        Commands::Table(args) => run_table(&args),
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        let exit_code = if err.downcast_ref::<Error>().is_some_and(|e| matches!(e, Error::InvalidArgument(_))) {
            2
        } else {
            1
        };
        std::process::exit(exit_code);
    }
}
