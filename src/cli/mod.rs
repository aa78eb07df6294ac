// CLI module
// Command-line interface, argument parsing and command dispatch

mod args;
mod commands;

pub use args::{CliArgs, Command};
pub use commands::{execute, import_entries, ImportSummary};

use crate::core::LedgerEngine;
use crate::store::SqliteStore;
use crate::types::LedgerError;
use clap::Parser;
use std::io::Write;
use tracing::debug;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing subcommand, or `--help`),
/// clap prints an error or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Open the configured database and run the parsed command
///
/// Results are written to `output` as CSV.
///
/// # Errors
///
/// Returns any error raised while opening the store or running the command.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), LedgerError> {
    let config = args.to_store_config();
    debug!(database = %config.database.display(), "opening ledger store");

    let store = SqliteStore::open(&config)?;
    let mut engine = LedgerEngine::new(store);
    execute(&mut engine, &args.command, output)
}
