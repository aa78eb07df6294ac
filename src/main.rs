//! Personal Ledger CLI
//!
//! Command-line interface over the ledger store.
//!
//! # Usage
//!
//! ```bash
//! ledger create-account --name "Checking #0" --balance 1000 --type checking --bank Chase
//! ledger record-entry --description "Car Repair" --date 1961-09-05 --type debit \
//!     --amount 500 --account "Checking #0" --apply
//! ledger record-transfer --description Rent --date 1961-09-05 --amount 50 \
//!     --from "Checking #0" --to "Checking #1"
//! ledger apply-transfer 1
//! ledger import-entries statement.csv --apply
//! ledger --database books.db accounts > accounts.csv
//! ```
//!
//! Results are written to stdout as CSV, logs to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unknown account, invalid amount, database failure, etc.)

use personal_ledger::{cli, telemetry};
use std::process;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    telemetry::init(&args.log_level);

    // Output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
