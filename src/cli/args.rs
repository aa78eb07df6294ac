use crate::config::{StoreConfig, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DATABASE};
use crate::types::{AccountType, EntryId, TransferId};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Personal bookkeeping: accounts, entries and transfers
#[derive(Parser, Debug)]
#[command(name = "ledger")]
#[command(about = "Personal bookkeeping: accounts, entries and transfers", long_about = None)]
pub struct CliArgs {
    /// SQLite database file (`:memory:` for a throwaway database)
    #[arg(
        long = "database",
        short = 'd',
        value_name = "PATH",
        env = "LEDGER_DATABASE",
        default_value = DEFAULT_DATABASE
    )]
    pub database: PathBuf,

    /// How long to wait for a locked database, in milliseconds
    #[arg(
        long = "busy-timeout-ms",
        value_name = "MS",
        env = "LEDGER_BUSY_TIMEOUT_MS",
        default_value_t = DEFAULT_BUSY_TIMEOUT_MS
    )]
    pub busy_timeout_ms: u64,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Ledger operations
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create an account
    CreateAccount {
        #[arg(long)]
        name: String,
        /// Opening balance
        #[arg(long, allow_negative_numbers = true)]
        balance: Decimal,
        /// checking or savings
        #[arg(long = "type", value_name = "TYPE", default_value = "checking")]
        account_type: AccountType,
        #[arg(long)]
        bank: String,
    },

    /// List all accounts
    Accounts,

    /// Show one account
    Account { name: String },

    /// Subtract an amount from an account
    Debit {
        #[arg(long)]
        account: String,
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
    },

    /// Add an amount to an account
    Credit {
        #[arg(long)]
        account: String,
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
    },

    /// Record a debit or credit entry
    RecordEntry {
        #[arg(long)]
        description: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// debit or credit
        #[arg(long = "type", value_name = "TYPE")]
        transaction_type: String,
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
        #[arg(long)]
        account: String,
        /// Apply the entry in the same transaction
        #[arg(long)]
        apply: bool,
    },

    /// Apply a recorded entry to its account
    ApplyEntry { id: EntryId },

    /// Show one entry
    Entry { id: EntryId },

    /// List entries, most recent first
    Entries {
        #[arg(long)]
        account: Option<String>,
    },

    /// Record a transfer between two accounts
    RecordTransfer {
        #[arg(long)]
        description: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Apply the transfer in the same transaction
        #[arg(long)]
        apply: bool,
    },

    /// Apply a recorded transfer
    ApplyTransfer { id: TransferId },

    /// Show one transfer
    Transfer { id: TransferId },

    /// List transfers, most recent first
    Transfers {
        #[arg(long)]
        account: Option<String>,
    },

    /// Import entries from a CSV file (description,date,type,amount,account)
    ImportEntries {
        file: PathBuf,
        /// Apply each imported entry as it is recorded
        #[arg(long)]
        apply: bool,
    },
}

impl CliArgs {
    /// Create a StoreConfig from CLI arguments
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig::new(self.database.clone(), self.busy_timeout_ms)
    }
}
