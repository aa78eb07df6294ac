//! Personal Ledger Library
//! # Overview
//!
//! This library keeps personal financial accounts and the debits, credits
//! and transfers that move money between them, persisted in SQLite.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Entry, Transfer, LedgerError)
//! - [`config`] - Store configuration
//! - [`cli`] - CLI argument parsing and command dispatch
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Ledger operations, each one atomic
//!   - [`core::account_manager`] - Account creation and balance changes
//!   - [`core::traits`] - The `LedgerStore` persistence seam
//! - [`store`] - `LedgerStore` implementations (SQLite and in-memory)
//! - [`io`] - CSV output and entry import
//! - [`telemetry`] - Logging setup
//!
//! # Entries and Transfers
//!
//! Entries and transfers are recorded first and applied later:
//!
//! - **Debit entry**: subtracts its amount from one account
//! - **Credit entry**: adds its amount to one account
//! - **Transfer**: debits the source account and credits the destination
//!
//! Applying moves the balances and marks the record applied, in the same
//! store transaction. A record can be applied only once.
//!
//! # Money
//!
//! Amounts are `rust_decimal::Decimal` rounded to two places. Balances may
//! go negative; amounts on entries and transfers may not.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod store;
pub mod telemetry;
pub mod types;

pub use config::StoreConfig;
pub use core::{atomically, AccountManager, LedgerEngine, LedgerStore};
pub use io::write_accounts_csv;
pub use store::{MemoryStore, SqliteStore};
pub use types::{
    Account, AccountId, AccountType, Entry, EntryId, LedgerError, NewAccount, NewEntry,
    NewTransfer, RecordState, TransactionType, Transfer, TransferId,
};
