//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account and account-creation types
//! - `entry`: Entry, transaction type and entry-creation types
//! - `transfer`: Transfer and transfer-creation types
//! - `state`: Record-then-apply lifecycle state
//! - `money`: Fixed-point helpers
//! - `error`: Error types for the ledger

pub mod account;
pub mod entry;
pub mod error;
pub mod money;
pub mod state;
pub mod transfer;

pub use account::{Account, AccountId, AccountType, NewAccount};
pub use entry::{Entry, EntryDraft, EntryId, NewEntry, TransactionType};
pub use error::LedgerError;
pub use money::{format_money, to_money};
pub use state::RecordState;
pub use transfer::{NewTransfer, Transfer, TransferDraft, TransferId};
