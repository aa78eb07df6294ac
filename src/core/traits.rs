//! Storage abstraction for the ledger core
//!
//! The core never talks to a database directly. It drives a [`LedgerStore`],
//! which provides transactional create/read/update for accounts, entries and
//! transfers. Both the in-memory and the SQLite store implement it, so the
//! engine and its tests run unchanged against either.

use crate::types::{
    Account, AccountId, Entry, EntryDraft, EntryId, LedgerError, NewAccount, Transfer,
    TransferDraft, TransferId,
};
use rust_decimal::Decimal;

/// Transactional storage for accounts, entries and transfers
///
/// Writes made between [`begin`](LedgerStore::begin) and
/// [`commit`](LedgerStore::commit) become visible together or, after
/// [`rollback`](LedgerStore::rollback), not at all. Transactions do not nest.
///
/// Listings of entries and transfers are ordered most recent date first,
/// newest id first on equal dates. Accounts are listed in id order.
pub trait LedgerStore {
    /// Open a store transaction
    fn begin(&mut self) -> Result<(), LedgerError>;

    /// Make every write since `begin` durable
    fn commit(&mut self) -> Result<(), LedgerError>;

    /// Discard every write since `begin`
    fn rollback(&mut self) -> Result<(), LedgerError>;

    /// Insert a validated account
    ///
    /// Must fail with `DuplicateName` if the name is taken.
    fn insert_account(&mut self, account: NewAccount) -> Result<Account, LedgerError>;

    /// Look up an account by id
    fn account(&self, id: AccountId) -> Result<Option<Account>, LedgerError>;

    /// Look up an account by its exact name
    fn account_by_name(&self, name: &str) -> Result<Option<Account>, LedgerError>;

    /// All accounts, in id order
    fn accounts(&self) -> Result<Vec<Account>, LedgerError>;

    /// Overwrite an account balance
    fn update_balance(&mut self, id: AccountId, balance: Decimal) -> Result<(), LedgerError>;

    /// Insert a validated entry in the `Recorded` state
    fn insert_entry(&mut self, entry: EntryDraft) -> Result<Entry, LedgerError>;

    /// Look up an entry by id
    fn entry(&self, id: EntryId) -> Result<Option<Entry>, LedgerError>;

    /// Entries, optionally restricted to one account
    fn entries(&self, account: Option<AccountId>) -> Result<Vec<Entry>, LedgerError>;

    /// Move an entry to the `Applied` state
    fn mark_entry_applied(&mut self, id: EntryId) -> Result<(), LedgerError>;

    /// Insert a validated transfer in the `Recorded` state
    fn insert_transfer(&mut self, transfer: TransferDraft) -> Result<Transfer, LedgerError>;

    /// Look up a transfer by id
    fn transfer(&self, id: TransferId) -> Result<Option<Transfer>, LedgerError>;

    /// Transfers, optionally restricted to those touching one account
    fn transfers(&self, account: Option<AccountId>) -> Result<Vec<Transfer>, LedgerError>;

    /// Move a transfer to the `Applied` state
    fn mark_transfer_applied(&mut self, id: TransferId) -> Result<(), LedgerError>;
}

/// Run `f` inside one store transaction
///
/// Commits when `f` succeeds and rolls back when it fails. A failed commit
/// is rolled back too, so the store never stays inside a transaction. The
/// original error is returned unchanged; a failing rollback is logged, not
/// reported.
pub fn atomically<S, T, F>(store: &mut S, f: F) -> Result<T, LedgerError>
where
    S: LedgerStore + ?Sized,
    F: FnOnce(&mut S) -> Result<T, LedgerError>,
{
    store.begin()?;

    match f(store) {
        Ok(value) => match store.commit() {
            Ok(()) => {
                tracing::debug!("store transaction committed");
                Ok(value)
            }
            Err(error) => {
                tracing::warn!(%error, "commit failed, rolling back store transaction");
                Err(rollback_after(store, error))
            }
        },
        Err(error) => {
            tracing::debug!(%error, "rolling back store transaction");
            Err(rollback_after(store, error))
        }
    }
}

fn rollback_after<S: LedgerStore + ?Sized>(store: &mut S, error: LedgerError) -> LedgerError {
    if let Err(rollback_error) = store.rollback() {
        tracing::error!(%rollback_error, "rollback failed after {}", error);
    }
    error
}
