//! Ledger engine
//!
//! This module provides the `LedgerEngine` that owns a [`LedgerStore`] and
//! exposes every ledger operation to callers. Each mutating operation runs
//! as one atomic unit of work against the store.
//!
//! The engine enforces business rules such as:
//! - Unique, valid account names
//! - Non-negative amounts and debit/credit-only transaction types
//! - Record-then-apply: creating an entry or transfer never moves money,
//!   applying it does, and applying it a second time is rejected
//! - Balance conservation across a transfer

use crate::core::account_manager::AccountManager;
use crate::core::traits::{atomically, LedgerStore};
use crate::types::{
    to_money, Account, AccountId, Entry, EntryId, LedgerError, NewAccount, NewEntry,
    NewTransfer, RecordState, TransactionType, Transfer, TransferId,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Ledger engine
///
/// Holds the store for the lifetime of a caller's session (one request, one
/// CLI invocation). The store is never shared; every operation borrows it
/// mutably through the engine.
pub struct LedgerEngine<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> LedgerEngine<S> {
    pub fn new(store: S) -> Self {
        LedgerEngine { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// Create an account
    ///
    /// The existence check and the insert run in one store transaction.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if the trimmed name is empty or too long
    /// - `DuplicateName` if an account with the same name exists
    pub fn create_account(&mut self, request: NewAccount) -> Result<Account, LedgerError> {
        let account = atomically(&mut self.store, |store| {
            AccountManager::new(store).create_account(request)
        })?;

        info!(
            account = account.id,
            name = %account.name,
            balance = %account.balance,
            "account created"
        );
        Ok(account)
    }

    /// Subtract `amount` from an account's balance
    ///
    /// `amount` is rounded to cents first. Its sign is not checked and the
    /// balance does not stop at zero.
    pub fn debit(&mut self, id: AccountId, amount: Decimal) -> Result<Account, LedgerError> {
        let amount = to_money(amount);
        atomically(&mut self.store, |store| AccountManager::new(store).debit(id, amount))
    }

    /// Add `amount` to an account's balance, rounded to cents
    pub fn credit(&mut self, id: AccountId, amount: Decimal) -> Result<Account, LedgerError> {
        let amount = to_money(amount);
        atomically(&mut self.store, |store| AccountManager::new(store).credit(id, amount))
    }

    /// Get an account by id
    pub fn account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store
            .account(id)?
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Get an account by name
    pub fn account_by_name(&self, name: &str) -> Result<Account, LedgerError> {
        self.find_account_by_name(name)?
            .ok_or_else(|| LedgerError::account_name_not_found(name))
    }

    /// Look up an account by name, `None` if it does not exist
    pub fn find_account_by_name(&self, name: &str) -> Result<Option<Account>, LedgerError> {
        self.store.account_by_name(name.trim())
    }

    /// All accounts in id order
    pub fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        self.store.accounts()
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Record an entry without touching the account balance
    ///
    /// # Errors
    ///
    /// - `InvalidTransactionType` unless the type is exactly `debit` or `credit`
    /// - `InvalidAmount` if the amount is negative
    /// - `AccountNotFound` if the account does not exist
    pub fn create_entry(&mut self, request: NewEntry) -> Result<Entry, LedgerError> {
        let entry = atomically(&mut self.store, |store| record_entry(store, &request))?;

        info!(
            entry = entry.id,
            account = entry.account,
            kind = %entry.transaction_type,
            amount = %entry.amount,
            "entry recorded"
        );
        Ok(entry)
    }

    /// Apply a recorded entry to its account
    ///
    /// A debit entry debits the account, a credit entry credits it. The
    /// updated account is returned.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if no entry has this id
    /// - `AlreadyApplied` if the entry was applied before
    /// - `InvalidTransactionType` if the stored type is not debit/credit
    pub fn apply_entry(&mut self, id: EntryId) -> Result<Account, LedgerError> {
        let (_, account) = atomically(&mut self.store, |store| apply_recorded_entry(store, id))?;

        info!(
            entry = id,
            account = account.id,
            balance = %account.balance,
            "entry applied"
        );
        Ok(account)
    }

    /// Record an entry and apply it in one store transaction
    ///
    /// Either both the entry and the balance change are persisted, or
    /// neither is.
    pub fn record_and_apply_entry(
        &mut self,
        request: NewEntry,
    ) -> Result<(Entry, Account), LedgerError> {
        let (entry, account) = atomically(&mut self.store, |store| {
            let entry = record_entry(store, &request)?;
            apply_recorded_entry(store, entry.id)
        })?;

        info!(
            entry = entry.id,
            account = account.id,
            balance = %account.balance,
            "entry recorded and applied"
        );
        Ok((entry, account))
    }

    /// Get an entry by id
    pub fn entry(&self, id: EntryId) -> Result<Entry, LedgerError> {
        self.store
            .entry(id)?
            .ok_or(LedgerError::EntryNotFound { id })
    }

    /// Entries, most recent first, optionally for one account
    pub fn entries(&self, account: Option<AccountId>) -> Result<Vec<Entry>, LedgerError> {
        self.store.entries(account)
    }

    // ------------------------------------------------------------------
    // Transfers
    // ------------------------------------------------------------------

    /// Record a transfer without touching either balance
    ///
    /// A transfer from an account to itself is accepted and logged.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is negative
    /// - `AccountNotFound` if either account does not exist
    pub fn create_transfer(&mut self, request: NewTransfer) -> Result<Transfer, LedgerError> {
        let transfer = atomically(&mut self.store, |store| record_transfer(store, &request))?;

        info!(
            transfer = transfer.id,
            from = transfer.from_account,
            to = transfer.to_account,
            amount = %transfer.amount,
            "transfer recorded"
        );
        Ok(transfer)
    }

    /// Apply a recorded transfer
    ///
    /// Debits the source account, then credits the destination account, and
    /// returns both as `(from, to)` after the change.
    ///
    /// # Errors
    ///
    /// - `TransferNotFound` if no transfer has this id
    /// - `AlreadyApplied` if the transfer was applied before
    pub fn apply_transfer(&mut self, id: TransferId) -> Result<(Account, Account), LedgerError> {
        let (_, from, to) =
            atomically(&mut self.store, |store| apply_recorded_transfer(store, id))?;

        info!(
            transfer = id,
            from = from.id,
            from_balance = %from.balance,
            to = to.id,
            to_balance = %to.balance,
            "transfer applied"
        );
        Ok((from, to))
    }

    /// Record a transfer and apply it in one store transaction
    pub fn record_and_apply_transfer(
        &mut self,
        request: NewTransfer,
    ) -> Result<(Transfer, Account, Account), LedgerError> {
        let (transfer, from, to) = atomically(&mut self.store, |store| {
            let transfer = record_transfer(store, &request)?;
            apply_recorded_transfer(store, transfer.id)
        })?;

        info!(
            transfer = transfer.id,
            from_balance = %from.balance,
            to_balance = %to.balance,
            "transfer recorded and applied"
        );
        Ok((transfer, from, to))
    }

    /// Get a transfer by id
    pub fn transfer(&self, id: TransferId) -> Result<Transfer, LedgerError> {
        self.store
            .transfer(id)?
            .ok_or(LedgerError::TransferNotFound { id })
    }

    /// Transfers, most recent first, optionally those touching one account
    pub fn transfers(&self, account: Option<AccountId>) -> Result<Vec<Transfer>, LedgerError> {
        self.store.transfers(account)
    }
}

fn record_entry<S: LedgerStore + ?Sized>(
    store: &mut S,
    request: &NewEntry,
) -> Result<Entry, LedgerError> {
    let draft = request.validate()?;
    AccountManager::new(store).get(draft.account)?;
    store.insert_entry(draft)
}

fn apply_recorded_entry<S: LedgerStore + ?Sized>(
    store: &mut S,
    id: EntryId,
) -> Result<(Entry, Account), LedgerError> {
    let entry = store.entry(id)?.ok_or(LedgerError::EntryNotFound { id })?;
    if entry.state.is_applied() {
        return Err(LedgerError::already_applied("Entry", id));
    }

    let mut accounts = AccountManager::new(store);
    let account = match entry.transaction_type {
        TransactionType::Debit => accounts.debit(entry.account, entry.amount)?,
        TransactionType::Credit => accounts.credit(entry.account, entry.amount)?,
    };

    store.mark_entry_applied(id)?;

    let entry = Entry {
        state: RecordState::Applied,
        ..entry
    };
    Ok((entry, account))
}

fn record_transfer<S: LedgerStore + ?Sized>(
    store: &mut S,
    request: &NewTransfer,
) -> Result<Transfer, LedgerError> {
    let draft = request.validate()?;

    let accounts = AccountManager::new(store);
    accounts.get(draft.from_account)?;
    accounts.get(draft.to_account)?;

    let transfer = store.insert_transfer(draft)?;
    if transfer.is_self_transfer() {
        warn!(
            transfer = transfer.id,
            account = transfer.from_account,
            "transfer source and destination are the same account"
        );
    }

    Ok(transfer)
}

fn apply_recorded_transfer<S: LedgerStore + ?Sized>(
    store: &mut S,
    id: TransferId,
) -> Result<(Transfer, Account, Account), LedgerError> {
    let transfer = store
        .transfer(id)?
        .ok_or(LedgerError::TransferNotFound { id })?;
    if transfer.state.is_applied() {
        return Err(LedgerError::already_applied("Transfer", id));
    }

    let mut accounts = AccountManager::new(store);
    accounts.debit(transfer.from_account, transfer.amount)?;
    accounts.credit(transfer.to_account, transfer.amount)?;

    // Re-read both sides so a self-transfer reports the final balance twice.
    let from = accounts.get(transfer.from_account)?;
    let to = accounts.get(transfer.to_account)?;

    store.mark_transfer_applied(id)?;

    let transfer = Transfer {
        state: RecordState::Applied,
        ..transfer
    };
    Ok((transfer, from, to))
}
