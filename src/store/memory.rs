//! In-memory ledger store
//!
//! Keeps accounts, entries and transfers in ordered maps. A store
//! transaction takes a snapshot of every table on `begin`; `rollback`
//! puts the snapshot back and `commit` drops it.
//!
//! The store enforces the same constraints as the SQLite schema: unique
//! account names and references to existing accounts.

use crate::core::traits::LedgerStore;
use crate::types::{
    Account, AccountId, Entry, EntryDraft, EntryId, LedgerError, NewAccount, RecordState,
    Transfer, TransferDraft, TransferId,
};
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    entries: BTreeMap<EntryId, Entry>,
    transfers: BTreeMap<TransferId, Transfer>,
    last_account_id: AccountId,
    last_entry_id: EntryId,
    last_transfer_id: TransferId,
}

/// Ledger store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Tables,
    snapshot: Option<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a store transaction is open
    pub fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    fn require_account(&self, id: AccountId) -> Result<(), LedgerError> {
        if self.tables.accounts.contains_key(&id) {
            Ok(())
        } else {
            Err(LedgerError::account_not_found(id))
        }
    }
}

impl LedgerStore for MemoryStore {
    fn begin(&mut self) -> Result<(), LedgerError> {
        if self.snapshot.is_some() {
            return Err(LedgerError::TransactionInProgress);
        }
        self.snapshot = Some(self.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), LedgerError> {
        self.snapshot
            .take()
            .map(|_| ())
            .ok_or(LedgerError::NoActiveTransaction)
    }

    fn rollback(&mut self) -> Result<(), LedgerError> {
        let snapshot = self
            .snapshot
            .take()
            .ok_or(LedgerError::NoActiveTransaction)?;
        self.tables = snapshot;
        Ok(())
    }

    fn insert_account(&mut self, account: NewAccount) -> Result<Account, LedgerError> {
        if self
            .tables
            .accounts
            .values()
            .any(|existing| existing.name == account.name)
        {
            return Err(LedgerError::duplicate_name(&account.name));
        }

        self.tables.last_account_id += 1;
        let account = Account {
            id: self.tables.last_account_id,
            name: account.name,
            balance: account.balance,
            account_type: account.account_type,
            bank: account.bank,
        };
        self.tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    fn account(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        Ok(self.tables.accounts.get(&id).cloned())
    }

    fn account_by_name(&self, name: &str) -> Result<Option<Account>, LedgerError> {
        Ok(self
            .tables
            .accounts
            .values()
            .find(|account| account.name == name)
            .cloned())
    }

    fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.tables.accounts.values().cloned().collect())
    }

    fn update_balance(&mut self, id: AccountId, balance: Decimal) -> Result<(), LedgerError> {
        let account = self
            .tables
            .accounts
            .get_mut(&id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;
        account.balance = balance;
        Ok(())
    }

    fn insert_entry(&mut self, entry: EntryDraft) -> Result<Entry, LedgerError> {
        self.require_account(entry.account)?;

        self.tables.last_entry_id += 1;
        let entry = Entry {
            id: self.tables.last_entry_id,
            description: entry.description,
            date: entry.date,
            transaction_type: entry.transaction_type,
            amount: entry.amount,
            account: entry.account,
            state: RecordState::Recorded,
        };
        self.tables.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn entry(&self, id: EntryId) -> Result<Option<Entry>, LedgerError> {
        Ok(self.tables.entries.get(&id).cloned())
    }

    fn entries(&self, account: Option<AccountId>) -> Result<Vec<Entry>, LedgerError> {
        let mut entries: Vec<Entry> = self
            .tables
            .entries
            .values()
            .filter(|entry| account.map_or(true, |id| entry.account == id))
            .cloned()
            .collect();
        entries.sort_by_key(|entry| Reverse((entry.date, entry.id)));
        Ok(entries)
    }

    fn mark_entry_applied(&mut self, id: EntryId) -> Result<(), LedgerError> {
        let entry = self
            .tables
            .entries
            .get_mut(&id)
            .ok_or(LedgerError::EntryNotFound { id })?;
        entry.state = RecordState::Applied;
        Ok(())
    }

    fn insert_transfer(&mut self, transfer: TransferDraft) -> Result<Transfer, LedgerError> {
        self.require_account(transfer.from_account)?;
        self.require_account(transfer.to_account)?;

        self.tables.last_transfer_id += 1;
        let transfer = Transfer {
            id: self.tables.last_transfer_id,
            description: transfer.description,
            date: transfer.date,
            amount: transfer.amount,
            from_account: transfer.from_account,
            to_account: transfer.to_account,
            state: RecordState::Recorded,
        };
        self.tables.transfers.insert(transfer.id, transfer.clone());
        Ok(transfer)
    }

    fn transfer(&self, id: TransferId) -> Result<Option<Transfer>, LedgerError> {
        Ok(self.tables.transfers.get(&id).cloned())
    }

    fn transfers(&self, account: Option<AccountId>) -> Result<Vec<Transfer>, LedgerError> {
        let mut transfers: Vec<Transfer> = self
            .tables
            .transfers
            .values()
            .filter(|transfer| {
                account.map_or(true, |id| {
                    transfer.from_account == id || transfer.to_account == id
                })
            })
            .cloned()
            .collect();
        transfers.sort_by_key(|transfer| Reverse((transfer.date, transfer.id)));
        Ok(transfers)
    }

    fn mark_transfer_applied(&mut self, id: TransferId) -> Result<(), LedgerError> {
        let transfer = self
            .tables
            .transfers
            .get_mut(&id)
            .ok_or(LedgerError::TransferNotFound { id })?;
        transfer.state = RecordState::Applied;
        Ok(())
    }
}
