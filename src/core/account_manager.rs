//! Account management module
//!
//! This module provides the `AccountManager`, a thin layer over a
//! [`LedgerStore`] that owns the account rules:
//! - Creating accounts with unique, valid names
//! - Resolving accounts by id or by name
//! - Debiting and crediting balances and persisting the result
//!
//! The manager does not open store transactions itself. The engine wraps
//! each public operation in one, so a manager call is always part of a
//! larger atomic unit of work.

use crate::core::traits::LedgerStore;
use crate::types::{Account, AccountId, LedgerError, NewAccount};
use rust_decimal::Decimal;

/// Account rules on top of a borrowed store
pub struct AccountManager<'s, S: LedgerStore + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: LedgerStore + ?Sized> AccountManager<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        AccountManager { store }
    }

    /// Create a new account
    ///
    /// Validates the request, checks that no account already carries the
    /// name and inserts it. Run inside a store transaction the check and the
    /// insert form one atomic step.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if the trimmed name is empty or too long
    /// - `DuplicateName` if the name is already taken
    pub fn create_account(&mut self, request: NewAccount) -> Result<Account, LedgerError> {
        let request = request.validate()?;

        if self.store.account_by_name(&request.name)?.is_some() {
            return Err(LedgerError::duplicate_name(&request.name));
        }

        self.store.insert_account(request)
    }

    /// Get an account by id
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no account has this id.
    pub fn get(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store
            .account(id)?
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Get an account by name
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no account has this name.
    pub fn get_by_name(&self, name: &str) -> Result<Account, LedgerError> {
        self.store
            .account_by_name(name.trim())?
            .ok_or_else(|| LedgerError::account_name_not_found(name))
    }

    /// Subtract `amount` from an account and persist the new balance
    ///
    /// No floor at zero and no validation of `amount`.
    pub fn debit(&mut self, id: AccountId, amount: Decimal) -> Result<Account, LedgerError> {
        let mut account = self.get(id)?;
        account.debit(amount)?;
        self.store.update_balance(id, account.balance)?;
        Ok(account)
    }

    /// Add `amount` to an account and persist the new balance
    pub fn credit(&mut self, id: AccountId, amount: Decimal) -> Result<Account, LedgerError> {
        let mut account = self.get(id)?;
        account.credit(amount)?;
        self.store.update_balance(id, account.balance)?;
        Ok(account)
    }
}
