//! Entry-related types for the personal ledger
//!
//! An Entry is a single-sided balance adjustment against one account. It
//! is recorded first and applied later, so the types here come in two
//! flavours: [`NewEntry`] holds the raw values a caller supplies, and
//! [`Entry`] is what the store hands back once the record exists.

use super::account::AccountId;
use super::error::LedgerError;
use super::money::to_money;
use super::state::RecordState;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Entry identifier, assigned by the store
pub type EntryId = i64;

/// Direction of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Subtract the amount from the account balance
    Debit,

    /// Add the amount to the account balance
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "debit",
            TransactionType::Credit => "credit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    /// Accepts exactly `debit` or `credit`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(TransactionType::Debit),
            "credit" => Ok(TransactionType::Credit),
            other => Err(LedgerError::invalid_transaction_type(other)),
        }
    }
}

/// A recorded entry
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub description: String,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    /// Never negative
    pub amount: Decimal,
    /// The account this entry adjusts
    pub account: AccountId,
    pub state: RecordState,
}

/// Raw values for creating an entry, as received from a caller
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub description: String,
    pub date: NaiveDate,
    pub transaction_type: String,
    pub amount: Decimal,
    pub account: AccountId,
}

/// A checked entry, ready to be inserted by a store
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub description: String,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub account: AccountId,
}

impl NewEntry {
    pub fn new(
        description: impl Into<String>,
        date: NaiveDate,
        transaction_type: impl Into<String>,
        amount: Decimal,
        account: AccountId,
    ) -> Self {
        NewEntry {
            description: description.into(),
            date,
            transaction_type: transaction_type.into(),
            amount,
            account,
        }
    }

    /// Check transaction type and amount
    ///
    /// # Errors
    ///
    /// - `InvalidTransactionType` unless the type is exactly `debit` or `credit`
    /// - `InvalidAmount` if the amount is negative
    pub fn validate(&self) -> Result<EntryDraft, LedgerError> {
        let transaction_type = self.transaction_type.parse::<TransactionType>()?;

        if self.amount < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(self.amount));
        }

        Ok(EntryDraft {
            description: self.description.trim().to_string(),
            date: self.date,
            transaction_type,
            amount: to_money(self.amount),
            account: self.account,
        })
    }
}
