//! Transfer-related types for the personal ledger
//!
//! A Transfer moves an amount from one account to another. Like an entry it
//! is recorded first and applied in a separate step.

use super::account::AccountId;
use super::error::LedgerError;
use super::money::to_money;
use super::state::RecordState;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Transfer identifier, assigned by the store
pub type TransferId = i64;

/// A recorded transfer
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub id: TransferId,
    pub description: String,
    pub date: NaiveDate,
    /// Never negative
    pub amount: Decimal,
    /// Account that is debited
    pub from_account: AccountId,
    /// Account that is credited
    pub to_account: AccountId,
    pub state: RecordState,
}

impl Transfer {
    /// True when both sides name the same account
    pub fn is_self_transfer(&self) -> bool {
        self.from_account == self.to_account
    }
}

/// Raw values for creating a transfer
///
/// `from_account == to_account` is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub from_account: AccountId,
    pub to_account: AccountId,
}

/// A checked transfer, ready to be inserted by a store
#[derive(Debug, Clone, PartialEq)]
pub struct TransferDraft {
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub from_account: AccountId,
    pub to_account: AccountId,
}

impl NewTransfer {
    pub fn new(
        description: impl Into<String>,
        date: NaiveDate,
        amount: Decimal,
        from_account: AccountId,
        to_account: AccountId,
    ) -> Self {
        NewTransfer {
            description: description.into(),
            date,
            amount,
            from_account,
            to_account,
        }
    }

    /// Check the amount
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if the amount is negative.
    pub fn validate(&self) -> Result<TransferDraft, LedgerError> {
        if self.amount < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(self.amount));
        }

        Ok(TransferDraft {
            description: self.description.trim().to_string(),
            date: self.date,
            amount: to_money(self.amount),
            from_account: self.from_account,
            to_account: self.to_account,
        })
    }
}
