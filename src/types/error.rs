//! Error types for the personal ledger
//!
//! Every operation in the core returns `Result<_, LedgerError>`. Validation
//! failures are raised before anything is written, so a caller that receives
//! one of them can assume the store is unchanged.
//!
//! # Error Categories
//!
//! - **Validation Errors**: duplicate or malformed names, negative amounts,
//!   unknown transaction or account types
//! - **Lookup Errors**: referenced account, entry or transfer does not exist
//! - **State Errors**: entry or transfer already applied, store transaction misuse
//! - **Arithmetic Errors**: balance overflow
//! - **Store Errors**: failures from the persistence engine, passed through unchanged

use super::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// An account with this name already exists
    ///
    /// Recovered by the caller by choosing a different name.
    #[error("Account '{name}' already exists")]
    DuplicateName {
        /// The rejected name
        name: String,
    },

    /// Account name is empty or too long
    #[error("Invalid account name '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why the name was rejected
        reason: String,
    },

    /// Amount is negative
    ///
    /// Raised at Entry and Transfer creation; nothing is persisted.
    #[error("Invalid amount {amount}: amounts must not be negative")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Transaction type is neither `debit` nor `credit`
    #[error("Invalid transaction type '{transaction_type}': expected 'debit' or 'credit'")]
    InvalidTransactionType {
        /// The rejected transaction type string
        transaction_type: String,
    },

    /// Account type is neither `checking` nor `savings`
    #[error("Invalid account type '{account_type}': expected 'checking' or 'savings'")]
    InvalidAccountType {
        /// The rejected account type string
        account_type: String,
    },

    /// Referenced account does not exist
    #[error("Account {reference} not found")]
    AccountNotFound {
        /// Id or name used for the lookup
        reference: String,
    },

    /// Referenced entry does not exist
    #[error("Entry {id} not found")]
    EntryNotFound {
        /// Entry id used for the lookup
        id: i64,
    },

    /// Referenced transfer does not exist
    #[error("Transfer {id} not found")]
    TransferNotFound {
        /// Transfer id used for the lookup
        id: i64,
    },

    /// The entry or transfer has already been applied to its account(s)
    #[error("{kind} {id} has already been applied")]
    AlreadyApplied {
        /// "Entry" or "Transfer"
        kind: String,
        /// Record id
        id: i64,
    },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} on account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account id
        account: AccountId,
    },

    /// `begin` was called while a store transaction was already open
    #[error("A store transaction is already in progress")]
    TransactionInProgress,

    /// `commit` or `rollback` was called without an open store transaction
    #[error("No store transaction is in progress")]
    NoActiveTransaction,

    /// Failure reported by the persistence engine
    #[error("Store error: {message}")]
    Store {
        /// Description of the store failure
        message: String,
    },

    /// I/O error while reading or writing files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV reading or writing failed
    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Csv {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the CSV error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::Csv {
            line,
            message: error.to_string(),
        }
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(error: rusqlite::Error) -> Self {
        LedgerError::Store {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a DuplicateName error
    pub fn duplicate_name(name: &str) -> Self {
        LedgerError::DuplicateName {
            name: name.to_string(),
        }
    }

    /// Create an InvalidName error
    pub fn invalid_name(name: &str, reason: &str) -> Self {
        LedgerError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an InvalidTransactionType error
    pub fn invalid_transaction_type(transaction_type: &str) -> Self {
        LedgerError::InvalidTransactionType {
            transaction_type: transaction_type.to_string(),
        }
    }

    /// Create an InvalidAccountType error
    pub fn invalid_account_type(account_type: &str) -> Self {
        LedgerError::InvalidAccountType {
            account_type: account_type.to_string(),
        }
    }

    /// Create an AccountNotFound error from an account id
    pub fn account_not_found(id: AccountId) -> Self {
        LedgerError::AccountNotFound {
            reference: id.to_string(),
        }
    }

    /// Create an AccountNotFound error from an account name
    pub fn account_name_not_found(name: &str) -> Self {
        LedgerError::AccountNotFound {
            reference: format!("'{}'", name),
        }
    }

    /// Create an AlreadyApplied error
    pub fn already_applied(kind: &str, id: i64) -> Self {
        LedgerError::AlreadyApplied {
            kind: kind.to_string(),
            id,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create a Store error
    pub fn store(message: impl Into<String>) -> Self {
        LedgerError::Store {
            message: message.into(),
        }
    }

    /// True for errors raised by input validation rather than by the store
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::DuplicateName { .. }
                | LedgerError::InvalidName { .. }
                | LedgerError::InvalidAmount { .. }
                | LedgerError::InvalidTransactionType { .. }
                | LedgerError::InvalidAccountType { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::duplicate_name(
        LedgerError::DuplicateName { name: "Checking #0".to_string() },
        "Account 'Checking #0' already exists"
    )]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: Decimal::new(-500, 2) },
        "Invalid amount -5.00: amounts must not be negative"
    )]
    #[case::invalid_transaction_type(
        LedgerError::InvalidTransactionType { transaction_type: "gibberish".to_string() },
        "Invalid transaction type 'gibberish': expected 'debit' or 'credit'"
    )]
    #[case::account_not_found(
        LedgerError::AccountNotFound { reference: "42".to_string() },
        "Account 42 not found"
    )]
    #[case::already_applied(
        LedgerError::AlreadyApplied { kind: "Entry".to_string(), id: 7 },
        "Entry 7 has already been applied"
    )]
    #[case::overflow(
        LedgerError::ArithmeticOverflow { operation: "credit".to_string(), account: 3 },
        "Arithmetic overflow in credit on account 3"
    )]
    #[case::csv_with_line(
        LedgerError::Csv { line: Some(4), message: "bad field".to_string() },
        "CSV error at line 4: bad field"
    )]
    #[case::csv_without_line(
        LedgerError::Csv { line: None, message: "bad field".to_string() },
        "CSV error: bad field"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::duplicate_name(
        LedgerError::duplicate_name("Savings"),
        LedgerError::DuplicateName { name: "Savings".to_string() }
    )]
    #[case::account_name_not_found(
        LedgerError::account_name_not_found("Savings"),
        LedgerError::AccountNotFound { reference: "'Savings'".to_string() }
    )]
    #[case::already_applied(
        LedgerError::already_applied("Transfer", 2),
        LedgerError::AlreadyApplied { kind: "Transfer".to_string(), id: 2 }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case(LedgerError::duplicate_name("a"), true)]
    #[case(LedgerError::invalid_amount(Decimal::NEGATIVE_ONE), true)]
    #[case(LedgerError::invalid_transaction_type("x"), true)]
    #[case(LedgerError::account_not_found(1), false)]
    #[case(LedgerError::store("disk I/O error"), false)]
    fn test_is_validation(#[case] error: LedgerError, #[case] expected: bool) {
        assert_eq!(error.is_validation(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
