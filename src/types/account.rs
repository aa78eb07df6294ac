//! Account-related types for the personal ledger
//!
//! An Account owns its balance. Entries and transfers never hold a copy of
//! it; they change it through the store by calling [`Account::debit`] and
//! [`Account::credit`].

use super::error::LedgerError;
use super::money::to_money;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Account identifier, assigned by the store
pub type AccountId = i64;

/// Longest account name accepted at creation
pub const MAX_NAME_LEN: usize = 50;

/// Kind of bank account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    /// Lowercase name used in storage and CSV output
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    /// Case-insensitive: `Checking` and `checking` are the same type
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            _ => Err(LedgerError::invalid_account_type(s)),
        }
    }
}

/// A named, uniquely identified balance
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Store-assigned identifier
    pub id: AccountId,

    /// Unique, non-empty name
    pub name: String,

    /// Current balance; may be negative (overdraft is not rejected here)
    pub balance: Decimal,

    /// Checking or savings
    pub account_type: AccountType,

    /// Free-text bank name
    pub bank: String,
}

impl Account {
    /// Subtract `amount` from the balance
    ///
    /// Pure arithmetic: no floor at zero and no check on the sign of
    /// `amount`. Amount validation happens when entries and transfers are
    /// created.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the new balance is not representable.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("debit", self.id))?;
        Ok(())
    }

    /// Add `amount` to the balance
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the new balance is not representable.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("credit", self.id))?;
        Ok(())
    }
}

/// Values needed to create an account
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub balance: Decimal,
    pub account_type: AccountType,
    pub bank: String,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        balance: Decimal,
        account_type: AccountType,
        bank: impl Into<String>,
    ) -> Self {
        NewAccount {
            name: name.into(),
            balance,
            account_type,
            bank: bank.into(),
        }
    }

    /// Normalize and check the request
    ///
    /// Trims name and bank, and rounds the opening balance to money scale.
    /// The opening balance may be negative.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if the trimmed name is empty or longer than
    /// [`MAX_NAME_LEN`] characters.
    pub fn validate(self) -> Result<NewAccount, LedgerError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::invalid_name(&self.name, "name must not be empty"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(LedgerError::invalid_name(
                &name,
                &format!("name must be at most {} characters", MAX_NAME_LEN),
            ));
        }

        Ok(NewAccount {
            name,
            balance: to_money(self.balance),
            account_type: self.account_type,
            bank: self.bank.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn account(balance: Decimal) -> Account {
        Account {
            id: 1,
            name: "Checking Account #0".to_string(),
            balance,
            account_type: AccountType::Checking,
            bank: "Chase".to_string(),
        }
    }

    #[test]
    fn test_debit_subtracts() {
        let mut acct = account(Decimal::new(100000, 2));
        acct.debit(Decimal::new(50000, 2)).unwrap();
        assert_eq!(acct.balance, Decimal::new(50000, 2));
    }

    #[test]
    fn test_credit_adds() {
        let mut acct = account(Decimal::new(100000, 2));
        acct.credit(Decimal::new(50000, 2)).unwrap();
        assert_eq!(acct.balance, Decimal::new(150000, 2));
    }

    #[test]
    fn test_debit_can_go_negative() {
        let mut acct = account(Decimal::new(1000, 2));
        acct.debit(Decimal::new(2500, 2)).unwrap();
        assert_eq!(acct.balance, Decimal::new(-1500, 2));
    }

    #[test]
    fn test_credit_overflow() {
        let mut acct = account(Decimal::MAX);
        let result = acct.credit(Decimal::ONE);
        assert_eq!(result, Err(LedgerError::arithmetic_overflow("credit", 1)));
        assert_eq!(acct.balance, Decimal::MAX);
    }

    #[test]
    fn test_debit_overflow() {
        let mut acct = account(Decimal::MIN);
        let result = acct.debit(Decimal::ONE);
        assert!(matches!(result, Err(LedgerError::ArithmeticOverflow { .. })));
        assert_eq!(acct.balance, Decimal::MIN);
    }

    #[rstest]
    #[case("checking", AccountType::Checking)]
    #[case("Checking", AccountType::Checking)]
    #[case(" SAVINGS ", AccountType::Savings)]
    fn test_account_type_parse(#[case] input: &str, #[case] expected: AccountType) {
        assert_eq!(input.parse::<AccountType>().unwrap(), expected);
    }

    #[rstest]
    #[case("credit")]
    #[case("")]
    #[case("investment")]
    fn test_account_type_parse_invalid(#[case] input: &str) {
        assert_eq!(
            input.parse::<AccountType>(),
            Err(LedgerError::invalid_account_type(input))
        );
    }

    #[test]
    fn test_new_account_validate_normalizes() {
        let request = NewAccount::new(
            "  Checking #0 ",
            Decimal::from(1000),
            AccountType::Checking,
            " Chase ",
        );
        let validated = request.validate().unwrap();
        assert_eq!(validated.name, "Checking #0");
        assert_eq!(validated.bank, "Chase");
        assert_eq!(validated.balance.to_string(), "1000.00");
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    #[case::too_long(&"x".repeat(MAX_NAME_LEN + 1))]
    fn test_new_account_validate_rejects_name(#[case] name: &str) {
        let request = NewAccount::new(name, Decimal::ZERO, AccountType::Savings, "Chase");
        assert!(matches!(
            request.validate(),
            Err(LedgerError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_new_account_accepts_max_length_name() {
        let name = "x".repeat(MAX_NAME_LEN);
        let request = NewAccount::new(name.clone(), Decimal::ZERO, AccountType::Savings, "Chase");
        assert_eq!(request.validate().unwrap().name, name);
    }

    proptest! {
        #[test]
        fn prop_debit_then_credit_restores_account(
            start in -1_000_000_000i64..1_000_000_000i64,
            cents in 0i64..1_000_000_000i64,
        ) {
            let original = account(Decimal::new(start, 2));
            let amount = Decimal::new(cents, 2);

            let mut acct = original.clone();
            acct.debit(amount).unwrap();
            acct.credit(amount).unwrap();

            prop_assert_eq!(acct, original);
        }
    }
}
