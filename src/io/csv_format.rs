//! CSV format handling for ledger output and entry import
//!
//! This module centralizes all CSV format concerns, providing:
//! - `CsvEntryRecord` for deserializing imported entries
//! - Conversion from CSV records to `ImportedEntry`
//! - Account, entry and transfer output serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{format_money, Account, AccountId, Entry, LedgerError, Transfer};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Write;
use std::str::FromStr;

/// Header row expected in entry import files
pub const ENTRY_IMPORT_HEADER: [&str; 5] = ["description", "date", "type", "amount", "account"];

/// CSV record structure for entry import
///
/// Matches the columns: description, date, type, amount, account. The
/// account column holds an account name.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvEntryRecord {
    pub description: String,
    pub date: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub amount: String,
    pub account: String,
}

/// An entry read from an import file, before account resolution
///
/// The transaction type is kept as written; the engine decides whether it
/// is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedEntry {
    pub description: String,
    pub date: NaiveDate,
    pub transaction_type: String,
    pub amount: Decimal,
    pub account_name: String,
}

/// Convert a CsvEntryRecord to an ImportedEntry
///
/// Parses the date (`YYYY-MM-DD`) and the amount. Sign and transaction
/// type are checked later, at entry creation.
///
/// # Errors
///
/// Returns a `Csv` error (tagged with `line`, when known) if the date or
/// amount cannot be parsed or the account name is blank.
pub fn convert_csv_record(
    record: CsvEntryRecord,
    line: Option<u64>,
) -> Result<ImportedEntry, LedgerError> {
    let csv_error = |message: String| LedgerError::Csv { line, message };

    let date = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d")
        .map_err(|_| csv_error(format!("invalid date '{}'", record.date)))?;

    let amount = Decimal::from_str(record.amount.trim())
        .map_err(|_| csv_error(format!("invalid amount '{}'", record.amount)))?;

    let account_name = record.account.trim().to_string();
    if account_name.is_empty() {
        return Err(csv_error("missing account name".to_string()));
    }

    Ok(ImportedEntry {
        description: record.description,
        date,
        transaction_type: record.transaction_type.trim().to_string(),
        amount,
        account_name,
    })
}

/// Write accounts to CSV format
///
/// Columns: id, name, type, bank, balance. Accounts are sorted by id for
/// deterministic output.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "name", "type", "bank", "balance"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer.write_record(&[
            account.id.to_string(),
            account.name,
            account.account_type.to_string(),
            account.bank,
            format_money(account.balance),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write entries to CSV format, in the order given
///
/// Columns: id, date, description, type, amount, account, state. The
/// account column shows the account name when it is found in `accounts`,
/// the id otherwise.
pub fn write_entries_csv(
    entries: &[Entry],
    accounts: &[Account],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let names = account_names(accounts);
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "date", "description", "type", "amount", "account", "state"])?;

    for entry in entries {
        writer.write_record(&[
            entry.id.to_string(),
            entry.date.to_string(),
            entry.description.clone(),
            entry.transaction_type.to_string(),
            format_money(entry.amount),
            display_account(&names, entry.account),
            entry.state.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write transfers to CSV format, in the order given
///
/// Columns: id, date, description, amount, from, to, state.
pub fn write_transfers_csv(
    transfers: &[Transfer],
    accounts: &[Account],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let names = account_names(accounts);
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "date", "description", "amount", "from", "to", "state"])?;

    for transfer in transfers {
        writer.write_record(&[
            transfer.id.to_string(),
            transfer.date.to_string(),
            transfer.description.clone(),
            format_money(transfer.amount),
            display_account(&names, transfer.from_account),
            display_account(&names, transfer.to_account),
            transfer.state.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn account_names(accounts: &[Account]) -> HashMap<AccountId, &str> {
    accounts
        .iter()
        .map(|account| (account.id, account.name.as_str()))
        .collect()
}

fn display_account(names: &HashMap<AccountId, &str>, id: AccountId) -> String {
    names
        .get(&id)
        .map(|name| name.to_string())
        .unwrap_or_else(|| id.to_string())
}
