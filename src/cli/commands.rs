//! Command dispatch
//!
//! Each subcommand resolves account names, calls one engine operation and
//! writes the affected rows as CSV. Dispatch is generic over the store so
//! the same code runs against SQLite in production and memory in tests.

use crate::cli::args::Command;
use crate::core::{LedgerEngine, LedgerStore};
use crate::io::{
    write_accounts_csv, write_entries_csv, write_transfers_csv, EntryReader, ImportedEntry,
};
use crate::types::{Entry, LedgerError, NewAccount, NewEntry, NewTransfer};
use std::io::{Read, Write};
use tracing::{info, warn};

/// Outcome of an entry import
#[derive(Debug, Default)]
pub struct ImportSummary {
    /// Entries recorded (and applied, when requested), in file order
    pub imported: Vec<Entry>,
    /// Rows that were logged and skipped
    pub skipped: usize,
}

/// Run one command against the engine, writing its result to `output`
pub fn execute<S: LedgerStore>(
    engine: &mut LedgerEngine<S>,
    command: &Command,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    match command {
        Command::CreateAccount {
            name,
            balance,
            account_type,
            bank,
        } => {
            let account = engine.create_account(NewAccount::new(
                name.as_str(),
                *balance,
                *account_type,
                bank.as_str(),
            ))?;
            write_accounts_csv(&[account], output)
        }
        Command::Accounts => write_accounts_csv(&engine.accounts()?, output),
        Command::Account { name } => write_accounts_csv(&[engine.account_by_name(name)?], output),
        Command::Debit { account, amount } => {
            let id = engine.account_by_name(account)?.id;
            let account = engine.debit(id, *amount)?;
            write_accounts_csv(&[account], output)
        }
        Command::Credit { account, amount } => {
            let id = engine.account_by_name(account)?.id;
            let account = engine.credit(id, *amount)?;
            write_accounts_csv(&[account], output)
        }
        Command::RecordEntry {
            description,
            date,
            transaction_type,
            amount,
            account,
            apply,
        } => {
            let account_id = engine.account_by_name(account)?.id;
            let request = NewEntry::new(
                description.as_str(),
                *date,
                transaction_type.as_str(),
                *amount,
                account_id,
            );
            let entry = if *apply {
                engine.record_and_apply_entry(request)?.0
            } else {
                engine.create_entry(request)?
            };
            write_entries_csv(&[entry], &engine.accounts()?, output)
        }
        Command::ApplyEntry { id } => {
            let account = engine.apply_entry(*id)?;
            write_accounts_csv(&[account], output)
        }
        Command::Entry { id } => {
            write_entries_csv(&[engine.entry(*id)?], &engine.accounts()?, output)
        }
        Command::Entries { account } => {
            let filter = match account {
                Some(name) => Some(engine.account_by_name(name)?.id),
                None => None,
            };
            write_entries_csv(&engine.entries(filter)?, &engine.accounts()?, output)
        }
        Command::RecordTransfer {
            description,
            date,
            amount,
            from,
            to,
            apply,
        } => {
            let from_id = engine.account_by_name(from)?.id;
            let to_id = engine.account_by_name(to)?.id;
            let request = NewTransfer::new(description.as_str(), *date, *amount, from_id, to_id);
            let transfer = if *apply {
                engine.record_and_apply_transfer(request)?.0
            } else {
                engine.create_transfer(request)?
            };
            write_transfers_csv(&[transfer], &engine.accounts()?, output)
        }
        Command::ApplyTransfer { id } => {
            let (from, to) = engine.apply_transfer(*id)?;
            if from.id == to.id {
                write_accounts_csv(&[from], output)
            } else {
                write_accounts_csv(&[from, to], output)
            }
        }
        Command::Transfer { id } => {
            write_transfers_csv(&[engine.transfer(*id)?], &engine.accounts()?, output)
        }
        Command::Transfers { account } => {
            let filter = match account {
                Some(name) => Some(engine.account_by_name(name)?.id),
                None => None,
            };
            write_transfers_csv(&engine.transfers(filter)?, &engine.accounts()?, output)
        }
        Command::ImportEntries { file, apply } => {
            let reader = EntryReader::open(file)?;
            let summary = import_entries(engine, reader, *apply)?;
            write_entries_csv(&summary.imported, &engine.accounts()?, output)
        }
    }
}

/// Record every row of an import, skipping rows that cannot be recorded
///
/// Each row is its own store transaction. Malformed rows, unknown accounts
/// and rejected values are logged and skipped; store failures abort the
/// import (rows already recorded stay recorded).
pub fn import_entries<S: LedgerStore, R: Read>(
    engine: &mut LedgerEngine<S>,
    reader: EntryReader<R>,
    apply: bool,
) -> Result<ImportSummary, LedgerError> {
    let mut summary = ImportSummary::default();

    for (row, result) in reader.enumerate() {
        match import_row(engine, result, apply) {
            Ok(entry) => summary.imported.push(entry),
            Err(e) if is_skippable(&e) => {
                warn!(row = row + 1, error = %e, "skipping import row");
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        imported = summary.imported.len(),
        skipped = summary.skipped,
        "import finished"
    );
    Ok(summary)
}

fn import_row<S: LedgerStore>(
    engine: &mut LedgerEngine<S>,
    row: Result<ImportedEntry, LedgerError>,
    apply: bool,
) -> Result<Entry, LedgerError> {
    let imported = row?;
    let account = engine.account_by_name(&imported.account_name)?;
    let request = NewEntry::new(
        imported.description,
        imported.date,
        imported.transaction_type,
        imported.amount,
        account.id,
    );

    if apply {
        Ok(engine.record_and_apply_entry(request)?.0)
    } else {
        engine.create_entry(request)
    }
}

fn is_skippable(error: &LedgerError) -> bool {
    error.is_validation()
        || matches!(
            error,
            LedgerError::Csv { .. }
                | LedgerError::AccountNotFound { .. }
                | LedgerError::ArithmeticOverflow { .. }
        )
}
