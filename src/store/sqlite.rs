//! SQLite ledger store
//!
//! Persists accounts, entries and transfers in three tables. The schema is
//! created on open and carries the value constraints of the ledger:
//! - `accounts.name` is `UNIQUE`
//! - `entries.transaction_type` must be `debit` or `credit`
//! - amounts must not be negative
//! - entries and transfers reference existing accounts
//!
//! Money is stored as decimal text so balances keep their exact two
//! fractional digits. Dates are stored as `YYYY-MM-DD`, which sorts
//! chronologically as text.
//!
//! Store transactions use `BEGIN IMMEDIATE`: the write lock is taken up
//! front, so two processes cannot interleave a balance read-modify-write.

use crate::config::StoreConfig;
use crate::core::traits::LedgerStore;
use crate::types::{
    Account, AccountId, AccountType, Entry, EntryDraft, EntryId, LedgerError, NewAccount,
    RecordState, TransactionType, Transfer, TransferDraft, TransferId,
};
use chrono::NaiveDate;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

const ACCOUNT_COLUMNS: &str = "id, name, balance, account_type, bank";
const ENTRY_COLUMNS: &str = "id, description, date, transaction_type, amount, account_id, state";
const TRANSFER_COLUMNS: &str =
    "id, description, date, amount, from_account_id, to_account_id, state";

/// Ledger store backed by a SQLite database
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    in_transaction: bool,
}

impl SqliteStore {
    /// Open (or create) the database described by `config`
    pub fn open(config: &StoreConfig) -> Result<Self, LedgerError> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            let conn = Connection::open(&config.database)?;
            // WAL for crash recovery on file databases; the pragma answers
            // with the mode now in effect.
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            debug!(journal_mode = %mode, "journal mode set");
            conn
        };
        conn.busy_timeout(config.busy_timeout)?;

        debug!(database = %config.database.display(), "opened ledger database");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, LedgerError> {
        Self::open(&StoreConfig::in_memory())
    }

    /// Wrap an existing connection, creating the schema if needed
    pub fn from_connection(conn: Connection) -> Result<Self, LedgerError> {
        setup_schema(&conn)?;
        Ok(SqliteStore {
            conn,
            in_transaction: false,
        })
    }

    /// The underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Create the ledger tables and indexes if they do not exist
pub fn setup_schema(conn: &Connection) -> Result<(), LedgerError> {
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE CHECK (length(name) BETWEEN 1 AND 50),
            balance TEXT NOT NULL,
            account_type TEXT NOT NULL CHECK (account_type IN ('checking', 'savings')),
            bank TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            transaction_type TEXT NOT NULL CHECK (transaction_type IN ('debit', 'credit')),
            amount TEXT NOT NULL CHECK (CAST(amount AS REAL) >= 0),
            account_id INTEGER NOT NULL REFERENCES accounts(id),
            state TEXT NOT NULL DEFAULT 'recorded' CHECK (state IN ('recorded', 'applied'))
        );

        CREATE TABLE IF NOT EXISTS transfers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            amount TEXT NOT NULL CHECK (CAST(amount AS REAL) >= 0),
            from_account_id INTEGER NOT NULL REFERENCES accounts(id),
            to_account_id INTEGER NOT NULL REFERENCES accounts(id),
            state TEXT NOT NULL DEFAULT 'recorded' CHECK (state IN ('recorded', 'applied'))
        );

        CREATE INDEX IF NOT EXISTS idx_entries_account ON entries(account_id);
        CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
        CREATE INDEX IF NOT EXISTS idx_transfers_from ON transfers(from_account_id);
        CREATE INDEX IF NOT EXISTS idx_transfers_to ON transfers(to_account_id);
        CREATE INDEX IF NOT EXISTS idx_transfers_date ON transfers(date);",
    )?;

    Ok(())
}

// Rows are read as raw text and converted afterwards, so a malformed value
// surfaces as the matching LedgerError rather than a generic SQL error.

struct AccountRow {
    id: AccountId,
    name: String,
    balance: String,
    account_type: String,
    bank: String,
}

struct EntryRow {
    id: EntryId,
    description: String,
    date: String,
    transaction_type: String,
    amount: String,
    account: AccountId,
    state: String,
}

struct TransferRow {
    id: TransferId,
    description: String,
    date: String,
    amount: String,
    from_account: AccountId,
    to_account: AccountId,
    state: String,
}

fn account_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        id: row.get(0)?,
        name: row.get(1)?,
        balance: row.get(2)?,
        account_type: row.get(3)?,
        bank: row.get(4)?,
    })
}

fn entry_row(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        id: row.get(0)?,
        description: row.get(1)?,
        date: row.get(2)?,
        transaction_type: row.get(3)?,
        amount: row.get(4)?,
        account: row.get(5)?,
        state: row.get(6)?,
    })
}

fn transfer_row(row: &Row<'_>) -> rusqlite::Result<TransferRow> {
    Ok(TransferRow {
        id: row.get(0)?,
        description: row.get(1)?,
        date: row.get(2)?,
        amount: row.get(3)?,
        from_account: row.get(4)?,
        to_account: row.get(5)?,
        state: row.get(6)?,
    })
}

fn parse_decimal(value: &str) -> Result<Decimal, LedgerError> {
    Decimal::from_str(value)
        .map_err(|e| LedgerError::store(format!("invalid stored amount '{}': {}", value, e)))
}

fn parse_date(value: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| LedgerError::store(format!("invalid stored date '{}': {}", value, e)))
}

impl TryFrom<AccountRow> for Account {
    type Error = LedgerError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: row.id,
            name: row.name,
            balance: parse_decimal(&row.balance)?,
            account_type: AccountType::from_str(&row.account_type)?,
            bank: row.bank,
        })
    }
}

impl TryFrom<EntryRow> for Entry {
    type Error = LedgerError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        Ok(Entry {
            id: row.id,
            description: row.description,
            date: parse_date(&row.date)?,
            transaction_type: TransactionType::from_str(&row.transaction_type)?,
            amount: parse_decimal(&row.amount)?,
            account: row.account,
            state: RecordState::from_str(&row.state)?,
        })
    }
}

impl TryFrom<TransferRow> for Transfer {
    type Error = LedgerError;

    fn try_from(row: TransferRow) -> Result<Self, Self::Error> {
        Ok(Transfer {
            id: row.id,
            description: row.description,
            date: parse_date(&row.date)?,
            amount: parse_decimal(&row.amount)?,
            from_account: row.from_account,
            to_account: row.to_account,
            state: RecordState::from_str(&row.state)?,
        })
    }
}

/// Extended result code of a constraint failure, if `error` is one
fn constraint_code(error: &rusqlite::Error) -> Option<i32> {
    match error {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(err.extended_code)
        }
        _ => None,
    }
}

impl LedgerStore for SqliteStore {
    fn begin(&mut self) -> Result<(), LedgerError> {
        if self.in_transaction {
            return Err(LedgerError::TransactionInProgress);
        }
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        self.in_transaction = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), LedgerError> {
        if !self.in_transaction {
            return Err(LedgerError::NoActiveTransaction);
        }
        self.conn.execute_batch("COMMIT")?;
        self.in_transaction = false;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), LedgerError> {
        if !self.in_transaction {
            return Err(LedgerError::NoActiveTransaction);
        }
        self.in_transaction = false;
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    fn insert_account(&mut self, account: NewAccount) -> Result<Account, LedgerError> {
        let result = self.conn.execute(
            "INSERT INTO accounts (name, balance, account_type, bank) VALUES (?1, ?2, ?3, ?4)",
            params![
                account.name,
                account.balance.to_string(),
                account.account_type.as_str(),
                account.bank,
            ],
        );

        match result {
            Ok(_) => Ok(Account {
                id: self.conn.last_insert_rowid(),
                name: account.name,
                balance: account.balance,
                account_type: account.account_type,
                bank: account.bank,
            }),
            Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                Err(LedgerError::duplicate_name(&account.name))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn account(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        let sql = format!("SELECT {} FROM accounts WHERE id = ?1", ACCOUNT_COLUMNS);
        self.conn
            .query_row(&sql, params![id], account_row)
            .optional()?
            .map(Account::try_from)
            .transpose()
    }

    fn account_by_name(&self, name: &str) -> Result<Option<Account>, LedgerError> {
        let sql = format!("SELECT {} FROM accounts WHERE name = ?1", ACCOUNT_COLUMNS);
        self.conn
            .query_row(&sql, params![name], account_row)
            .optional()?
            .map(Account::try_from)
            .transpose()
    }

    fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let sql = format!("SELECT {} FROM accounts ORDER BY id", ACCOUNT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], account_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(Account::try_from).collect()
    }

    fn update_balance(&mut self, id: AccountId, balance: Decimal) -> Result<(), LedgerError> {
        let changed = self.conn.execute(
            "UPDATE accounts SET balance = ?1 WHERE id = ?2",
            params![balance.to_string(), id],
        )?;
        if changed == 0 {
            return Err(LedgerError::account_not_found(id));
        }
        Ok(())
    }

    fn insert_entry(&mut self, entry: EntryDraft) -> Result<Entry, LedgerError> {
        let result = self.conn.execute(
            "INSERT INTO entries (description, date, transaction_type, amount, account_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.description,
                entry.date.format(DATE_FORMAT).to_string(),
                entry.transaction_type.as_str(),
                entry.amount.to_string(),
                entry.account,
            ],
        );

        match result {
            Ok(_) => Ok(Entry {
                id: self.conn.last_insert_rowid(),
                description: entry.description,
                date: entry.date,
                transaction_type: entry.transaction_type,
                amount: entry.amount,
                account: entry.account,
                state: RecordState::Recorded,
            }),
            Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                Err(LedgerError::account_not_found(entry.account))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn entry(&self, id: EntryId) -> Result<Option<Entry>, LedgerError> {
        let sql = format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS);
        self.conn
            .query_row(&sql, params![id], entry_row)
            .optional()?
            .map(Entry::try_from)
            .transpose()
    }

    fn entries(&self, account: Option<AccountId>) -> Result<Vec<Entry>, LedgerError> {
        let sql = format!(
            "SELECT {} FROM entries
             WHERE (?1 IS NULL OR account_id = ?1)
             ORDER BY date DESC, id DESC",
            ENTRY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![account], entry_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(Entry::try_from).collect()
    }

    fn mark_entry_applied(&mut self, id: EntryId) -> Result<(), LedgerError> {
        let changed = self.conn.execute(
            "UPDATE entries SET state = 'applied' WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Err(LedgerError::EntryNotFound { id });
        }
        Ok(())
    }

    fn insert_transfer(&mut self, transfer: TransferDraft) -> Result<Transfer, LedgerError> {
        let result = self.conn.execute(
            "INSERT INTO transfers (description, date, amount, from_account_id, to_account_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                transfer.description,
                transfer.date.format(DATE_FORMAT).to_string(),
                transfer.amount.to_string(),
                transfer.from_account,
                transfer.to_account,
            ],
        );

        match result {
            Ok(_) => Ok(Transfer {
                id: self.conn.last_insert_rowid(),
                description: transfer.description,
                date: transfer.date,
                amount: transfer.amount,
                from_account: transfer.from_account,
                to_account: transfer.to_account,
                state: RecordState::Recorded,
            }),
            Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                // SQLite does not say which side is missing
                let missing = if self.account(transfer.from_account)?.is_none() {
                    transfer.from_account
                } else {
                    transfer.to_account
                };
                Err(LedgerError::account_not_found(missing))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn transfer(&self, id: TransferId) -> Result<Option<Transfer>, LedgerError> {
        let sql = format!("SELECT {} FROM transfers WHERE id = ?1", TRANSFER_COLUMNS);
        self.conn
            .query_row(&sql, params![id], transfer_row)
            .optional()?
            .map(Transfer::try_from)
            .transpose()
    }

    fn transfers(&self, account: Option<AccountId>) -> Result<Vec<Transfer>, LedgerError> {
        let sql = format!(
            "SELECT {} FROM transfers
             WHERE (?1 IS NULL OR from_account_id = ?1 OR to_account_id = ?1)
             ORDER BY date DESC, id DESC",
            TRANSFER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![account], transfer_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(Transfer::try_from).collect()
    }

    fn mark_transfer_applied(&mut self, id: TransferId) -> Result<(), LedgerError> {
        let changed = self.conn.execute(
            "UPDATE transfers SET state = 'applied' WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Err(LedgerError::TransferNotFound { id });
        }
        Ok(())
    }
}
