//! Benchmark suite for recording and applying ledger operations
//!
//! Compares the in-memory store with SQLite (in-memory database) using the
//! divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```
//!
//! Each run works on two accounts and applies `n` entries or transfers,
//! every one in its own store transaction.

use chrono::NaiveDate;
use personal_ledger::{
    AccountType, LedgerEngine, LedgerStore, MemoryStore, NewAccount, NewEntry, NewTransfer,
    SqliteStore,
};
use rust_decimal::Decimal;

fn main() {
    divan::main();
}

const SIZES: &[usize] = &[100, 1_000];

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1961, 9, 5).expect("valid date")
}

fn seeded<S: LedgerStore>(store: S) -> LedgerEngine<S> {
    let mut engine = LedgerEngine::new(store);
    for name in ["Checking #0", "Checking #1"] {
        engine
            .create_account(NewAccount::new(
                name,
                Decimal::from(1000),
                AccountType::Checking,
                "Chase",
            ))
            .expect("Account creation failed");
    }
    engine
}

fn apply_entries<S: LedgerStore>(engine: &mut LedgerEngine<S>, n: usize) {
    for i in 0..n {
        let transaction_type = if i % 2 == 0 { "debit" } else { "credit" };
        engine
            .record_and_apply_entry(NewEntry::new(
                "Groceries",
                date(),
                transaction_type,
                Decimal::new(1999, 2),
                1,
            ))
            .expect("Entry failed");
    }
}

fn apply_transfers<S: LedgerStore>(engine: &mut LedgerEngine<S>, n: usize) {
    for _ in 0..n {
        engine
            .record_and_apply_transfer(NewTransfer::new("Rent", date(), Decimal::from(50), 1, 2))
            .expect("Transfer failed");
    }
}

/// Entries against the in-memory store
#[divan::bench(args = SIZES)]
fn memory_entries(bencher: divan::Bencher, n: usize) {
    bencher
        .with_inputs(|| seeded(MemoryStore::new()))
        .bench_local_values(|mut engine| apply_entries(&mut engine, n));
}

/// Entries against SQLite
#[divan::bench(args = SIZES)]
fn sqlite_entries(bencher: divan::Bencher, n: usize) {
    bencher
        .with_inputs(|| seeded(SqliteStore::open_in_memory().expect("SQLite open failed")))
        .bench_local_values(|mut engine| apply_entries(&mut engine, n));
}

/// Transfers against the in-memory store
#[divan::bench(args = SIZES)]
fn memory_transfers(bencher: divan::Bencher, n: usize) {
    bencher
        .with_inputs(|| seeded(MemoryStore::new()))
        .bench_local_values(|mut engine| apply_transfers(&mut engine, n));
}

/// Transfers against SQLite
#[divan::bench(args = SIZES)]
fn sqlite_transfers(bencher: divan::Bencher, n: usize) {
    bencher
        .with_inputs(|| seeded(SqliteStore::open_in_memory().expect("SQLite open failed")))
        .bench_local_values(|mut engine| apply_transfers(&mut engine, n));
}
