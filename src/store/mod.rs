//! Ledger store implementations
//!
//! - `memory` - In-memory store with snapshot transactions (tests, benchmarks)
//! - `sqlite` - SQLite store used by the CLI

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{setup_schema, SqliteStore};
