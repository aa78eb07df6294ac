//! I/O module
//!
//! Handles CSV output and entry import.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `entry_reader` - Streaming reader for entry import files

pub mod csv_format;
pub mod entry_reader;

pub use csv_format::{
    convert_csv_record, write_accounts_csv, write_entries_csv, write_transfers_csv,
    CsvEntryRecord, ImportedEntry,
};
pub use entry_reader::EntryReader;
