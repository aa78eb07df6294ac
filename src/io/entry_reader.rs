//! Streaming CSV reader for entry import
//!
//! Yields one `ImportedEntry` per CSV row. Delegates format concerns to the
//! `csv_format` module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, missing header columns) are returned from `new()`
//! - Individual row errors are yielded as `Err` items so the caller can skip
//!   the row and continue
//! - Line numbers are included in row errors

use crate::io::csv_format::{convert_csv_record, CsvEntryRecord, ImportedEntry, ENTRY_IMPORT_HEADER};
use crate::types::LedgerError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// CSV reader over entry import rows
#[derive(Debug)]
pub struct EntryReader<R: Read> {
    reader: csv::Reader<R>,
    headers: StringRecord,
}

impl EntryReader<File> {
    /// Open an import file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened and `Csv` if its header
    /// lacks one of the import columns.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;
        Self::new(file)
    }
}

impl<R: Read> EntryReader<R> {
    /// Wrap any reader producing import CSV
    pub fn new(input: R) -> Result<Self, LedgerError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .flexible(true)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        for column in ENTRY_IMPORT_HEADER {
            if !headers.iter().any(|header| header == column) {
                return Err(LedgerError::Csv {
                    line: Some(1),
                    message: format!("missing column '{}'", column),
                });
            }
        }

        Ok(Self { reader, headers })
    }
}

impl<R: Read> Iterator for EntryReader<R> {
    type Item = Result<ImportedEntry, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = StringRecord::new();

        match self.reader.read_record(&mut row) {
            Ok(false) => None,
            Ok(true) => {
                let line = row.position().map(|pos| pos.line());
                Some(
                    row.deserialize::<CsvEntryRecord>(Some(&self.headers))
                        .map_err(|e| LedgerError::Csv {
                            line,
                            message: e.to_string(),
                        })
                        .and_then(|record| convert_csv_record(record, line)),
                )
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_reads_valid_rows() {
        let file = create_temp_csv(
            "description,date,type,amount,account\n\
             Car Repair,1961-09-05,debit,500,Checking #0\n\
             Paycheck,1961-09-05,credit,500.00,Checking #1\n",
        );

        let rows: Vec<ImportedEntry> = EntryReader::open(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].transaction_type, "debit");
        assert_eq!(rows[1].amount, Decimal::from(500));
        assert_eq!(rows[1].account_name, "Checking #1");
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let input = "account,amount,type,date,description\n\
                     Savings,1.5,credit,2024-01-31,Interest\n";
        let rows: Vec<_> = EntryReader::new(input.as_bytes()).unwrap().collect();

        let entry = rows[0].as_ref().unwrap();
        assert_eq!(entry.account_name, "Savings");
        assert_eq!(entry.description, "Interest");
    }

    #[test]
    fn test_bad_rows_are_reported_with_line_and_reading_continues() {
        let input = "description,date,type,amount,account\n\
                     ok,2024-01-01,debit,1,a\n\
                     bad date,yesterday,debit,1,a\n\
                     short row,2024-01-01\n\
                     ok again,2024-01-02,credit,2,a\n";

        let rows: Vec<_> = EntryReader::new(input.as_bytes()).unwrap().collect();

        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_ok());
        assert_eq!(
            rows[1],
            Err(LedgerError::Csv {
                line: Some(3),
                message: "invalid date 'yesterday'".to_string()
            })
        );
        assert!(matches!(rows[2], Err(LedgerError::Csv { line: Some(4), .. })));
        assert!(rows[3].is_ok());
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let result = EntryReader::new("description,date,amount,account\n".as_bytes());
        assert_eq!(
            result.err(),
            Some(LedgerError::Csv {
                line: Some(1),
                message: "missing column 'type'".to_string()
            })
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EntryReader::open(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(LedgerError::Io { .. })));
    }
}
