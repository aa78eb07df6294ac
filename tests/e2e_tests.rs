//! End-to-end integration tests
//!
//! These tests drive the `ledger` command layer against a SQLite database
//! in a temporary directory. Every command opens the database afresh, so
//! each step also checks that state survives a reopen.
//!
//! Import tests use fixtures in tests/fixtures/: an input.csv and the
//! expected CSV output for each import mode.

#[cfg(test)]
mod tests {
    use clap::Parser;
    use personal_ledger::cli::{self, CliArgs};
    use personal_ledger::LedgerError;
    use rstest::{fixture, rstest};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A ledger database inside a temp dir that lives as long as the test
    struct Ledger {
        _dir: TempDir,
        database: PathBuf,
    }

    impl Ledger {
        /// Run one command, returning its CSV output
        fn run(&self, args: &[&str]) -> Result<String, LedgerError> {
            let database = self.database.to_str().expect("temp path is utf-8");
            let mut argv = vec!["ledger", "--database", database];
            argv.extend_from_slice(args);

            let parsed = CliArgs::try_parse_from(argv)
                .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", args, e));

            let mut output = Vec::new();
            cli::run(&parsed, &mut output)?;
            Ok(String::from_utf8(output).expect("CSV output is utf-8"))
        }

        fn create_account(&self, name: &str, balance: &str) {
            self.run(&[
                "create-account",
                "--name",
                name,
                "--balance",
                balance,
                "--type",
                "checking",
                "--bank",
                "Chase",
            ])
            .unwrap_or_else(|e| panic!("Failed to create account {}: {}", name, e));
        }

        fn balance(&self, name: &str) -> String {
            let output = self.run(&["account", name]).unwrap();
            let row = output.lines().nth(1).expect("account row");
            row.rsplit(',').next().expect("balance column").to_string()
        }
    }

    #[fixture]
    fn ledger() -> Ledger {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let database = dir.path().join("ledger.db");
        Ledger {
            _dir: dir,
            database,
        }
    }

    #[rstest]
    #[case::debit("debit", "500.00")]
    #[case::credit("credit", "1500.00")]
    fn test_entry_moves_balance(
        ledger: Ledger,
        #[case] transaction_type: &str,
        #[case] expected: &str,
    ) {
        ledger.create_account("Checking #0", "1000");

        let output = ledger
            .run(&[
                "record-entry",
                "--description",
                "Car Repair",
                "--date",
                "1961-09-05",
                "--type",
                transaction_type,
                "--amount",
                "500",
                "--account",
                "Checking #0",
            ])
            .unwrap();
        assert!(output.ends_with(",recorded\n"), "unexpected output: {}", output);
        assert_eq!(ledger.balance("Checking #0"), "1000.00");

        let output = ledger.run(&["apply-entry", "1"]).unwrap();
        assert_eq!(
            output,
            format!("id,name,type,bank,balance\n1,Checking #0,checking,Chase,{}\n", expected)
        );
        assert_eq!(ledger.balance("Checking #0"), expected);
    }

    #[rstest]
    fn test_transfer_between_accounts(ledger: Ledger) {
        ledger.create_account("Checking #0", "1000");
        ledger.create_account("Checking #1", "1000");

        ledger
            .run(&[
                "record-transfer",
                "--description",
                "Test Transfer 0",
                "--date",
                "1961-09-05",
                "--amount",
                "50",
                "--from",
                "Checking #0",
                "--to",
                "Checking #1",
            ])
            .unwrap();

        let output = ledger.run(&["apply-transfer", "1"]).unwrap();
        assert_eq!(
            output,
            "id,name,type,bank,balance\n\
             1,Checking #0,checking,Chase,950.00\n\
             2,Checking #1,checking,Chase,1050.00\n"
        );

        let transfers = ledger.run(&["transfers", "--account", "Checking #1"]).unwrap();
        assert_eq!(
            transfers,
            "id,date,description,amount,from,to,state\n\
             1,1961-09-05,Test Transfer 0,50.00,Checking #0,Checking #1,applied\n"
        );
    }

    #[rstest]
    fn test_second_apply_is_rejected(ledger: Ledger) {
        ledger.create_account("Checking #0", "1000");
        ledger.create_account("Checking #1", "1000");
        ledger
            .run(&[
                "record-transfer",
                "--description",
                "Rent",
                "--date",
                "1961-09-05",
                "--amount",
                "50",
                "--from",
                "Checking #0",
                "--to",
                "Checking #1",
                "--apply",
            ])
            .unwrap();

        let result = ledger.run(&["apply-transfer", "1"]);

        assert!(matches!(result, Err(LedgerError::AlreadyApplied { .. })));
        assert_eq!(ledger.balance("Checking #0"), "950.00");
        assert_eq!(ledger.balance("Checking #1"), "1050.00");
    }

    #[rstest]
    fn test_duplicate_account_name(ledger: Ledger) {
        ledger.create_account("Savings", "10");

        let result = ledger.run(&[
            "create-account",
            "--name",
            " Savings ",
            "--balance",
            "0",
            "--bank",
            "Other",
        ]);

        assert!(matches!(result, Err(LedgerError::DuplicateName { .. })));
        let accounts = ledger.run(&["accounts"]).unwrap();
        assert_eq!(accounts.lines().count(), 2);
    }

    #[rstest]
    #[case::negative_amount("debit", "-5", "InvalidAmount")]
    #[case::unknown_type("refund", "5", "InvalidTransactionType")]
    fn test_rejected_entry_leaves_no_trace(
        ledger: Ledger,
        #[case] transaction_type: &str,
        #[case] amount: &str,
        #[case] expected_error: &str,
    ) {
        ledger.create_account("Checking #0", "1000");

        let result = ledger.run(&[
            "record-entry",
            "--description",
            "Bad",
            "--date",
            "1961-09-05",
            "--type",
            transaction_type,
            "--amount",
            amount,
            "--account",
            "Checking #0",
            "--apply",
        ]);

        let error = result.expect_err("entry should be rejected");
        assert!(
            format!("{:?}", error).starts_with(expected_error),
            "unexpected error: {:?}",
            error
        );
        assert_eq!(
            ledger.run(&["entries"]).unwrap(),
            "id,date,description,type,amount,account,state\n"
        );
        assert_eq!(ledger.balance("Checking #0"), "1000.00");
    }

    #[rstest]
    fn test_unknown_account_is_reported(ledger: Ledger) {
        let result = ledger.run(&["debit", "--account", "Nowhere", "--amount", "5"]);
        assert_eq!(result, Err(LedgerError::account_name_not_found("Nowhere")));
    }

    #[rstest]
    fn test_entries_listed_most_recent_first(ledger: Ledger) {
        ledger.create_account("Checking #0", "0");
        let rows = [
            ("First", "2024-01-02"),
            ("Older", "2024-01-01"),
            ("Second", "2024-01-02"),
        ];
        for (description, date) in rows {
            ledger
                .run(&[
                    "record-entry",
                    "--description",
                    description,
                    "--date",
                    date,
                    "--type",
                    "credit",
                    "--amount",
                    "1",
                    "--account",
                    "Checking #0",
                ])
                .unwrap();
        }

        let output = ledger.run(&["entries", "--account", "Checking #0"]).unwrap();
        let descriptions: Vec<&str> = output
            .lines()
            .skip(1)
            .map(|line| line.split(',').nth(2).unwrap())
            .collect();

        assert_eq!(descriptions, vec!["Second", "First", "Older"]);
    }

    /// Import fixture rows and compare the printed entries with an expected file
    #[rstest]
    #[case::applied(true, "expected_applied.csv", "1747.24")]
    #[case::recorded(false, "expected_recorded.csv", "1000.00")]
    fn test_import_fixture(
        ledger: Ledger,
        #[case] apply: bool,
        #[case] expected_file: &str,
        #[case] expected_balance: &str,
    ) {
        let fixture_dir = Path::new("tests/fixtures/import_statement");
        let input_path = fixture_dir.join("input.csv");
        let expected_path = fixture_dir.join(expected_file);
        assert!(input_path.exists(), "Input file not found: {}", input_path.display());

        ledger.create_account("Checking #0", "1000");

        let input = input_path.to_str().expect("fixture path is utf-8");
        let mut args = vec!["import-entries", input];
        if apply {
            args.push("--apply");
        }
        let actual_output = ledger
            .run(&args)
            .unwrap_or_else(|e| panic!("Failed to import entries: {}", e));

        let expected_output = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
            panic!(
                "Failed to read expected file {}: {}",
                expected_path.display(),
                e
            )
        });

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch (apply: {})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            apply, actual_output, expected_output
        );
        assert_eq!(ledger.balance("Checking #0"), expected_balance);
    }

    #[rstest]
    fn test_import_missing_file(ledger: Ledger) {
        let result = ledger.run(&["import-entries", "tests/fixtures/does_not_exist.csv"]);
        assert!(matches!(result, Err(LedgerError::Io { .. })));
    }
}
