//! Store configuration
//!
//! Built from CLI arguments (which also read `LEDGER_DATABASE` and
//! `LEDGER_BUSY_TIMEOUT_MS` from the environment). Invalid values fall back
//! to defaults with a warning instead of aborting.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Path that selects a private in-memory SQLite database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Default database file, relative to the working directory
pub const DEFAULT_DATABASE: &str = "ledger.db";

/// Default time a writer waits for a locked database
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Configuration for opening a SQLite ledger store
#[derive(Clone, Debug, PartialEq)]
pub struct StoreConfig {
    /// Database file, or `:memory:`
    pub database: PathBuf,
    /// How long to wait for another writer before failing
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

impl StoreConfig {
    /// Create a StoreConfig with custom values
    ///
    /// An empty path or a zero timeout is replaced by its default.
    pub fn new(database: PathBuf, busy_timeout_ms: u64) -> Self {
        let default = Self::default();

        let database = if database.as_os_str().is_empty() {
            warn!(
                "empty database path, using default ({})",
                default.database.display()
            );
            default.database
        } else {
            database
        };

        let busy_timeout = if busy_timeout_ms == 0 {
            warn!(
                "invalid busy timeout (0 ms), using default ({} ms)",
                DEFAULT_BUSY_TIMEOUT_MS
            );
            default.busy_timeout
        } else {
            Duration::from_millis(busy_timeout_ms)
        };

        Self {
            database,
            busy_timeout,
        }
    }

    /// Configuration for a throwaway in-memory database
    pub fn in_memory() -> Self {
        Self {
            database: PathBuf::from(IN_MEMORY_PATH),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database.as_os_str() == IN_MEMORY_PATH
    }
}
