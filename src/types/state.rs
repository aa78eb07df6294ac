//! Apply state shared by entries and transfers

use super::error::LedgerError;
use std::fmt;
use std::str::FromStr;

/// Where a record is in the record-then-apply lifecycle
///
/// The only transition is `Recorded -> Applied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordState {
    /// Persisted, balance not yet changed
    #[default]
    Recorded,
    /// Balance change has been made
    Applied,
}

impl RecordState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordState::Recorded => "recorded",
            RecordState::Applied => "applied",
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, RecordState::Applied)
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordState {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recorded" => Ok(RecordState::Recorded),
            "applied" => Ok(RecordState::Applied),
            other => Err(LedgerError::store(format!("unknown record state '{}'", other))),
        }
    }
}
