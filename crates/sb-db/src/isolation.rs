//! Connection-level isolation setting

use crate::error::DbError;
use std::fmt;
use std::str::FromStr;

/// Isolation level requested for a run's session.
///
/// `Autocommit` commits every statement on its own. Every other level
/// opens a single transaction right after connecting, committed once the
/// last step succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    #[default]
    Autocommit,
    Serializable,
    RepeatableRead,
    ReadCommitted,
    ReadUncommitted,
    Snapshot,
}

impl IsolationLevel {
    /// Whether this level wraps the run in one transaction
    pub fn is_transactional(self) -> bool {
        !matches!(self, IsolationLevel::Autocommit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IsolationLevel::Autocommit => "AUTOCOMMIT",
            IsolationLevel::Serializable => "SERIALIZABLE",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::Snapshot => "SNAPSHOT",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IsolationLevel {
    type Err = DbError;

    /// Case-insensitive; `_` and runs of spaces are accepted between words
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .replace('_', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        match normalized.as_str() {
            "AUTOCOMMIT" => Ok(IsolationLevel::Autocommit),
            "SERIALIZABLE" => Ok(IsolationLevel::Serializable),
            "REPEATABLE READ" => Ok(IsolationLevel::RepeatableRead),
            "READ COMMITTED" => Ok(IsolationLevel::ReadCommitted),
            "READ UNCOMMITTED" => Ok(IsolationLevel::ReadUncommitted),
            "SNAPSHOT" => Ok(IsolationLevel::Snapshot),
            _ => Err(DbError::InvalidIsolationLevel(s.to_string())),
        }
    }
}
