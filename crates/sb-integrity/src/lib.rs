//! sb-integrity - Integrity checks for SQLBucket
//!
//! Each integrity template renders to a query whose rows carry a boolean
//! `passed` column. A check passes when every row passes; checks are
//! independent, so a failing or erroring one never stops its siblings.

pub mod check;
pub mod checker;
pub mod error;

pub use check::{is_truthy, CheckStatus, IntegrityCheck, PASSED_COLUMN};
pub use checker::{CheckResult, IntegrityChecker, IntegritySummary};
pub use error::{IntegrityError, IntegrityResult};
