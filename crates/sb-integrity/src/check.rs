//! Evaluation of one integrity query's rows

use crate::error::{IntegrityError, IntegrityResult};
use sb_db::Row;
use serde_json::Value;
use std::fmt;

/// Column every integrity row must carry
pub const PASSED_COLUMN: &str = "passed";

/// Outcome of one integrity check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Success,
    Failed,
    /// The query itself raised a database error
    Errored,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckStatus::Success => "success",
            CheckStatus::Failed => "FAILED",
            CheckStatus::Errored => "ERROR",
        })
    }
}

/// Rows returned by one integrity query
#[derive(Debug, Clone)]
pub struct IntegrityCheck {
    pub name: String,
    pub rows: Vec<Row>,
}

impl IntegrityCheck {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Whether every row's `passed` value is truthy.
    ///
    /// Zero rows pass. Any row missing the column is a schema error.
    pub fn has_passed(&self) -> IntegrityResult<bool> {
        self.ensure_passed_column()?;
        Ok(self.rows.iter().all(row_passed))
    }

    /// Number of rows whose `passed` value is truthy
    pub fn passed_count(&self) -> usize {
        self.rows.iter().filter(|row| row_passed(row)).count()
    }

    pub fn status(&self) -> IntegrityResult<CheckStatus> {
        Ok(if self.has_passed()? {
            CheckStatus::Success
        } else {
            CheckStatus::Failed
        })
    }

    /// Log `Status: <status>. k/n successfully passed.` and return the status
    pub fn log_summary(&self) -> IntegrityResult<CheckStatus> {
        let status = self.status()?;
        if self.rows.is_empty() {
            log::warn!("Integrity check '{}' returned no rows, counted as passed", self.name);
        }
        log::info!(
            "Status: {}. {}/{} successfully passed.",
            status,
            self.passed_count(),
            self.rows.len()
        );
        Ok(status)
    }

    /// Rows as a pipe table, columns in the first row's order
    pub fn format_rows(&self) -> String {
        let Some(first) = self.rows.first() else {
            return String::new();
        };
        let headers: Vec<&str> = first.column_names().collect();
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|h| row.get(h).map(display_value).unwrap_or_default())
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                cells
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |values: Vec<&str>| {
            let padded: Vec<String> = values
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!(" {:<w$} ", v, w = *w))
                .collect();
            format!("|{}|", padded.join("|"))
        };

        let mut out = vec![line(headers.clone())];
        let separator: Vec<String> = widths.iter().map(|w| format!(":{}", "-".repeat(w + 1))).collect();
        out.push(format!("|{}|", separator.join("|")));
        for row in &cells {
            out.push(line(row.iter().map(String::as_str).collect()));
        }
        out.join("\n")
    }

    fn ensure_passed_column(&self) -> IntegrityResult<()> {
        if self.rows.iter().all(|row| row.contains(PASSED_COLUMN)) {
            Ok(())
        } else {
            Err(IntegrityError::PassedFieldNotInQuery {
                step: self.name.clone(),
            })
        }
    }
}

fn row_passed(row: &Row) -> bool {
    row.get(PASSED_COLUMN).is_some_and(is_truthy)
}

/// Truthiness of a result value: null, false, zero and empty are false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "check_test.rs"]
mod tests;
