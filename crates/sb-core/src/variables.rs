//! Variable maps, `key=value` parsing, and date helpers

use crate::error::{CoreError, CoreResult};
use chrono::{Duration, Local};

/// A mapping from variable name to value
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// Parse `key=value` arguments into string variables.
///
/// The value is everything after the first `=`, so `filter=a=b` yields
/// `filter -> "a=b"`. Later duplicates win.
pub fn parse_cli_variables<S: AsRef<str>>(args: &[S]) -> CoreResult<Variables> {
    let mut variables = Variables::new();
    for raw in args {
        let raw = raw.as_ref();
        let Some((key, value)) = raw.split_once('=') else {
            return Err(CoreError::InvalidVariable {
                raw: raw.to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CoreError::InvalidVariable {
                raw: raw.to_string(),
            });
        }
        variables.insert(
            key.to_string(),
            serde_json::Value::String(value.to_string()),
        );
    }
    Ok(variables)
}

/// The local date `n` days ago, formatted `YYYY-MM-DD`.
///
/// Negative `n` counts forward. Offsets past chrono's date range fail
/// with `DateOutOfRange`.
pub fn n_days_ago(n: i64) -> CoreResult<String> {
    Duration::try_days(n)
        .and_then(|offset| Local::now().checked_sub_signed(offset))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or(CoreError::DateOutOfRange { days: n })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_cli_variables() {
        let vars = parse_cli_variables(&["region=eu", "filter=a=b"]).unwrap();
        assert_eq!(vars["region"], json!("eu"));
        assert_eq!(vars["filter"], json!("a=b"));
    }

    #[test]
    fn test_parse_cli_variables_empty() {
        let vars = parse_cli_variables::<&str>(&[]).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn test_parse_cli_variables_malformed() {
        assert!(matches!(
            parse_cli_variables(&["novalue"]),
            Err(CoreError::InvalidVariable { .. })
        ));
        assert!(matches!(
            parse_cli_variables(&["=x"]),
            Err(CoreError::InvalidVariable { .. })
        ));
    }

    #[test]
    fn test_n_days_ago_format() {
        let today = n_days_ago(0).unwrap();
        assert_eq!(today, Local::now().format("%Y-%m-%d").to_string());
        assert_eq!(n_days_ago(4).unwrap().len(), 10);
        assert!(n_days_ago(4).unwrap() < today);
        assert!(n_days_ago(-1).unwrap() > today);
    }

    #[test]
    fn test_n_days_ago_out_of_range() {
        for days in [1_000_000_000, -1_000_000_000, i64::MAX, i64::MIN] {
            assert!(matches!(
                n_days_ago(days),
                Err(CoreError::DateOutOfRange { days: d }) if d == days
            ));
        }
    }
}
