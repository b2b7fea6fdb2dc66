//! Date prefix resolution shared by the sheet binaries.

use chrono::{Datelike, Local, NaiveDate};

/// Resolve the filename date prefix: an explicit 8-digit argument wins,
/// then the `PUZZLE_DATE` environment variable, then today's date.
pub fn resolve_prefix(arg: Option<&str>) -> String {
    if let Some(arg) = arg {
        if arg.len() == 8 && arg.bytes().all(|b| b.is_ascii_digit()) {
            return arg.to_string();
        }
    }
    if let Ok(value) = std::env::var("PUZZLE_DATE") {
        return value;
    }
    Local::now().format("%Y%m%d").to_string()
}

/// Day count since the common era for the date the prefix names, so the
/// same prefix always selects the same date-driven variant. Falls back to
/// today when the prefix is not a calendar date.
pub fn day_number(prefix: &str) -> i64 {
    NaiveDate::parse_from_str(prefix, "%Y%m%d")
        .map(|d| i64::from(d.num_days_from_ce()))
        .unwrap_or_else(|_| i64::from(Local::now().num_days_from_ce()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_argument_wins_when_well_formed() {
        assert_eq!(resolve_prefix(Some("20260830")), "20260830");
    }

    #[test]
    fn malformed_arguments_are_ignored() {
        // Falls through to the environment or today; either way the
        // result is not the bad argument.
        assert_ne!(resolve_prefix(Some("2026-08")), "2026-08");
        assert_ne!(resolve_prefix(Some("abcdefgh")), "abcdefgh");
    }

    #[test]
    fn day_numbers_are_consecutive() {
        let a = day_number("20260830");
        let b = day_number("20260831");
        assert_eq!(b, a + 1);
    }
}
