//! Transaction-date handling for the import tools.

use chrono::{Local, NaiveDate};
use tracing::warn;

/// Date format accepted on the command line.
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parses an `MM/DD/YYYY` transaction date, defaulting to today's date when
/// the value is absent, blank, or unparsable.
pub fn resolve_txn_date(input: Option<&str>) -> NaiveDate {
    match input.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => match NaiveDate::parse_from_str(value, DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => {
                warn!(value, "invalid date format, using today's date instead");
                Local::now().date_naive()
            }
        },
        None => Local::now().date_naive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_dates_parse() {
        let date = resolve_txn_date(Some("06/13/2025"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 13).expect("valid date"));
    }

    #[test]
    fn blank_and_invalid_input_default_to_today() {
        let before = Local::now().date_naive();
        let from_none = resolve_txn_date(None);
        let from_blank = resolve_txn_date(Some("   "));
        let from_invalid = resolve_txn_date(Some("2025-06-13"));
        let after = Local::now().date_naive();

        for date in [from_none, from_blank, from_invalid] {
            assert!(date == before || date == after);
        }
    }
}
