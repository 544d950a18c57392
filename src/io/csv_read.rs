//! Fail-soft ingestion of payroll earnings CSV exports.
//!
//! The exports these tools consume are naive comma-separated files: a header
//! line, then one record per line, no quoting or escaping. A line is usable
//! only if it has at least three comma-separated fields after trimming;
//! anything else is dropped with a warning and the rest of the file is still
//! read.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::Result;
use crate::model::{EarningsRecord, Pay};

/// Reads `(employee name, amount, category)` rows for the check importer.
pub fn read_flat_earnings(path: &Path) -> Result<Vec<EarningsRecord>> {
    read_records(path, parse_flat_pay)
}

/// Reads `(employee name, hourly rate, hours)` rows for the time importer.
pub fn read_hourly_earnings(path: &Path) -> Result<Vec<EarningsRecord>> {
    read_records(path, parse_hourly_pay)
}

fn read_records(path: &Path, parse_pay: fn(&[&str]) -> Option<Pay>) -> Result<Vec<EarningsRecord>> {
    let source = fs::read_to_string(path)?;
    let mut records = Vec::new();

    // First line is the header; line numbers reported below are 1-based.
    for (index, line) in source.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 3 {
            warn!(line = index + 1, content = line, "dropping row with too few fields");
            continue;
        }
        match parse_pay(&fields) {
            Some(pay) => records.push(EarningsRecord {
                employee_name: fields[0].to_string(),
                pay,
            }),
            None => warn!(
                line = index + 1,
                content = line,
                "dropping row with unparsable numeric fields"
            ),
        }
    }

    Ok(records)
}

fn parse_flat_pay(fields: &[&str]) -> Option<Pay> {
    let amount = fields[1].parse::<f64>().ok()?;
    Some(Pay::Flat {
        amount,
        category: fields[2].to_string(),
    })
}

fn parse_hourly_pay(fields: &[&str]) -> Option<Pay> {
    let rate = fields[1].parse::<f64>().ok()?;
    let hours = fields[2].parse::<f64>().ok()?;
    Some(Pay::Hourly { rate, hours })
}
