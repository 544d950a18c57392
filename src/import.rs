//! The import pipeline: resolve each earnings record against the entity
//! directory and submit one transaction per record.

use chrono::NaiveDate;

use tracing::{error, info, instrument, warn};

use crate::bridge::{CheckAdd, ExpenseLine, LedgerBridge, SubmitReply, TimeEntryAdd};
use crate::directory::EntityDirectory;
use crate::error::Result;
use crate::model::{EarningsRecord, Pay};
use crate::resolve::{self, ResolvedWageItem};

/// Category resolved for hourly records, whose CSV rows carry no category of
/// their own.
const HOURLY_CATEGORY: &str = "Regular";

/// Terminal disposition of a single earnings record. Every record ends in
/// exactly one of these; none of them stops the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// No directory entry matched the employee name; the record was skipped.
    EmployeeNotFound { employee_name: String },
    /// No payroll wage item could be resolved for the record's category.
    WageItemNotFound { category: String },
    /// The accounting application accepted the transaction.
    Submitted { txn_id: Option<String> },
    /// The accounting application rejected the transaction with a definitive
    /// non-zero status.
    Rejected { status_code: i32, message: String },
    /// The submission never produced a definitive status.
    SubmitFailed { error: String },
}

impl RecordOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RecordOutcome::Submitted { .. })
    }
}

/// Aggregate result of one import run, with per-record outcomes in input
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub outcomes: Vec<RecordOutcome>,
}

/// Runs the import pipeline over `records` in input order.
///
/// Each record resolves its employee and wage item against the directory
/// snapshot and submits one transaction over the bridge. Failures of any
/// kind (unresolved names, rejected submissions, transport faults) are
/// recorded against the single record and processing moves on; the batch
/// never short-circuits. No retries.
#[instrument(level = "info", skip_all, fields(records = records.len(), txn_date = %txn_date))]
pub fn run_import<B: LedgerBridge>(
    bridge: &mut B,
    directory: &EntityDirectory,
    records: &[EarningsRecord],
    txn_date: NaiveDate,
) -> ImportSummary {
    // Hourly rows all book against the same category, so resolve it once per
    // run instead of once per record.
    let hourly_item = records
        .iter()
        .any(|record| matches!(record.pay, Pay::Hourly { .. }))
        .then(|| resolve_wage_item_logged(HOURLY_CATEGORY, directory))
        .flatten();

    let mut outcomes = Vec::with_capacity(records.len());
    for record in records {
        let outcome = import_record(bridge, directory, record, txn_date, hourly_item.as_ref());
        outcomes.push(outcome);
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    info!(attempted = records.len(), succeeded, "import finished");
    ImportSummary {
        attempted: records.len(),
        succeeded,
        outcomes,
    }
}

fn import_record<B: LedgerBridge>(
    bridge: &mut B,
    directory: &EntityDirectory,
    record: &EarningsRecord,
    txn_date: NaiveDate,
    hourly_item: Option<&ResolvedWageItem>,
) -> RecordOutcome {
    let Some(employee) = resolve::resolve_employee(&record.employee_name, directory.employees())
    else {
        warn!(
            employee = %record.employee_name,
            "employee not found, skipping record"
        );
        return RecordOutcome::EmployeeNotFound {
            employee_name: record.employee_name.clone(),
        };
    };
    info!(
        employee = %record.employee_name,
        matched = %employee.full_name,
        rule = ?employee.matched_by,
        "resolved employee"
    );

    match &record.pay {
        Pay::Flat { amount, category } => {
            let Some(item) = resolve_wage_item_logged(category, directory) else {
                return RecordOutcome::WageItemNotFound {
                    category: category.clone(),
                };
            };
            let check = CheckAdd {
                payee_list_id: employee.list_id,
                txn_date,
                is_to_be_printed: true,
                memo: format!("Earnings: {category}"),
                expense_line: ExpenseLine {
                    account_list_id: item.list_id,
                    amount: *amount,
                    memo: format!("{category} for {}", record.employee_name),
                },
            };
            info!(
                employee = %record.employee_name,
                category = %category,
                amount,
                "adding check"
            );
            interpret_submission(bridge.add_check(check))
        }
        Pay::Hourly { rate, hours } => {
            let Some(item) = hourly_item else {
                warn!(
                    employee = %record.employee_name,
                    "no payroll wage item available for hourly records, skipping record"
                );
                return RecordOutcome::WageItemNotFound {
                    category: HOURLY_CATEGORY.to_string(),
                };
            };
            let (duration_hours, duration_minutes) = split_duration(*hours);
            let entry = TimeEntryAdd {
                entity_list_id: employee.list_id,
                txn_date,
                is_billable: false,
                item_service_list_id: item.list_id.clone(),
                duration_hours,
                duration_minutes,
                rate: *rate,
                notes: format!("Imported earnings for {}", record.employee_name),
            };
            info!(
                employee = %record.employee_name,
                hours,
                rate,
                "adding time entry"
            );
            interpret_submission(bridge.add_time_entry(entry))
        }
    }
}

fn resolve_wage_item_logged(category: &str, directory: &EntityDirectory) -> Option<ResolvedWageItem> {
    let Some(resolved) = resolve::resolve_wage_item(category, directory.wage_items()) else {
        warn!(category, "no payroll wage item found for category");
        return None;
    };
    if resolved.matched_by.is_fallback() {
        warn!(
            category,
            item = %resolved.name,
            rule = ?resolved.matched_by,
            "no wage item matched the category, using fallback"
        );
    }
    Some(resolved)
}

fn interpret_submission(reply: Result<SubmitReply>) -> RecordOutcome {
    match reply {
        Ok(reply) if reply.status_code == 0 => {
            info!(
                txn_id = reply.txn_id.as_deref().unwrap_or("-"),
                "transaction accepted"
            );
            RecordOutcome::Submitted {
                txn_id: reply.txn_id,
            }
        }
        Ok(reply) => {
            error!(
                status_code = reply.status_code,
                message = %reply.status_message,
                "transaction rejected"
            );
            RecordOutcome::Rejected {
                status_code: reply.status_code,
                message: reply.status_message,
            }
        }
        Err(error) => {
            error!(%error, "submission failed");
            RecordOutcome::SubmitFailed {
                error: error.to_string(),
            }
        }
    }
}

/// Splits fractional hours into the whole-hours/minutes pair the bridge
/// expects, rounding the minute part.
fn split_duration(hours: f64) -> (u16, u16) {
    let whole = hours.floor();
    let minutes = ((hours - whole) * 60.0).round();
    (whole as u16, minutes as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_split_into_hours_and_rounded_minutes() {
        assert_eq!(split_duration(7.5), (7, 30));
        assert_eq!(split_duration(8.0), (8, 0));
        assert_eq!(split_duration(0.25), (0, 15));
        assert_eq!(split_duration(1.26), (1, 16));
    }
}
