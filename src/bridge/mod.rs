//! Client side of the accounting application's local automation bridge.
//!
//! The desktop accounting application exposes its automation surface through
//! a bridge service on localhost. The wire format is JSONL (newline-delimited
//! JSON) over TCP: each request is one serialized [`Request`] line, answered
//! by exactly one [`Reply`] line. Every reply carries the application's
//! status pair: `status_code` zero means the operation was accepted,
//! anything else comes with a diagnostic `status_message`.
//!
//! The tools only ever consume the small slice of that surface captured by
//! the [`LedgerBridge`] trait: the company query, the two entity list
//! queries, and the two add-transaction calls.

pub mod client;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use client::{BridgeSession, DEFAULT_BRIDGE_ADDR};

/// The subset of the accounting application's automation surface used by the
/// tools. One implementation speaks the real bridge protocol
/// ([`BridgeSession`]); tests substitute scripted in-memory bridges.
pub trait LedgerBridge {
    /// Fetches the company information record.
    fn company_info(&mut self) -> Result<CompanyInfoRow>;

    /// Lists all employees, active and inactive, in the application's own
    /// result order.
    fn list_employees(&mut self) -> Result<Vec<EmployeeRow>>;

    /// Lists all payroll wage items in the application's own result order.
    fn list_wage_items(&mut self) -> Result<Vec<WageItemRow>>;

    /// Submits one check transaction. A reply with a non-zero status is a
    /// definitive rejection, not a transport error.
    fn add_check(&mut self, check: CheckAdd) -> Result<SubmitReply>;

    /// Submits one time-tracking entry. Same status semantics as
    /// [`add_check`](Self::add_check).
    fn add_time_entry(&mut self, entry: TimeEntryAdd) -> Result<SubmitReply>;
}

// =============================================================================
// Requests
// =============================================================================

/// Messages sent from the tools to the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Hello(HelloRequest),
    CompanyQuery,
    EmployeeQuery,
    WageItemQuery,
    CheckAdd(CheckAdd),
    TimeEntryAdd(TimeEntryAdd),
    Goodbye,
}

/// Session handshake identifying the connecting application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloRequest {
    pub app_id: String,
    pub app_name: String,
}

/// A check transaction paying one employee a flat earnings amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckAdd {
    /// Directory identifier of the payee employee.
    pub payee_list_id: String,
    pub txn_date: NaiveDate,
    pub is_to_be_printed: bool,
    pub memo: String,
    pub expense_line: ExpenseLine,
}

/// The single expense line carried by an earnings check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    /// Directory identifier of the resolved payroll wage item.
    pub account_list_id: String,
    pub amount: f64,
    pub memo: String,
}

/// A non-billable time-tracking entry booking hourly earnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntryAdd {
    /// Directory identifier of the employee the time is tracked for.
    pub entity_list_id: String,
    pub txn_date: NaiveDate,
    pub is_billable: bool,
    /// Directory identifier of the resolved payroll wage item.
    pub item_service_list_id: String,
    /// Whole hours of the duration.
    pub duration_hours: u16,
    /// Remaining minutes of the duration.
    pub duration_minutes: u16,
    pub rate: f64,
    pub notes: String,
}

// =============================================================================
// Replies
// =============================================================================

/// Messages sent from the bridge back to the tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Hello(StatusReply),
    Company(CompanyReply),
    Employees(EmployeeListReply),
    WageItems(WageItemListReply),
    Submit(SubmitReply),
    Goodbye(StatusReply),
}

impl Reply {
    /// Reply kind name used in diagnostics for mismatched replies.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Hello(_) => "hello",
            Reply::Company(_) => "company",
            Reply::Employees(_) => "employees",
            Reply::WageItems(_) => "wage_items",
            Reply::Submit(_) => "submit",
            Reply::Goodbye(_) => "goodbye",
        }
    }
}

/// Bare status pair for handshake and teardown replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReply {
    pub status_code: i32,
    #[serde(default)]
    pub status_message: String,
}

/// Reply to the company query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyReply {
    pub status_code: i32,
    #[serde(default)]
    pub status_message: String,
    pub company: Option<CompanyInfoRow>,
}

/// Reply to the employee list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeListReply {
    pub status_code: i32,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub employees: Vec<EmployeeRow>,
}

/// Reply to the wage item list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WageItemListReply {
    pub status_code: i32,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub wage_items: Vec<WageItemRow>,
}

/// Outcome of one add-transaction request. Status code zero means the
/// transaction was created and `txn_id` names it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReply {
    pub status_code: i32,
    #[serde(default)]
    pub status_message: String,
    pub txn_id: Option<String>,
}

// =============================================================================
// Query rows
// =============================================================================

/// Company information record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfoRow {
    pub company_name: String,
    pub legal_company_name: Option<String>,
    pub first_month_fiscal_year: Option<u32>,
    pub first_month_income_tax_year: Option<u32>,
}

/// One employee row as returned by the employee list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub list_id: String,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// One payroll wage item row as returned by the wage item list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WageItemRow {
    pub list_id: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
