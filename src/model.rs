use crate::bridge::{EmployeeRow, WageItemRow};

/// One employee as listed by the accounting application. Immutable once the
/// directory snapshot is taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    /// Opaque identifier assigned by the accounting application.
    pub list_id: String,
    /// The name the accounting application displays for this employee.
    pub display_name: String,
    /// First name, when the employee record carries one.
    pub first_name: Option<String>,
    /// Last name, when the employee record carries one.
    pub last_name: Option<String>,
    /// Whether the employee is currently active. Matching ignores this; the
    /// diagnostics view reports it.
    pub is_active: bool,
}

impl Employee {
    /// The name used for full-name matching: `"first last"` when both parts
    /// are present, otherwise the display name.
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => self.display_name.clone(),
        }
    }
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            list_id: row.list_id,
            display_name: row.name,
            first_name: row.first_name.filter(|name| !name.is_empty()),
            last_name: row.last_name.filter(|name| !name.is_empty()),
            is_active: row.is_active,
        }
    }
}

/// One payroll wage item as listed by the accounting application.
#[derive(Debug, Clone, PartialEq)]
pub struct WageItem {
    /// Opaque identifier assigned by the accounting application.
    pub list_id: String,
    /// Item name, e.g. "Regular Pay" or "Sales Commission".
    pub name: String,
}

impl From<WageItemRow> for WageItem {
    fn from(row: WageItemRow) -> Self {
        Self {
            list_id: row.list_id,
            name: row.name,
        }
    }
}

/// The pay carried by one earnings record. The CSV variant being imported
/// determines which shape every record of the run uses.
#[derive(Debug, Clone, PartialEq)]
pub enum Pay {
    /// A flat amount tagged with an earnings category ("Bonus", "Commission").
    Flat { amount: f64, category: String },
    /// An hourly rate applied over a number of hours.
    Hourly { rate: f64, hours: f64 },
}

/// One normalized unit of earnings data derived from a CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct EarningsRecord {
    /// Employee name exactly as typed by the payroll operator. May be a first
    /// name only, a full name, or a fragment of either.
    pub employee_name: String,
    /// The pay to book for this employee.
    pub pay: Pay,
}
