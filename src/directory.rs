use tracing::{error, info, instrument};

use crate::bridge::LedgerBridge;
use crate::error::{Result, ToolError};
use crate::model::{Employee, WageItem};

/// Read-only snapshot of the entities an import run resolves against.
///
/// Both listings are fetched once when the run starts and keep the bridge's
/// query-result order. Substring matching is first-hit-wins over that order,
/// so reordering the source lists can change which entry a partial name
/// resolves to; preserving the order keeps runs reproducible.
#[derive(Debug, Clone, Default)]
pub struct EntityDirectory {
    employees: Vec<Employee>,
    wage_items: Vec<WageItem>,
}

impl EntityDirectory {
    pub fn new(employees: Vec<Employee>, wage_items: Vec<WageItem>) -> Self {
        Self {
            employees,
            wage_items,
        }
    }

    /// Fetches both listings over the bridge. A listing the application
    /// rejects with a non-zero query status degrades to an empty list: every
    /// record resolving against it is then skipped individually instead of
    /// the run aborting.
    #[instrument(level = "info", skip_all)]
    pub fn load<B: LedgerBridge>(bridge: &mut B) -> Result<Self> {
        let employees = match bridge.list_employees() {
            Ok(rows) => rows.into_iter().map(Employee::from).collect(),
            Err(ToolError::Query {
                status_code,
                message,
            }) => {
                error!(
                    status_code,
                    %message,
                    "employee query failed, continuing with an empty employee list"
                );
                Vec::new()
            }
            Err(error) => return Err(error),
        };

        let wage_items = match bridge.list_wage_items() {
            Ok(rows) => rows.into_iter().map(WageItem::from).collect(),
            Err(ToolError::Query {
                status_code,
                message,
            }) => {
                error!(
                    status_code,
                    %message,
                    "wage item query failed, continuing with an empty wage item list"
                );
                Vec::new()
            }
            Err(error) => return Err(error),
        };

        let directory = Self::new(employees, wage_items);
        info!(
            employees = directory.employees.len(),
            wage_items = directory.wage_items.len(),
            "entity directory loaded"
        );
        Ok(directory)
    }

    /// Employees in bridge query-result order.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Payroll wage items in bridge query-result order.
    pub fn wage_items(&self) -> &[WageItem] {
        &self.wage_items
    }
}
