//! Matching free-text names from payroll exports against the entity
//! directory.
//!
//! Payroll operators type whatever identifies an employee to *them*: a first
//! name, a full name, or a fragment of either. Pay categories rarely match
//! the accounting application's wage item names letter for letter. Both
//! resolvers run an ordered cascade of strategies, first hit wins, and report
//! which strategy matched so callers can warn on the best-effort ones. All
//! comparisons are case-insensitive and ordinal; no locale-aware folding.

use crate::model::{Employee, WageItem};

/// Ordered wage item name candidates per canonical earnings category. The
/// literal category from the CSV is always tried as a final candidate, so the
/// table only needs the spellings that differ from it.
const CATEGORY_SYNONYMS: &[(&str, &[&str])] = &[
    ("Commission", &["Commission", "Sales Commission", "Commissions"]),
    ("Bonus", &["Bonus", "Bonuses", "Employee Bonus"]),
    ("Salary", &["Salary", "Regular Salary", "Base Salary"]),
    ("Regular", &["Regular Pay", "Hourly Rate", "Regular Wages"]),
    ("Overtime", &["Overtime", "OT", "Overtime Pay"]),
];

/// How an employee name was matched against the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeMatch {
    /// Input equalled the display name or the derived full name.
    Exact,
    /// Input equalled the first name alone.
    FirstName,
    /// Input appeared as a substring of the full or display name. First
    /// directory entry in query-result order wins, which makes this rule
    /// order-dependent for inputs matching several entries.
    Partial,
    /// First input token equalled the first name and last token the last name.
    FirstAndLast,
}

/// A successful employee resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEmployee {
    pub list_id: String,
    /// Full name of the matched entry, for logging.
    pub full_name: String,
    pub matched_by: EmployeeMatch,
}

/// How an earnings category was matched against the wage item directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WageItemMatch {
    /// A candidate name equalled an item name.
    Exact,
    /// A candidate name appeared as a substring of an item name.
    Partial,
    /// No candidate matched; fell back to the first item whose name contains
    /// "Regular" or "Salary".
    DefaultItem,
    /// No candidate matched and no default item exists; fell back to the
    /// first item in the directory.
    FirstAvailable,
}

impl WageItemMatch {
    /// Fallback matches are best-effort picks the operator should review.
    pub fn is_fallback(self) -> bool {
        matches!(self, WageItemMatch::DefaultItem | WageItemMatch::FirstAvailable)
    }
}

/// A successful wage item resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWageItem {
    pub list_id: String,
    /// Name of the matched item, for logging.
    pub name: String,
    pub matched_by: WageItemMatch,
}

/// Resolves a free-text employee name to a directory entry.
///
/// The cascade, first hit wins: exact display or full name, exact first name
/// (exports that record first names only), substring of full or display name,
/// then first token against first name and last token against last name when
/// the input has at least two whitespace-separated tokens. Returns `None`
/// when nothing matches; the caller skips the record.
pub fn resolve_employee(name: &str, employees: &[Employee]) -> Option<ResolvedEmployee> {
    let needle = name.trim();
    if needle.is_empty() {
        return None;
    }

    if let Some(employee) = employees.iter().find(|employee| {
        employee.display_name.eq_ignore_ascii_case(needle)
            || employee.full_name().eq_ignore_ascii_case(needle)
    }) {
        return Some(resolved_employee(employee, EmployeeMatch::Exact));
    }

    if let Some(employee) = employees.iter().find(|employee| {
        employee
            .first_name
            .as_deref()
            .is_some_and(|first| first.eq_ignore_ascii_case(needle))
    }) {
        return Some(resolved_employee(employee, EmployeeMatch::FirstName));
    }

    if let Some(employee) = employees.iter().find(|employee| {
        contains_ignore_ascii_case(&employee.full_name(), needle)
            || contains_ignore_ascii_case(&employee.display_name, needle)
    }) {
        return Some(resolved_employee(employee, EmployeeMatch::Partial));
    }

    let tokens: Vec<&str> = needle.split_whitespace().collect();
    if tokens.len() > 1 {
        let first_token = tokens[0];
        let last_token = tokens[tokens.len() - 1];
        if let Some(employee) = employees.iter().find(|employee| {
            employee
                .first_name
                .as_deref()
                .is_some_and(|first| first.eq_ignore_ascii_case(first_token))
                && employee
                    .last_name
                    .as_deref()
                    .is_some_and(|last| last.eq_ignore_ascii_case(last_token))
        }) {
            return Some(resolved_employee(employee, EmployeeMatch::FirstAndLast));
        }
    }

    None
}

/// Resolves an earnings category to a payroll wage item.
///
/// Candidates are the category's synonym table entries in order, then the
/// literal category itself. Exact matches over all candidates are tried
/// before substring matches. When no candidate matches, the resolver falls
/// back to the first "Regular"/"Salary" item and finally to the first item at
/// all, flagging both so the caller can warn. An empty directory resolves to
/// `None`; nothing may be submitted without a wage item reference.
pub fn resolve_wage_item(category: &str, items: &[WageItem]) -> Option<ResolvedWageItem> {
    let mut candidates: Vec<&str> = CATEGORY_SYNONYMS
        .iter()
        .find(|(canonical, _)| canonical.eq_ignore_ascii_case(category))
        .map(|(_, names)| names.to_vec())
        .unwrap_or_default();
    candidates.push(category);

    for candidate in &candidates {
        if let Some(item) = items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(candidate))
        {
            return Some(resolved_wage_item(item, WageItemMatch::Exact));
        }
    }

    for candidate in &candidates {
        if let Some(item) = items
            .iter()
            .find(|item| contains_ignore_ascii_case(&item.name, candidate))
        {
            return Some(resolved_wage_item(item, WageItemMatch::Partial));
        }
    }

    if let Some(item) = items.iter().find(|item| {
        contains_ignore_ascii_case(&item.name, "Regular")
            || contains_ignore_ascii_case(&item.name, "Salary")
    }) {
        return Some(resolved_wage_item(item, WageItemMatch::DefaultItem));
    }

    items
        .first()
        .map(|item| resolved_wage_item(item, WageItemMatch::FirstAvailable))
}

fn resolved_employee(employee: &Employee, matched_by: EmployeeMatch) -> ResolvedEmployee {
    ResolvedEmployee {
        list_id: employee.list_id.clone(),
        full_name: employee.full_name(),
        matched_by,
    }
}

fn resolved_wage_item(item: &WageItem, matched_by: WageItemMatch) -> ResolvedWageItem {
    ResolvedWageItem {
        list_id: item.list_id.clone(),
        name: item.name.clone(),
        matched_by,
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(list_id: &str, display: &str, first: Option<&str>, last: Option<&str>) -> Employee {
        Employee {
            list_id: list_id.to_string(),
            display_name: display.to_string(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            is_active: true,
        }
    }

    fn item(list_id: &str, name: &str) -> WageItem {
        WageItem {
            list_id: list_id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn exact_match_ignores_case() {
        let employees = vec![employee("E1", "Doe, John", Some("John"), Some("Doe"))];

        let resolved = resolve_employee("john doe", &employees).expect("resolved");
        assert_eq!(resolved.list_id, "E1");
        assert_eq!(resolved.matched_by, EmployeeMatch::Exact);
    }

    #[test]
    fn display_name_matches_when_name_parts_are_missing() {
        let employees = vec![employee("E7", "Warehouse Crew", None, None)];

        let resolved = resolve_employee("WAREHOUSE CREW", &employees).expect("resolved");
        assert_eq!(resolved.list_id, "E7");
        assert_eq!(resolved.matched_by, EmployeeMatch::Exact);
    }

    #[test]
    fn first_name_only_falls_back_when_no_exact_match_exists() {
        let employees = vec![
            employee("E1", "Doe, John", Some("John"), Some("Doe")),
            employee("E2", "Smith, Jane", Some("Jane"), Some("Smith")),
        ];

        let resolved = resolve_employee("jane", &employees).expect("resolved");
        assert_eq!(resolved.list_id, "E2");
        assert_eq!(resolved.matched_by, EmployeeMatch::FirstName);
    }

    #[test]
    fn substring_match_picks_first_entry_in_directory_order() {
        let employees = vec![
            employee("E1", "Smith, Anna", Some("Anna"), Some("Smith")),
            employee("E2", "Jones, Ann", Some("Ann"), Some("Jones")),
        ];

        // The exact-first-name rule runs before the substring rule, so E2
        // wins even though "Ann" is also a substring of "Anna Smith".
        let resolved = resolve_employee("Ann", &employees).expect("resolved");
        assert_eq!(resolved.matched_by, EmployeeMatch::FirstName);
        assert_eq!(resolved.list_id, "E2");

        // Without an exact first name anywhere, the substring rule takes the
        // first directory entry containing the input.
        let employees = vec![
            employee("E1", "Smith, Anna", Some("Anna"), Some("Smith")),
            employee("E2", "Jones, Annette", Some("Annette"), Some("Jones")),
        ];
        let resolved = resolve_employee("Ann", &employees).expect("resolved");
        assert_eq!(resolved.matched_by, EmployeeMatch::Partial);
        assert_eq!(resolved.list_id, "E1");
    }

    #[test]
    fn first_and_last_token_match_bridges_middle_names() {
        let employees = vec![employee(
            "E3",
            "Garcia, Maria",
            Some("Maria"),
            Some("Garcia"),
        )];

        let resolved = resolve_employee("Maria Elena Garcia", &employees).expect("resolved");
        assert_eq!(resolved.list_id, "E3");
        assert_eq!(resolved.matched_by, EmployeeMatch::FirstAndLast);
    }

    #[test]
    fn unmatched_names_and_empty_directories_resolve_to_none() {
        let employees = vec![employee("E1", "Doe, John", Some("John"), Some("Doe"))];

        assert_eq!(resolve_employee("Nobody Known", &employees), None);
        assert_eq!(resolve_employee("   ", &employees), None);
        assert_eq!(resolve_employee("John Doe", &[]), None);
    }

    #[test]
    fn resolution_is_idempotent_over_an_immutable_directory() {
        let employees = vec![
            employee("E1", "Doe, John", Some("John"), Some("Doe")),
            employee("E2", "Smith, Jane", Some("Jane"), Some("Smith")),
        ];

        let first = resolve_employee("jane smith", &employees);
        let second = resolve_employee("jane smith", &employees);
        assert_eq!(first, second);
    }

    #[test]
    fn synonyms_are_tried_in_table_order_before_the_literal_category() {
        let items = vec![
            item("P1", "Sales Commission"),
            item("P2", "Regular Pay"),
        ];

        let resolved = resolve_wage_item("Commission", &items).expect("resolved");
        assert_eq!(resolved.list_id, "P1");
        assert_eq!(resolved.matched_by, WageItemMatch::Exact);
    }

    #[test]
    fn literal_category_matches_items_outside_the_synonym_table() {
        let items = vec![item("P5", "Holiday Pay"), item("P2", "Regular Pay")];

        let resolved = resolve_wage_item("Holiday Pay", &items).expect("resolved");
        assert_eq!(resolved.list_id, "P5");
        assert_eq!(resolved.matched_by, WageItemMatch::Exact);
    }

    #[test]
    fn substring_pass_runs_only_after_all_exact_candidates_miss() {
        let items = vec![item("P4", "Quarterly Bonuses Pool")];

        let resolved = resolve_wage_item("Bonus", &items).expect("resolved");
        assert_eq!(resolved.list_id, "P4");
        assert_eq!(resolved.matched_by, WageItemMatch::Partial);
    }

    #[test]
    fn unmapped_category_falls_back_to_the_regular_item_with_a_flag() {
        let items = vec![item("P1", "Regular Pay")];

        let resolved = resolve_wage_item("Overtime", &items).expect("resolved");
        assert_eq!(resolved.list_id, "P1");
        assert_eq!(resolved.matched_by, WageItemMatch::DefaultItem);
        assert!(resolved.matched_by.is_fallback());
    }

    #[test]
    fn last_resort_is_the_first_item_in_the_directory() {
        let items = vec![item("P9", "Piecework"), item("P10", "Per Diem")];

        let resolved = resolve_wage_item("Overtime", &items).expect("resolved");
        assert_eq!(resolved.list_id, "P9");
        assert_eq!(resolved.matched_by, WageItemMatch::FirstAvailable);
        assert!(resolved.matched_by.is_fallback());
    }

    #[test]
    fn empty_wage_item_directory_resolves_to_none() {
        assert_eq!(resolve_wage_item("Bonus", &[]), None);
    }
}
