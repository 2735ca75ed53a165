use chrono::NaiveDate;
use uuid::Uuid;

use super::employee::EmployeeWithCompany;

/// One constraint on an employee listing
///
/// Text criteria are case-insensitive substring matches; date bounds are
/// inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    NameContains(String),
    EmployeeIdContains(String),
    /// Matches the owning company's name
    CompanyNameContains(String),
    DepartmentContains(String),
    RoleContains(String),
    StartDateFrom(NaiveDate),
    StartDateTo(NaiveDate),
    /// `true`: no end date, `false`: end date present
    Active(bool),
    /// Owned by exactly this company
    CompanyIs(Uuid),
    /// Department equals the value exactly
    DepartmentIs(String),
    StartDateOn(NaiveDate),
    /// End date equals the value; active employees never match
    EndDateOn(NaiveDate),
    /// Name, employee identifier or role contains the keyword
    Keyword(String),
}

impl Criterion {
    /// Evaluates the criterion against a joined employee row
    pub fn matches(&self, row: &EmployeeWithCompany) -> bool {
        let employee = &row.employee;
        match self {
            Criterion::NameContains(term) => contains_ignore_case(employee.name(), term),
            Criterion::EmployeeIdContains(term) => {
                contains_ignore_case(employee.employee_id(), term)
            }
            Criterion::CompanyNameContains(term) => contains_ignore_case(&row.company_name, term),
            Criterion::DepartmentContains(term) => contains_ignore_case(employee.department(), term),
            Criterion::RoleContains(term) => contains_ignore_case(employee.role(), term),
            Criterion::StartDateFrom(date) => employee.start_date() >= *date,
            Criterion::StartDateTo(date) => employee.start_date() <= *date,
            Criterion::Active(active) => employee.is_active() == *active,
            Criterion::CompanyIs(company_id) => employee.company_id() == *company_id,
            Criterion::DepartmentIs(department) => employee.department() == department,
            Criterion::StartDateOn(date) => employee.start_date() == *date,
            Criterion::EndDateOn(date) => employee.end_date() == Some(*date),
            Criterion::Keyword(term) => {
                contains_ignore_case(employee.name(), term)
                    || contains_ignore_case(employee.employee_id(), term)
                    || contains_ignore_case(employee.role(), term)
            }
        }
    }
}

/// Conjunction of criteria over employee records
///
/// An empty filter places no constraint at all.
///
/// # Example
/// ```
/// use talentverify_api::domain::employee::{Criterion, EmployeeFilter};
///
/// let filter = EmployeeFilter::new()
///     .and(Criterion::NameContains("smith".to_string()))
///     .and(Criterion::Active(true));
///
/// assert_eq!(filter.criteria().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    criteria: Vec<Criterion>,
}

impl EmployeeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a criterion to the conjunction
    pub fn and(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// True when every criterion holds for the row
    pub fn matches(&self, row: &EmployeeWithCompany) -> bool {
        self.criteria.iter().all(|criterion| criterion.matches(row))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
