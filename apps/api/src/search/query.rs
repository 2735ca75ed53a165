use chrono::NaiveDate;
use std::collections::HashSet;

use super::errors::SearchError;
use crate::domain::employee::{Criterion, EmployeeFilter};

const TEXT_PARAMS: [&str; 5] = ["name", "employee_id", "company", "department", "role"];
const DATE_PARAMS: [&str; 2] = ["start_date_from", "start_date_to"];
const ACTIVE_PARAM: &str = "is_active";
const PAGE_PARAM: &str = "page";

/// Validated employee search parameters
///
/// Every field is optional; an absent field places no constraint on the
/// result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub name: Option<String>,
    pub employee_id: Option<String>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub start_date_from: Option<NaiveDate>,
    pub start_date_to: Option<NaiveDate>,
    pub is_active: Option<bool>,
    /// 1-based page number, `None` for the first page
    pub page: Option<usize>,
}

fn invalid(message: impl Into<String>) -> SearchError {
    SearchError::InvalidParameters(message.into())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, SearchError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(format!("{} must be a boolean, got '{}'", key, raw))),
    }
}

fn parse_date(key: &str, raw: &str) -> Result<NaiveDate, SearchError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(format!("{} must be a YYYY-MM-DD date, got '{}'", key, raw)))
}

fn parse_page(raw: &str) -> Result<usize, SearchError> {
    match raw.trim().parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(invalid("Invalid page.")),
    }
}

impl SearchParams {
    /// Validates raw query pairs
    ///
    /// Unknown keys, repeated keys, blank text and malformed dates, booleans
    /// or page numbers are all rejected.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, SearchError> {
        let mut params = SearchParams::default();
        let mut seen = HashSet::new();

        for (key, raw) in pairs {
            let key = key.as_str();
            if !seen.insert(key) {
                return Err(invalid(format!("{} was given more than once", key)));
            }

            if TEXT_PARAMS.contains(&key) {
                let value = raw.trim();
                if value.is_empty() {
                    return Err(invalid(format!("{} may not be blank", key)));
                }
                let slot = match key {
                    "name" => &mut params.name,
                    "employee_id" => &mut params.employee_id,
                    "company" => &mut params.company,
                    "department" => &mut params.department,
                    _ => &mut params.role,
                };
                *slot = Some(value.to_string());
            } else if DATE_PARAMS.contains(&key) {
                let date = parse_date(key, raw)?;
                if key == "start_date_from" {
                    params.start_date_from = Some(date);
                } else {
                    params.start_date_to = Some(date);
                }
            } else if key == ACTIVE_PARAM {
                params.is_active = Some(parse_bool(key, raw)?);
            } else if key == PAGE_PARAM {
                params.page = Some(parse_page(raw)?);
            } else {
                return Err(invalid(format!("unknown parameter '{}'", key)));
            }
        }

        Ok(params)
    }

    /// Conjunction of one criterion per supplied parameter
    pub fn to_filter(&self) -> EmployeeFilter {
        let mut filter = EmployeeFilter::new();

        if let Some(name) = &self.name {
            filter.push(Criterion::NameContains(name.clone()));
        }
        if let Some(employee_id) = &self.employee_id {
            filter.push(Criterion::EmployeeIdContains(employee_id.clone()));
        }
        if let Some(company) = &self.company {
            filter.push(Criterion::CompanyNameContains(company.clone()));
        }
        if let Some(department) = &self.department {
            filter.push(Criterion::DepartmentContains(department.clone()));
        }
        if let Some(role) = &self.role {
            filter.push(Criterion::RoleContains(role.clone()));
        }
        if let Some(from) = self.start_date_from {
            filter.push(Criterion::StartDateFrom(from));
        }
        if let Some(to) = self.start_date_to {
            filter.push(Criterion::StartDateTo(to));
        }
        if let Some(active) = self.is_active {
            filter.push(Criterion::Active(active));
        }

        filter
    }

    pub fn page_number(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn no_parameters_means_no_constraints() {
        let params = SearchParams::from_pairs(&[]).unwrap();

        assert!(params.to_filter().is_empty());
        assert_eq!(params.page_number(), 1);
    }

    #[test]
    fn each_parameter_adds_one_criterion() {
        let params = SearchParams::from_pairs(&pairs(&[
            ("name", "smith"),
            ("department", " sales "),
            ("start_date_from", "2020-01-01"),
            ("is_active", "False"),
            ("page", "2"),
        ]))
        .unwrap();

        assert_eq!(
            params.to_filter().criteria(),
            &[
                Criterion::NameContains("smith".to_string()),
                Criterion::DepartmentContains("sales".to_string()),
                Criterion::StartDateFrom(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
                Criterion::Active(false),
            ]
        );
        assert_eq!(params.page_number(), 2);
    }

    #[test]
    fn malformed_values_are_rejected() {
        for raw in [
            vec![("start_date_to", "31/12/2020")],
            vec![("is_active", "maybe")],
            vec![("name", "  ")],
            vec![("page", "0")],
            vec![("page", "last")],
            vec![("salary", "100")],
            vec![("role", "dev"), ("role", "ops")],
        ] {
            assert!(
                matches!(
                    SearchParams::from_pairs(&pairs(&raw)),
                    Err(SearchError::InvalidParameters(_))
                ),
                "accepted {:?}",
                raw
            );
        }
    }

    #[test]
    fn boolean_spellings() {
        for (raw, expected) in [("true", true), ("1", true), ("YES", true), ("off", false)] {
            let params = SearchParams::from_pairs(&pairs(&[("is_active", raw)])).unwrap();
            assert_eq!(params.is_active, Some(expected));
        }
    }
}
