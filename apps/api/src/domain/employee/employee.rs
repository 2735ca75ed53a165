use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Mutable attributes of an employee record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmployeeDetails {
    pub name: String,
    pub employee_id: String,
    pub company_id: Uuid,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub role: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub duties: String,
}

/// Employee aggregate root
///
/// One person's current (or most recent) position at a company.
///
/// # Invariants
/// - Name cannot be blank
/// - Employee identifier cannot be blank
/// - End date, when present, is not before the start date
///
/// An employee without an end date is active.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use talentverify_api::domain::employee::{Employee, EmployeeDetails};
/// use uuid::Uuid;
///
/// let employee = Employee::new(EmployeeDetails {
///     name: "Ada Smith".to_string(),
///     employee_id: "E-1".to_string(),
///     company_id: Uuid::new_v4(),
///     department: "Sales".to_string(),
///     role: "Manager".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
///     end_date: None,
///     duties: String::new(),
/// })
/// .expect("valid employee");
///
/// assert!(employee.is_active());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    id: Uuid,
    details: EmployeeDetails,
    created_at: DateTime<Utc>,
}

impl Employee {
    /// Creates a new Employee, enforcing its invariants
    pub fn new(details: EmployeeDetails) -> Result<Self, String> {
        let details = Self::validate(details)?;

        Ok(Self {
            id: Uuid::new_v4(),
            details,
            created_at: Utc::now(),
        })
    }

    /// Replaces the employee's attributes, keeping identity and creation time
    pub fn update(&mut self, details: EmployeeDetails) -> Result<(), String> {
        self.details = Self::validate(details)?;
        Ok(())
    }

    fn validate(mut details: EmployeeDetails) -> Result<EmployeeDetails, String> {
        details.name = details.name.trim().to_string();
        details.employee_id = details.employee_id.trim().to_string();

        if details.name.is_empty() {
            return Err("Employee name cannot be empty".to_string());
        }

        if details.employee_id.is_empty() {
            return Err("Employee identifier cannot be empty".to_string());
        }

        if let Some(end_date) = details.end_date {
            if end_date < details.start_date {
                return Err(format!(
                    "End date {} is before start date {}",
                    end_date, details.start_date
                ));
            }
        }

        Ok(details)
    }

    /// True while the employee has no end date
    pub fn is_active(&self) -> bool {
        self.details.end_date.is_none()
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn employee_id(&self) -> &str {
        &self.details.employee_id
    }

    pub fn company_id(&self) -> Uuid {
        self.details.company_id
    }

    pub fn department(&self) -> &str {
        &self.details.department
    }

    pub fn role(&self) -> &str {
        &self.details.role
    }

    pub fn start_date(&self) -> NaiveDate {
        self.details.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.details.end_date
    }

    pub fn duties(&self) -> &str {
        &self.details.duties
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs an Employee from persistence layer data
    ///
    /// Bypasses validation; only repository implementations should call this.
    pub fn from_persistence(id: Uuid, details: EmployeeDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            details,
            created_at,
        }
    }
}

/// An employee read together with its owning company's name
///
/// Produced by a single joined query so listings never look the company up
/// per row.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeWithCompany {
    pub employee: Employee,
    pub company_name: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn details(name: &str, start: NaiveDate, end: Option<NaiveDate>) -> EmployeeDetails {
        EmployeeDetails {
            name: name.to_string(),
            employee_id: "E-100".to_string(),
            company_id: Uuid::new_v4(),
            department: "Sales".to_string(),
            role: "Analyst".to_string(),
            start_date: start,
            end_date: end,
            duties: "Reports".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn employee_without_end_date_is_active() {
        let employee = Employee::new(details("Ada", date(2020, 1, 1), None)).unwrap();
        assert!(employee.is_active());
    }

    #[test]
    fn employee_with_end_date_is_inactive() {
        let employee =
            Employee::new(details("Ada", date(2020, 1, 1), Some(date(2021, 1, 1)))).unwrap();
        assert!(!employee.is_active());
    }

    #[test]
    fn end_date_equal_to_start_date_is_allowed() {
        let result = Employee::new(details("Ada", date(2020, 1, 1), Some(date(2020, 1, 1))));
        assert!(result.is_ok());
    }

    #[test]
    fn end_date_before_start_date_fails() {
        let result = Employee::new(details("Ada", date(2020, 1, 1), Some(date(2019, 12, 31))));
        assert!(result.unwrap_err().contains("before start date"));
    }

    #[test]
    fn blank_name_fails() {
        assert!(Employee::new(details(" ", date(2020, 1, 1), None)).is_err());
    }

    #[test]
    fn blank_employee_id_fails() {
        let mut input = details("Ada", date(2020, 1, 1), None);
        input.employee_id = "".to_string();

        assert!(Employee::new(input).is_err());
    }

    #[test]
    fn update_validates_dates() {
        let mut employee = Employee::new(details("Ada", date(2020, 1, 1), None)).unwrap();

        let result = employee.update(details("Ada", date(2020, 1, 1), Some(date(2010, 1, 1))));

        assert!(result.is_err());
        assert!(employee.is_active());
    }
}
