use super::value_objects::Departments;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Mutable attributes of a company, as supplied by API payloads and uploads
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompanyDetails {
    pub name: String,
    pub registration_date: NaiveDate,
    pub registration_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub departments: Departments,
    #[serde(default)]
    pub employee_count: i32,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Company aggregate root
///
/// A registered employer whose staff records are verified through the API.
///
/// # Invariants
/// - Name cannot be blank
/// - Registration number cannot be blank
/// - Employee count cannot be negative
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use talentverify_api::domain::company::{Company, CompanyDetails, Departments};
///
/// let company = Company::new(CompanyDetails {
///     name: "Acme".to_string(),
///     registration_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
///     registration_number: "REG-001".to_string(),
///     address: String::new(),
///     contact_person: String::new(),
///     departments: Departments::from_joined("Sales,HR"),
///     employee_count: 12,
///     phone: String::new(),
///     email: String::new(),
/// })
/// .expect("valid company");
///
/// assert_eq!(company.name(), "Acme");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    id: Uuid,
    details: CompanyDetails,
    created_at: DateTime<Utc>,
}

impl Company {
    /// Creates a new Company, enforcing its invariants
    ///
    /// # Returns
    /// * `Ok(Company)` - New company with a fresh id
    /// * `Err(String)` - If any invariant is violated
    pub fn new(details: CompanyDetails) -> Result<Self, String> {
        let details = Self::validate(details)?;

        Ok(Self {
            id: Uuid::new_v4(),
            details,
            created_at: Utc::now(),
        })
    }

    /// Replaces the company's attributes, keeping its identity
    pub fn update(&mut self, details: CompanyDetails) -> Result<(), String> {
        self.details = Self::validate(details)?;
        Ok(())
    }

    fn validate(mut details: CompanyDetails) -> Result<CompanyDetails, String> {
        details.name = details.name.trim().to_string();
        details.registration_number = details.registration_number.trim().to_string();

        if details.name.is_empty() {
            return Err("Company name cannot be empty".to_string());
        }

        if details.registration_number.is_empty() {
            return Err("Registration number cannot be empty".to_string());
        }

        if details.employee_count < 0 {
            return Err("Employee count cannot be negative".to_string());
        }

        Ok(details)
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn registration_date(&self) -> NaiveDate {
        self.details.registration_date
    }

    pub fn registration_number(&self) -> &str {
        &self.details.registration_number
    }

    pub fn address(&self) -> &str {
        &self.details.address
    }

    pub fn contact_person(&self) -> &str {
        &self.details.contact_person
    }

    pub fn departments(&self) -> &Departments {
        &self.details.departments
    }

    pub fn employee_count(&self) -> i32 {
        self.details.employee_count
    }

    pub fn phone(&self) -> &str {
        &self.details.phone
    }

    pub fn email(&self) -> &str {
        &self.details.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs a Company from persistence layer data
    ///
    /// Bypasses validation; only repository implementations should call this.
    pub fn from_persistence(id: Uuid, details: CompanyDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            details,
            created_at,
        }
    }
}
