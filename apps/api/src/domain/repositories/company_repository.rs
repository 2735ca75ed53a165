use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

use super::errors::RepositoryResult;
use super::pagination::{Ordering, PageRequest};
use crate::domain::company::Company;

/// Sortable company columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanySortField {
    Name,
    RegistrationDate,
    EmployeeCount,
}

impl CompanySortField {
    /// Maps a public ordering key to a sort field
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(CompanySortField::Name),
            "registration_date" => Some(CompanySortField::RegistrationDate),
            "employee_count" => Some(CompanySortField::EmployeeCount),
            _ => None,
        }
    }
}

/// Listing options for companies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyQuery {
    /// Case-insensitive match on name, registration number or contact person
    pub search: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub employee_count: Option<i32>,
    pub ordering: Ordering<CompanySortField>,
    pub page: Option<PageRequest>,
}

impl CompanyQuery {
    /// True when the company satisfies the search term and exact filters
    pub fn matches(&self, company: &Company) -> bool {
        self.registration_date
            .map_or(true, |date| company.registration_date() == date)
            && self
                .employee_count
                .map_or(true, |count| company.employee_count() == count)
            && self.search.as_ref().map_or(true, |term| {
                let term = term.to_lowercase();
                [
                    company.name(),
                    company.registration_number(),
                    company.contact_person(),
                ]
                .iter()
                .any(|text| text.to_lowercase().contains(&term))
            })
    }
}

impl Default for CompanyQuery {
    fn default() -> Self {
        Self {
            search: None,
            registration_date: None,
            employee_count: None,
            ordering: Ordering::asc(CompanySortField::Name),
            page: None,
        }
    }
}

/// Repository trait for the Company aggregate
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a single company
    async fn create(&self, company: &Company) -> RepositoryResult<()>;

    /// Insert all companies atomically; either every row is stored or none
    async fn create_batch(&self, companies: &[Company]) -> RepositoryResult<usize>;

    /// Overwrite an existing company
    async fn update(&self, company: &Company) -> RepositoryResult<()>;

    /// Delete a company and, by cascade, its employees
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Company>>;

    async fn list(&self, query: &CompanyQuery) -> RepositoryResult<Vec<Company>>;

    async fn count(&self) -> RepositoryResult<i64>;

    /// Resolve company references used in upload files
    ///
    /// Each reference is matched against registration numbers first, then
    /// case-insensitively against company names. Unresolved references are
    /// absent from the returned map.
    async fn resolve_references(
        &self,
        references: &[String],
    ) -> RepositoryResult<HashMap<String, Uuid>>;
}

/// Matches upload references against candidate companies
///
/// Registration numbers win over names; a name shared by several companies
/// is ambiguous and stays unresolved.
pub fn match_references<'a>(
    references: &[String],
    candidates: impl IntoIterator<Item = (Uuid, &'a str, &'a str)>,
) -> HashMap<String, Uuid> {
    let mut by_registration: HashMap<&str, Uuid> = HashMap::new();
    let mut by_name: HashMap<String, Option<Uuid>> = HashMap::new();

    for (id, registration_number, name) in candidates {
        by_registration.insert(registration_number, id);
        by_name
            .entry(name.to_lowercase())
            .and_modify(|existing| *existing = None)
            .or_insert(Some(id));
    }

    references
        .iter()
        .filter_map(|reference| {
            let trimmed = reference.trim();
            by_registration
                .get(trimmed)
                .copied()
                .or_else(|| by_name.get(&trimmed.to_lowercase()).copied().flatten())
                .map(|id| (reference.clone(), id))
        })
        .collect()
}
