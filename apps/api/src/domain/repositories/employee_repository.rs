use async_trait::async_trait;
use uuid::Uuid;

use super::errors::RepositoryResult;
use super::pagination::{Ordering, PageRequest};
use crate::domain::employee::{Employee, EmployeeFilter, EmployeeWithCompany};

/// Sortable employee columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeSortField {
    Name,
    StartDate,
    EndDate,
    CreatedAt,
}

impl EmployeeSortField {
    /// Maps a public ordering key to a sort field
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(EmployeeSortField::Name),
            "start_date" => Some(EmployeeSortField::StartDate),
            "end_date" => Some(EmployeeSortField::EndDate),
            _ => None,
        }
    }
}

/// Listing options for employees
///
/// Rows with equal sort keys are always ordered by id so that pages are
/// stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeQuery {
    pub filter: EmployeeFilter,
    pub ordering: Ordering<EmployeeSortField>,
    pub page: Option<PageRequest>,
}

impl Default for EmployeeQuery {
    fn default() -> Self {
        Self {
            filter: EmployeeFilter::default(),
            ordering: Ordering::asc(EmployeeSortField::Name),
            page: None,
        }
    }
}

/// Repository trait for the Employee aggregate
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, employee: &Employee) -> RepositoryResult<()>;

    /// Insert all employees atomically; either every row is stored or none
    async fn create_batch(&self, employees: &[Employee]) -> RepositoryResult<usize>;

    async fn update(&self, employee: &Employee) -> RepositoryResult<()>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<EmployeeWithCompany>>;

    /// Filtered, ordered listing joined with the owning company
    async fn list(&self, query: &EmployeeQuery) -> RepositoryResult<Vec<EmployeeWithCompany>>;

    /// Number of employees satisfying the filter, ignoring any paging
    async fn count(&self, filter: &EmployeeFilter) -> RepositoryResult<i64>;
}
