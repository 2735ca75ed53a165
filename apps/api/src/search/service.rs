use std::sync::Arc;
use url::Url;

use super::errors::SearchError;
use super::paginator::{Paginator, SearchResponse, PAGE_SIZE};
use super::query::SearchParams;
use crate::domain::employee::EmployeeWithCompany;
use crate::domain::repositories::{EmployeeQuery, EmployeeRepository};

/// Runs validated searches against employee storage
pub struct SearchService {
    employees: Arc<dyn EmployeeRepository>,
    paginate: bool,
}

impl SearchService {
    pub fn new(employees: Arc<dyn EmployeeRepository>, paginate: bool) -> Self {
        Self {
            employees,
            paginate,
        }
    }

    /// Counts the full match set once, then fetches the requested page
    pub async fn search(
        &self,
        params: &SearchParams,
        request_url: Url,
    ) -> Result<SearchResponse<EmployeeWithCompany>, SearchError> {
        let filter = params.to_filter();
        let total_count = self.employees.count(&filter).await?;

        if !self.paginate {
            let results = self
                .employees
                .list(&EmployeeQuery {
                    filter,
                    ..EmployeeQuery::default()
                })
                .await?;

            return Ok(SearchResponse::Unpaginated {
                results,
                total_count,
            });
        }

        let paginator = Paginator::new(PAGE_SIZE, request_url);
        let page_number = params.page_number();
        let window = paginator.window(page_number, total_count)?;

        let results = self
            .employees
            .list(&EmployeeQuery {
                filter,
                page: Some(window),
                ..EmployeeQuery::default()
            })
            .await?;

        tracing::debug!(total_count, page = page_number, "Employee search");

        Ok(SearchResponse::Paginated(
            paginator.page(page_number, total_count, results),
        ))
    }
}
