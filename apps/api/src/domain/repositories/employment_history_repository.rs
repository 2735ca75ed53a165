use async_trait::async_trait;

use super::errors::RepositoryResult;
use super::pagination::Ordering;
use crate::domain::employment_history::{EmploymentHistory, HistoryFilter};

/// Sortable history columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySortField {
    StartDate,
    EndDate,
}

impl HistorySortField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "start_date" => Some(HistorySortField::StartDate),
            "end_date" => Some(HistorySortField::EndDate),
            _ => None,
        }
    }
}

/// Listing options for tenure records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub filter: HistoryFilter,
    pub ordering: Ordering<HistorySortField>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            filter: HistoryFilter::default(),
            ordering: Ordering::desc(HistorySortField::StartDate),
        }
    }
}

/// Read-only access to tenure records
#[async_trait]
pub trait EmploymentHistoryRepository: Send + Sync {
    /// Entries matching the filter; ties are ordered by id
    async fn list(&self, query: &HistoryQuery) -> RepositoryResult<Vec<EmploymentHistory>>;
}
