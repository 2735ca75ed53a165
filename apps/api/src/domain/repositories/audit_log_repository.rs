use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::errors::RepositoryResult;
use super::pagination::Ordering;
use crate::domain::audit::{AuditAction, AuditLog};

/// Sortable audit columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditSortField {
    Timestamp,
}

impl AuditSortField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "timestamp" => Some(AuditSortField::Timestamp),
            _ => None,
        }
    }
}

/// Listing options for the audit trail
///
/// `on_date` selects entries recorded on that UTC day. `search` is a
/// case-insensitive match on the entity type, the entity id or the acting
/// user's email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogQuery {
    pub user_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub entity_type: Option<String>,
    pub on_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub ordering: Ordering<AuditSortField>,
    pub limit: usize,
}

impl AuditLogQuery {
    /// Newest `limit` entries, unfiltered
    pub fn recent(limit: usize) -> Self {
        Self {
            user_id: None,
            action: None,
            entity_type: None,
            on_date: None,
            search: None,
            ordering: Ordering::desc(AuditSortField::Timestamp),
            limit,
        }
    }
}

/// Append-only audit trail
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: &AuditLog) -> RepositoryResult<()>;

    /// Entries matching the query, at most `query.limit` of them
    async fn list(&self, query: &AuditLogQuery) -> RepositoryResult<Vec<AuditLog>>;

    /// Newest entries first
    async fn recent(&self, limit: usize) -> RepositoryResult<Vec<AuditLog>> {
        self.list(&AuditLogQuery::recent(limit)).await
    }
}
