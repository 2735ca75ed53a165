use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::permissions::Permission;
use crate::api::state::AppState;
use crate::domain::audit::{AuditAction, AuditLog};
use crate::domain::repositories::{AuditLogQuery, AuditSortField, Ordering};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

#[derive(Debug, Serialize)]
pub struct AuditLogResponse {
    pub id: Uuid,
    pub user: Option<Uuid>,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
}

impl From<AuditLog> for AuditLogResponse {
    fn from(entry: AuditLog) -> Self {
        Self {
            id: entry.id,
            user: entry.user_id,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            timestamp: entry.timestamp,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditLogParams {
    pub user: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub entity_type: Option<String>,
    /// Entries recorded on this UTC day
    pub timestamp: Option<NaiveDate>,
    /// Matches entity type, entity id or the acting user's email
    pub search: Option<String>,
    /// `timestamp` or `-timestamp`
    pub ordering: Option<String>,
    pub limit: Option<usize>,
}

impl AuditLogParams {
    fn into_query(self) -> Result<AuditLogQuery, ApiError> {
        let mut query = AuditLogQuery {
            user_id: self.user,
            action: self.action,
            entity_type: self.entity_type,
            on_date: self.timestamp,
            search: self
                .search
                .map(|term| term.trim().to_string())
                .filter(|term| !term.is_empty()),
            ..AuditLogQuery::recent(self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT))
        };

        if let Some(raw) = self.ordering {
            query.ordering = Ordering::parse(raw.trim(), AuditSortField::from_key)
                .ok_or_else(|| ApiError::bad_request(format!("Invalid ordering: {}", raw)))?;
        }

        Ok(query)
    }
}

/// Audit entries, newest first unless ordered otherwise
///
/// GET /api/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Query(params): Query<AuditLogParams>,
) -> Result<Json<Vec<AuditLogResponse>>, ApiError> {
    state.gate.authorize(&user, Permission::ViewAuditLogs)?;

    let entries = state.repositories.audit_logs.list(&params.into_query()?).await?;

    Ok(Json(entries.into_iter().map(AuditLogResponse::from).collect()))
}
