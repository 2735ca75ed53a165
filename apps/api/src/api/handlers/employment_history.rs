use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::permissions::Permission;
use crate::api::state::AppState;
use crate::domain::employment_history::{EmploymentHistory, HistoryFilter};
use crate::domain::repositories::{HistoryQuery, HistorySortField, Ordering};

#[derive(Debug, Serialize)]
pub struct EmploymentHistoryResponse {
    pub id: Uuid,
    pub employee: Uuid,
    pub company: Uuid,
    pub department: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl From<EmploymentHistory> for EmploymentHistoryResponse {
    fn from(entry: EmploymentHistory) -> Self {
        Self {
            id: entry.id,
            employee: entry.employee_id,
            company: entry.company_id,
            department: entry.department,
            role: entry.role,
            start_date: entry.start_date,
            end_date: entry.end_date,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub employee: Option<Uuid>,
    pub company: Option<Uuid>,
    pub department: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Matches employee name, company name or role
    pub search: Option<String>,
    /// `start_date` or `end_date`, `-` prefix for descending
    pub ordering: Option<String>,
}

impl HistoryParams {
    fn into_query(self) -> Result<HistoryQuery, ApiError> {
        let mut query = HistoryQuery {
            filter: HistoryFilter {
                employee_id: self.employee,
                company_id: self.company,
                department: self.department,
                start_date: self.start_date,
                end_date: self.end_date,
                search: self
                    .search
                    .map(|term| term.trim().to_string())
                    .filter(|term| !term.is_empty()),
            },
            ..HistoryQuery::default()
        };

        if let Some(raw) = self.ordering {
            query.ordering = Ordering::parse(raw.trim(), HistorySortField::from_key)
                .ok_or_else(|| ApiError::bad_request(format!("Invalid ordering: {}", raw)))?;
        }

        Ok(query)
    }
}

/// List tenure records, newest first unless ordered otherwise
///
/// GET /api/employment-history
pub async fn list_history(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<EmploymentHistoryResponse>>, ApiError> {
    state.gate.authorize(&user, Permission::ReadRecords)?;

    let entries = state.repositories.history.list(&params.into_query()?).await?;

    Ok(Json(
        entries.into_iter().map(EmploymentHistoryResponse::from).collect(),
    ))
}
