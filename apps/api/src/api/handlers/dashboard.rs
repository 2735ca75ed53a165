use axum::{extract::State, Json};
use serde::Serialize;

use super::audit_logs::AuditLogResponse;
use super::companies::CompanyResponse;
use super::employees::EmployeeResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::permissions::Permission;
use crate::api::state::AppState;
use crate::domain::employee::{Criterion, EmployeeFilter};
use crate::domain::repositories::{
    CompanyQuery, CompanySortField, EmployeeQuery, EmployeeSortField, Ordering, PageRequest,
};

const TOP_COMPANIES: usize = 5;
const RECENT_EMPLOYEES: usize = 5;
const RECENT_ACTIVITIES: usize = 10;

#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_companies: i64,
    pub total_employees: i64,
    pub active_employees: i64,
    pub inactive_employees: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub metrics: DashboardMetrics,
    pub top_companies: Vec<CompanyResponse>,
    pub recent_employees: Vec<EmployeeResponse>,
    pub recent_activities: Vec<AuditLogResponse>,
}

/// Summary counts and recent activity
///
/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
) -> Result<Json<DashboardResponse>, ApiError> {
    state.gate.authorize(&user, Permission::ReadRecords)?;
    let repos = &state.repositories;

    let total_companies = repos.companies.count().await?;
    let total_employees = repos.employees.count(&EmployeeFilter::new()).await?;
    let active_employees = repos
        .employees
        .count(&EmployeeFilter::new().and(Criterion::Active(true)))
        .await?;

    let top_companies = repos
        .companies
        .list(&CompanyQuery {
            ordering: Ordering::desc(CompanySortField::EmployeeCount),
            page: Some(PageRequest::new(TOP_COMPANIES, 0)),
            ..CompanyQuery::default()
        })
        .await?;

    let recent_employees = repos
        .employees
        .list(&EmployeeQuery {
            ordering: Ordering::desc(EmployeeSortField::CreatedAt),
            page: Some(PageRequest::new(RECENT_EMPLOYEES, 0)),
            ..EmployeeQuery::default()
        })
        .await?;

    let recent_activities = repos.audit_logs.recent(RECENT_ACTIVITIES).await?;

    Ok(Json(DashboardResponse {
        metrics: DashboardMetrics {
            total_companies,
            total_employees,
            active_employees,
            inactive_employees: total_employees - active_employees,
        },
        top_companies: top_companies.iter().map(CompanyResponse::from).collect(),
        recent_employees: recent_employees
            .into_iter()
            .map(EmployeeResponse::from)
            .collect(),
        recent_activities: recent_activities
            .into_iter()
            .map(AuditLogResponse::from)
            .collect(),
    }))
}
