use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::companies::UploadResponse;
use super::read_upload;
use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::permissions::Permission;
use crate::api::state::AppState;
use crate::domain::audit::AuditAction;
use crate::domain::employee::{Criterion, Employee, EmployeeDetails, EmployeeWithCompany};
use crate::domain::repositories::{EmployeeQuery, EmployeeSortField, Ordering};
use crate::ingest::RecordKind;

const ENTITY: &str = "employee";

/// Employee as returned by the API, with the owning company's name
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: Uuid,
    pub name: String,
    pub employee_id: String,
    pub company: Uuid,
    pub company_name: String,
    pub department: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub duties: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl EmployeeResponse {
    fn new(employee: &Employee, company_name: &str) -> Self {
        Self {
            id: employee.id(),
            name: employee.name().to_string(),
            employee_id: employee.employee_id().to_string(),
            company: employee.company_id(),
            company_name: company_name.to_string(),
            department: employee.department().to_string(),
            role: employee.role().to_string(),
            start_date: employee.start_date(),
            end_date: employee.end_date(),
            duties: employee.duties().to_string(),
            is_active: employee.is_active(),
            created_at: employee.created_at(),
        }
    }
}

impl From<EmployeeWithCompany> for EmployeeResponse {
    fn from(row: EmployeeWithCompany) -> Self {
        Self::new(&row.employee, &row.company_name)
    }
}

/// Query parameters for listing employees
#[derive(Debug, Default, Deserialize)]
pub struct ListEmployeesParams {
    /// Matches name, employee identifier or role
    pub search: Option<String>,
    /// `name`, `start_date` or `end_date`, `-` prefix for descending
    pub ordering: Option<String>,
    /// Only employees of this company
    pub company: Option<Uuid>,
    pub department: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ListEmployeesParams {
    fn into_query(self) -> Result<EmployeeQuery, ApiError> {
        let mut query = EmployeeQuery::default();

        if let Some(term) = self.search.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            query.filter.push(Criterion::Keyword(term));
        }
        if let Some(company_id) = self.company {
            query.filter.push(Criterion::CompanyIs(company_id));
        }
        if let Some(department) = self.department {
            query.filter.push(Criterion::DepartmentIs(department));
        }
        if let Some(date) = self.start_date {
            query.filter.push(Criterion::StartDateOn(date));
        }
        if let Some(date) = self.end_date {
            query.filter.push(Criterion::EndDateOn(date));
        }
        if let Some(raw) = self.ordering {
            query.ordering = Ordering::parse(raw.trim(), EmployeeSortField::from_key)
                .ok_or_else(|| ApiError::bad_request(format!("Invalid ordering: {}", raw)))?;
        }

        Ok(query)
    }
}

/// Resolves the company name, rejecting references to unknown companies
async fn company_name(state: &AppState, company_id: Uuid) -> Result<String, ApiError> {
    state
        .repositories
        .companies
        .find_by_id(company_id)
        .await?
        .map(|company| company.name().to_string())
        .ok_or_else(|| ApiError::bad_request(format!("Unknown company: {}", company_id)))
}

/// List employees
///
/// GET /api/employees
pub async fn list_employees(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Query(params): Query<ListEmployeesParams>,
) -> Result<Json<Vec<EmployeeResponse>>, ApiError> {
    state.gate.authorize(&user, Permission::ReadRecords)?;

    let rows = state.repositories.employees.list(&params.into_query()?).await?;

    Ok(Json(rows.into_iter().map(EmployeeResponse::from).collect()))
}

/// Create an employee
///
/// POST /api/employees
pub async fn create_employee(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Json(details): Json<EmployeeDetails>,
) -> Result<(StatusCode, Json<EmployeeResponse>), ApiError> {
    state.gate.authorize(&user, Permission::ManageEmployees)?;

    let employee = Employee::new(details).map_err(|e| ApiError::bad_request(e))?;
    let company_name = company_name(&state, employee.company_id()).await?;
    state.repositories.employees.create(&employee).await?;

    state
        .record(user.user_id, AuditAction::Create, ENTITY, employee.id().to_string())
        .await;

    Ok((
        StatusCode::CREATED,
        Json(EmployeeResponse::new(&employee, &company_name)),
    ))
}

/// Get an employee by ID
///
/// GET /api/employees/:id
pub async fn get_employee(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    state.gate.authorize(&user, Permission::ReadRecords)?;

    let row = state
        .repositories
        .employees
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    Ok(Json(EmployeeResponse::from(row)))
}

/// Replace an employee's details
///
/// PUT /api/employees/:id
pub async fn update_employee(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Path(id): Path<Uuid>,
    Json(details): Json<EmployeeDetails>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    state.gate.authorize(&user, Permission::ManageEmployees)?;

    let mut employee = state
        .repositories
        .employees
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?
        .employee;

    employee.update(details).map_err(|e| ApiError::bad_request(e))?;
    let company_name = company_name(&state, employee.company_id()).await?;
    state.repositories.employees.update(&employee).await?;

    state
        .record(user.user_id, AuditAction::Update, ENTITY, id.to_string())
        .await;

    Ok(Json(EmployeeResponse::new(&employee, &company_name)))
}

/// Delete an employee
///
/// DELETE /api/employees/:id
pub async fn delete_employee(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.gate.authorize(&user, Permission::ManageEmployees)?;

    state.repositories.employees.delete(id).await?;

    state
        .record(user.user_id, AuditAction::Delete, ENTITY, id.to_string())
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Create employees from a CSV or Excel file
///
/// The `company` column may hold a registration number or a company name.
///
/// POST /api/employees/bulk_upload
pub async fn bulk_upload_employees(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    state.gate.authorize(&user, Permission::ManageEmployees)?;

    let file = read_upload(multipart).await?;
    let report = state.ingestion.ingest(file, RecordKind::Employee).await?;

    state
        .record(user.user_id, AuditAction::BulkUpload, ENTITY, String::new())
        .await;

    Ok(Json(UploadResponse {
        message: report.message(),
    }))
}
