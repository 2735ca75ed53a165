use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::read_upload;
use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::permissions::Permission;
use crate::api::state::AppState;
use crate::domain::audit::AuditAction;
use crate::domain::company::{Company, CompanyDetails};
use crate::domain::repositories::{CompanyQuery, CompanySortField, Ordering};
use crate::ingest::RecordKind;

const ENTITY: &str = "company";

/// Company as returned by the API
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: String,
    pub registration_date: NaiveDate,
    pub registration_number: String,
    pub address: String,
    pub contact_person: String,
    pub departments: Vec<String>,
    pub employee_count: i32,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Company> for CompanyResponse {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id(),
            name: company.name().to_string(),
            registration_date: company.registration_date(),
            registration_number: company.registration_number().to_string(),
            address: company.address().to_string(),
            contact_person: company.contact_person().to_string(),
            departments: company.departments().as_slice().to_vec(),
            employee_count: company.employee_count(),
            phone: company.phone().to_string(),
            email: company.email().to_string(),
            created_at: company.created_at(),
        }
    }
}

/// Query parameters for listing companies
#[derive(Debug, Default, Deserialize)]
pub struct ListCompaniesParams {
    /// Matches name, registration number or contact person
    pub search: Option<String>,
    /// `name`, `registration_date` or `employee_count`, `-` prefix for descending
    pub ordering: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub employee_count: Option<i32>,
}

impl ListCompaniesParams {
    fn into_query(self) -> Result<CompanyQuery, ApiError> {
        let mut query = CompanyQuery {
            search: self
                .search
                .map(|term| term.trim().to_string())
                .filter(|term| !term.is_empty()),
            registration_date: self.registration_date,
            employee_count: self.employee_count,
            ..CompanyQuery::default()
        };

        if let Some(raw) = self.ordering {
            query.ordering = Ordering::parse(raw.trim(), CompanySortField::from_key)
                .ok_or_else(|| ApiError::bad_request(format!("Invalid ordering: {}", raw)))?;
        }

        Ok(query)
    }
}

/// List companies
///
/// GET /api/companies
pub async fn list_companies(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Query(params): Query<ListCompaniesParams>,
) -> Result<Json<Vec<CompanyResponse>>, ApiError> {
    state.gate.authorize(&user, Permission::ReadRecords)?;

    let companies = state.repositories.companies.list(&params.into_query()?).await?;

    Ok(Json(companies.iter().map(CompanyResponse::from).collect()))
}

/// Create a company
///
/// POST /api/companies
pub async fn create_company(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Json(details): Json<CompanyDetails>,
) -> Result<(StatusCode, Json<CompanyResponse>), ApiError> {
    state.gate.authorize(&user, Permission::ManageCompanies)?;

    let company = Company::new(details).map_err(|e| ApiError::bad_request(e))?;
    state.repositories.companies.create(&company).await?;

    state
        .record(user.user_id, AuditAction::Create, ENTITY, company.id().to_string())
        .await;

    Ok((StatusCode::CREATED, Json(CompanyResponse::from(&company))))
}

/// Get a company by ID
///
/// GET /api/companies/:id
pub async fn get_company(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyResponse>, ApiError> {
    state.gate.authorize(&user, Permission::ReadRecords)?;

    let company = state
        .repositories
        .companies
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found"))?;

    Ok(Json(CompanyResponse::from(&company)))
}

/// Replace a company's details
///
/// PUT /api/companies/:id
pub async fn update_company(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Path(id): Path<Uuid>,
    Json(details): Json<CompanyDetails>,
) -> Result<Json<CompanyResponse>, ApiError> {
    state.gate.authorize(&user, Permission::ManageCompanies)?;

    let mut company = state
        .repositories
        .companies
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found"))?;

    company.update(details).map_err(|e| ApiError::bad_request(e))?;
    state.repositories.companies.update(&company).await?;

    state
        .record(user.user_id, AuditAction::Update, ENTITY, id.to_string())
        .await;

    Ok(Json(CompanyResponse::from(&company)))
}

/// Delete a company together with its employees
///
/// DELETE /api/companies/:id
pub async fn delete_company(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.gate.authorize(&user, Permission::ManageCompanies)?;

    state.repositories.companies.delete(id).await?;

    state
        .record(user.user_id, AuditAction::Delete, ENTITY, id.to_string())
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Upload response body
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
}

/// Create companies from a CSV or Excel file
///
/// POST /api/companies/bulk_upload
pub async fn bulk_upload_companies(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    state.gate.authorize(&user, Permission::ManageCompanies)?;

    let file = read_upload(multipart).await?;
    let report = state.ingestion.ingest(file, RecordKind::Company).await?;

    state
        .record(user.user_id, AuditAction::BulkUpload, ENTITY, String::new())
        .await;

    Ok(Json(UploadResponse {
        message: report.message(),
    }))
}
