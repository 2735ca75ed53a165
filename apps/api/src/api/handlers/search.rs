use axum::{
    extract::{OriginalUri, Query, State},
    http::{header::HOST, HeaderMap},
    Json,
};
use url::Url;

use super::employees::EmployeeResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::permissions::Permission;
use crate::api::state::AppState;
use crate::search::{SearchParams, SearchResponse};

/// Absolute URL of the current request, used for page links
fn request_url(headers: &HeaderMap, uri: &axum::http::Uri) -> Result<Url, ApiError> {
    let host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");

    Url::parse(&format!("{}://{}{}", scheme, host, uri))
        .map_err(|e| ApiError::bad_request(format!("Invalid request URL: {}", e)))
}

/// Search employees
///
/// GET /api/search
pub async fn search_employees(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResponse<EmployeeResponse>>, ApiError> {
    state.gate.authorize(&user, Permission::ReadRecords)?;

    let params = SearchParams::from_pairs(&pairs)?;
    let response = state
        .search
        .search(&params, request_url(&headers, &uri)?)
        .await?;

    Ok(Json(response.map(EmployeeResponse::from)))
}
