use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::auth::UserResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::permissions::Permission;
use crate::api::state::AppState;
use crate::domain::audit::AuditAction;
use crate::domain::repositories::{RepositoryError, UserQuery};
use crate::domain::user::{UserProfile, UserRole};

const ENTITY: &str = "user_profile";

/// Query parameters for listing users
#[derive(Debug, Default, Deserialize)]
pub struct ListUserProfilesParams {
    pub role: Option<UserRole>,
    pub company: Option<Uuid>,
    /// Matches email or full name
    pub search: Option<String>,
}

/// Request body for changing a user's profile
///
/// Omitting `company_id` detaches the user from any company.
#[derive(Debug, Deserialize)]
pub struct UpdateUserProfileRequest {
    pub role: UserRole,
    #[serde(default)]
    pub company_id: Option<Uuid>,
}

/// List users with their role and company
///
/// GET /api/user-profiles
pub async fn list_user_profiles(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Query(params): Query<ListUserProfilesParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    state.gate.authorize(&user, Permission::ManageUsers)?;

    let query = UserQuery {
        role: params.role,
        company_id: params.company,
        search: params
            .search
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty()),
    };
    let users = state.repositories.users.list(&query).await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Get one user's profile
///
/// GET /api/user-profiles/:id
pub async fn get_user_profile(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    state.gate.authorize(&user, Permission::ManageUsers)?;

    let found = state
        .repositories
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(&found)))
}

/// Change a user's role and company
///
/// Tokens already issued keep the old profile until the user logs in again.
///
/// PUT /api/user-profiles/:id
pub async fn update_user_profile(
    State(state): State<AppState>,
    JwtAuth(user): JwtAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    state.gate.authorize(&user, Permission::ManageUsers)?;

    let profile = UserProfile {
        role: req.role,
        company_id: req.company_id,
    };
    state
        .repositories
        .users
        .update_profile(id, profile)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => ApiError::bad_request(format!(
                "Unknown company: {}",
                req.company_id.map(|c| c.to_string()).unwrap_or_default()
            )),
            RepositoryError::NotFound { .. } => ApiError::not_found("User not found"),
            other => other.into(),
        })?;

    let updated = state
        .repositories
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!(user_id = %id, role = %profile.role, "User profile updated");
    state
        .record(user.user_id, AuditAction::Update, ENTITY, id.to_string())
        .await;

    Ok(Json(UserResponse::from(&updated)))
}
