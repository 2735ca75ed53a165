use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::PasswordHasher;
use crate::domain::repositories::{RepositoryError, User};
use crate::domain::user::{Email, UserProfile, UserRole};

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Company the new user belongs to, if any
    #[serde(default)]
    pub company_id: Option<Uuid>,
}

/// Public view of a user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            full_name: user.full_name.clone(),
            role: user.profile.role,
            company_id: user.profile.company_id,
        }
    }
}

/// Response from successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
}

/// Register a new user
///
/// New accounts get the read-only `viewer` role; an admin grants other roles
/// through `/api/user-profiles`.
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let email = Email::new(&req.email).map_err(|e| ApiError::bad_request(e))?;

    PasswordHasher::validate(&req.password).map_err(|e| ApiError::bad_request(e))?;

    let full_name = req.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(ApiError::bad_request("Full name cannot be empty"));
    }

    if let Some(company_id) = req.company_id {
        if state.repositories.companies.find_by_id(company_id).await?.is_none() {
            return Err(ApiError::bad_request(format!("Unknown company: {}", company_id)));
        }
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to hash password: {}", e)))?;

    let user = User {
        id: Uuid::new_v4(),
        email,
        password_hash,
        full_name,
        is_active: true,
        profile: UserProfile {
            role: UserRole::Viewer,
            company_id: req.company_id,
        },
    };
    let response_user = UserResponse::from(&user);
    let profile = user.profile;

    let user_id = state.repositories.users.create(user).await.map_err(|e| match e {
        RepositoryError::Conflict(_) => ApiError::bad_request("Email already registered"),
        other => other.into(),
    })?;

    let token = state
        .tokens
        .issue(user_id, profile)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    tracing::info!(%user_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token,
            user: response_user,
        }),
    ))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = Email::new(&req.email).map_err(|e| ApiError::bad_request(e))?;

    let user = state
        .repositories
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized("Account is disabled"));
    }

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| {
            ApiError::internal_server_error(format!("Password verification failed: {}", e))
        })?;

    if !valid {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    if let Err(e) = state.repositories.users.update_last_login(user.id).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to record last login");
    }

    let token = state
        .tokens
        .issue(user.id, user.profile)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
    }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
