use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::auth::TokenIssuer;
use crate::domain::user::UserProfile;

/// Caller identity recovered from a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub profile: UserProfile,
}

/// JWT authentication extractor for protected routes
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(
///     JwtAuth(user): JwtAuth,
/// ) -> Result<String, ApiError> {
///     Ok(format!("Hello {} ({})", user.user_id, user.profile.role))
/// }
/// ```
pub struct JwtAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for JwtAuth
where
    S: Send + Sync,
    Arc<TokenIssuer>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>"))?;

        let issuer = Arc::<TokenIssuer>::from_ref(state);
        let claims = issuer
            .verify(token)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(JwtAuth(AuthenticatedUser {
            user_id: claims.sub,
            profile: claims.profile(),
        }))
    }
}
