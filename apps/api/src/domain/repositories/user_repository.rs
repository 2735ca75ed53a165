use async_trait::async_trait;
use uuid::Uuid;

use super::errors::RepositoryResult;
use crate::domain::user::{Email, UserProfile, UserRole};

/// User data for persistence
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: Email,
    pub password_hash: String,
    pub full_name: String,
    pub is_active: bool,
    pub profile: UserProfile,
}

/// Listing options for users, ordered by email
///
/// `search` is a case-insensitive match on the email or the full name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub role: Option<UserRole>,
    pub company_id: Option<Uuid>,
    pub search: Option<String>,
}

impl UserQuery {
    pub fn matches(&self, user: &User) -> bool {
        self.role.map_or(true, |role| user.profile.role == role)
            && self
                .company_id
                .map_or(true, |id| user.profile.company_id == Some(id))
            && self.search.as_ref().map_or(true, |term| {
                let term = term.to_lowercase();
                user.email.as_str().contains(&term) || user.full_name.to_lowercase().contains(&term)
            })
    }
}

/// Repository trait for users and their profiles
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; a taken email is a `Conflict`
    async fn create(&self, user: User) -> RepositoryResult<Uuid>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;

    async fn list(&self, query: &UserQuery) -> RepositoryResult<Vec<User>>;

    /// Replace a user's role and company; an unknown company is a `Conflict`
    async fn update_profile(&self, user_id: Uuid, profile: UserProfile) -> RepositoryResult<()>;

    /// Update user's last login timestamp
    async fn update_last_login(&self, user_id: Uuid) -> RepositoryResult<()>;
}
