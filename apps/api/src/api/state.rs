use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::api::permissions::PermissionGate;
use crate::auth::{PasswordHasher, TokenIssuer};
use crate::config::{AdminCredentials, AppConfig};
use crate::domain::audit::{AuditAction, AuditLog};
use crate::domain::repositories::{
    AuditLogRepository, CompanyRepository, EmployeeRepository, EmploymentHistoryRepository,
    RepositoryError, User, UserRepository,
};
use crate::domain::user::{Email, UserProfile, UserRole};
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresAuditLogRepository, PostgresCompanyRepository,
    PostgresEmployeeRepository, PostgresHistoryRepository, PostgresUserRepository,
};
use crate::ingest::BulkIngestionCoordinator;
use crate::search::SearchService;

/// One handle per repository port
#[derive(Clone)]
pub struct Repositories {
    pub companies: Arc<dyn CompanyRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub history: Arc<dyn EmploymentHistoryRepository>,
    pub audit_logs: Arc<dyn AuditLogRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            companies: Arc::new(PostgresCompanyRepository::new(pool.clone())),
            employees: Arc::new(PostgresEmployeeRepository::new(pool.clone())),
            history: Arc::new(PostgresHistoryRepository::new(pool.clone())),
            audit_logs: Arc::new(PostgresAuditLogRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool)),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            companies: store.clone(),
            employees: store.clone(),
            history: store.clone(),
            audit_logs: store.clone(),
            users: store,
        }
    }
}

/// Failure to set up the configured admin account
#[derive(Debug, Error)]
pub enum AdminBootstrapError {
    #[error("Invalid admin account: {0}")]
    Invalid(String),

    #[error("Failed to hash admin password: {0}")]
    Hash(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub repositories: Repositories,
    pub ingestion: Arc<BulkIngestionCoordinator>,
    pub search: Arc<SearchService>,
    pub tokens: Arc<TokenIssuer>,
    pub passwords: PasswordHasher,
    pub gate: PermissionGate,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(repositories: Repositories, config: &AppConfig) -> Self {
        let ingestion = BulkIngestionCoordinator::new(
            repositories.companies.clone(),
            repositories.employees.clone(),
        );
        let search = SearchService::new(repositories.employees.clone(), config.search_pagination);

        Self {
            repositories,
            ingestion: Arc::new(ingestion),
            search: Arc::new(search),
            tokens: Arc::new(TokenIssuer::new(&config.jwt_secret, config.jwt_lifetime_hours)),
            passwords: PasswordHasher::new(config.bcrypt_cost),
            gate: PermissionGate,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Ensures the configured account exists and holds the admin role
    ///
    /// An existing account keeps its password and company and is only
    /// promoted. Returns the account id.
    pub async fn ensure_admin(&self, credentials: &AdminCredentials) -> Result<Uuid, AdminBootstrapError> {
        let email = Email::new(&credentials.email).map_err(AdminBootstrapError::Invalid)?;
        let users = &self.repositories.users;

        if let Some(existing) = users.find_by_email(&email).await? {
            if existing.profile.role != UserRole::Admin {
                let profile = UserProfile {
                    role: UserRole::Admin,
                    ..existing.profile
                };
                users.update_profile(existing.id, profile).await?;
                tracing::info!(user_id = %existing.id, "Promoted configured account to admin");
            }
            return Ok(existing.id);
        }

        PasswordHasher::validate(&credentials.password).map_err(AdminBootstrapError::Invalid)?;
        let password_hash = self
            .passwords
            .hash(&credentials.password)
            .map_err(AdminBootstrapError::Hash)?;

        let user_id = users
            .create(User {
                id: Uuid::new_v4(),
                email,
                password_hash,
                full_name: "Administrator".to_string(),
                is_active: true,
                profile: UserProfile {
                    role: UserRole::Admin,
                    company_id: None,
                },
            })
            .await?;
        tracing::info!(%user_id, "Created admin account");

        Ok(user_id)
    }

    /// Appends an audit entry for a completed change
    ///
    /// The change is already committed, so a failed append is logged rather
    /// than reported to the caller.
    pub async fn record(
        &self,
        user_id: Uuid,
        action: AuditAction,
        entity_type: &str,
        entity_id: impl Into<String>,
    ) {
        let entry = AuditLog::record(Some(user_id), action, entity_type, entity_id);

        if let Err(e) = self.repositories.audit_logs.append(&entry).await {
            tracing::error!(
                error = %e,
                %action,
                entity_type,
                entity_id = %entry.entity_id,
                "Failed to append audit entry"
            );
        }
    }
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
