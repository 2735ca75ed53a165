use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::like_pattern;
use crate::domain::repositories::errors::RepositoryResult;
use crate::domain::repositories::user_repository::{User, UserQuery, UserRepository};
use crate::domain::repositories::RepositoryError;
use crate::domain::user::{Email, UserProfile, UserRole};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: String,
    is_active: bool,
    role: UserRole,
    company_id: Option<Uuid>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(&r.email)
            .map_err(|e| RepositoryError::Storage(format!("Invalid email from database: {}", e)))?;

        Ok(User {
            id: r.id,
            email,
            password_hash: r.password_hash,
            full_name: r.full_name,
            is_active: r.is_active,
            profile: UserProfile {
                role: r.role,
                company_id: r.company_id,
            },
        })
    }
}

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> RepositoryResult<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, full_name, is_active, role, company_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.is_active)
        .bind(user.profile.role)
        .bind(user.profile.company_id)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, full_name, is_active, role, company_id
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, full_name, is_active, role, company_id
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn update_last_login(&self, user_id: Uuid) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_login = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, query: &UserQuery) -> RepositoryResult<Vec<User>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, email, password_hash, full_name, is_active, role, company_id \
             FROM users WHERE TRUE",
        );

        if let Some(role) = query.role {
            builder.push(" AND role = ").push_bind(role);
        }
        if let Some(company_id) = query.company_id {
            builder.push(" AND company_id = ").push_bind(company_id);
        }
        if let Some(search) = &query.search {
            let pattern = like_pattern(search);
            builder
                .push(" AND (email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR full_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        builder.push(" ORDER BY email ASC");

        builder
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn update_profile(&self, user_id: Uuid, profile: UserProfile) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = $2, company_id = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(profile.role)
        .bind(profile.company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("User", user_id));
        }
        Ok(())
    }
}
