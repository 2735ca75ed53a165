use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::like_pattern;
use crate::domain::audit::{AuditAction, AuditLog};
use crate::domain::repositories::errors::RepositoryResult;
use crate::domain::repositories::{AuditLogQuery, AuditLogRepository, AuditSortField};

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    user_id: Option<Uuid>,
    action: AuditAction,
    entity_type: String,
    entity_id: String,
    timestamp: DateTime<Utc>,
}

/// PostgreSQL implementation of AuditLogRepository
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn append(&self, entry: &AuditLog) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, user_id, action, entity_type, entity_id, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.action)
        .bind(&entry.entity_type)
        .bind(&entry.entity_id)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, query: &AuditLogQuery) -> RepositoryResult<Vec<AuditLog>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT a.id, a.user_id, a.action, a.entity_type, a.entity_id, a.timestamp \
             FROM audit_logs a \
             LEFT JOIN users u ON u.id = a.user_id \
             WHERE TRUE",
        );

        if let Some(user_id) = query.user_id {
            builder.push(" AND a.user_id = ").push_bind(user_id);
        }
        if let Some(action) = query.action {
            builder.push(" AND a.action = ").push_bind(action);
        }
        if let Some(entity_type) = &query.entity_type {
            builder.push(" AND a.entity_type = ").push_bind(entity_type.clone());
        }
        if let Some(date) = query.on_date {
            builder
                .push(" AND (a.timestamp AT TIME ZONE 'UTC')::date = ")
                .push_bind(date);
        }
        if let Some(search) = &query.search {
            let pattern = like_pattern(search);
            builder
                .push(" AND (a.entity_type ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR a.entity_id ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        let column = match query.ordering.field {
            AuditSortField::Timestamp => "a.timestamp",
        };
        builder
            .push(" ORDER BY ")
            .push(column)
            .push(if query.ordering.descending { " DESC" } else { " ASC" })
            .push(", a.id ASC LIMIT ")
            .push_bind(query.limit as i64);

        let rows = builder
            .build_query_as::<AuditRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| AuditLog {
                id: r.id,
                user_id: r.user_id,
                action: r.action,
                entity_type: r.entity_type,
                entity_id: r.entity_id,
                timestamp: r.timestamp,
            })
            .collect())
    }
}
