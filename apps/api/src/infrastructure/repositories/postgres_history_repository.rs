use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::like_pattern;
use crate::domain::employment_history::EmploymentHistory;
use crate::domain::repositories::errors::RepositoryResult;
use crate::domain::repositories::{EmploymentHistoryRepository, HistoryQuery, HistorySortField};

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    employee_id: Uuid,
    company_id: Uuid,
    department: String,
    role: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl From<HistoryRow> for EmploymentHistory {
    fn from(row: HistoryRow) -> Self {
        EmploymentHistory {
            id: row.id,
            employee_id: row.employee_id,
            company_id: row.company_id,
            department: row.department,
            role: row.role,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

/// PostgreSQL implementation of EmploymentHistoryRepository
pub struct PostgresHistoryRepository {
    pool: PgPool,
}

impl PostgresHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PostgresHistoryRepository {
    fn sort_column(field: HistorySortField) -> &'static str {
        match field {
            HistorySortField::StartDate => "h.start_date",
            HistorySortField::EndDate => "h.end_date",
        }
    }
}

#[async_trait]
impl EmploymentHistoryRepository for PostgresHistoryRepository {
    async fn list(&self, query: &HistoryQuery) -> RepositoryResult<Vec<EmploymentHistory>> {
        let filter = &query.filter;
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT h.id, h.employee_id, h.company_id, h.department, h.role, h.start_date, h.end_date \
             FROM employment_history h \
             JOIN employees e ON e.id = h.employee_id \
             JOIN companies c ON c.id = h.company_id \
             WHERE TRUE",
        );

        if let Some(employee_id) = filter.employee_id {
            builder.push(" AND h.employee_id = ").push_bind(employee_id);
        }
        if let Some(company_id) = filter.company_id {
            builder.push(" AND h.company_id = ").push_bind(company_id);
        }
        if let Some(department) = &filter.department {
            builder.push(" AND h.department = ").push_bind(department.clone());
        }
        if let Some(date) = filter.start_date {
            builder.push(" AND h.start_date = ").push_bind(date);
        }
        if let Some(date) = filter.end_date {
            builder.push(" AND h.end_date = ").push_bind(date);
        }
        if let Some(search) = &filter.search {
            let pattern = like_pattern(search);
            builder
                .push(" AND (e.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR h.role ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        builder
            .push(" ORDER BY ")
            .push(Self::sort_column(query.ordering.field))
            .push(if query.ordering.descending { " DESC" } else { " ASC" })
            .push(", h.id ASC");

        let rows = builder
            .build_query_as::<HistoryRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(EmploymentHistory::from).collect())
    }
}
