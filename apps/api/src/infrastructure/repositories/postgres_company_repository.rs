use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use uuid::Uuid;

use super::like_pattern;
use crate::domain::company::{Company, CompanyDetails, Departments};
use crate::domain::repositories::company_repository::match_references;
use crate::domain::repositories::errors::RepositoryResult;
use crate::domain::repositories::{
    CompanyQuery, CompanyRepository, CompanySortField, RepositoryError,
};

const COMPANY_COLUMNS: &str = "id, name, registration_date, registration_number, address, \
     contact_person, departments, employee_count, phone, email, created_at";

/// Rows per INSERT statement; keeps bind parameters under the Postgres limit
const INSERT_CHUNK: usize = 1000;

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    registration_date: NaiveDate,
    registration_number: String,
    address: String,
    contact_person: String,
    departments: Vec<String>,
    employee_count: i32,
    phone: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company::from_persistence(
            row.id,
            CompanyDetails {
                name: row.name,
                registration_date: row.registration_date,
                registration_number: row.registration_number,
                address: row.address,
                contact_person: row.contact_person,
                departments: Departments::new(row.departments),
                employee_count: row.employee_count,
                phone: row.phone,
                email: row.email,
            },
            row.created_at,
        )
    }
}

/// PostgreSQL implementation of CompanyRepository
pub struct PostgresCompanyRepository {
    pool: PgPool,
}

impl PostgresCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn sort_column(field: CompanySortField) -> &'static str {
        match field {
            CompanySortField::Name => "name",
            CompanySortField::RegistrationDate => "registration_date",
            CompanySortField::EmployeeCount => "employee_count",
        }
    }
}

fn push_company_values<'a>(builder: &mut QueryBuilder<'a, Postgres>, companies: &'a [Company]) {
    builder.push_values(companies, |mut row, company| {
        row.push_bind(company.id())
            .push_bind(company.name())
            .push_bind(company.registration_date())
            .push_bind(company.registration_number())
            .push_bind(company.address())
            .push_bind(company.contact_person())
            .push_bind(company.departments().as_slice().to_vec())
            .push_bind(company.employee_count())
            .push_bind(company.phone())
            .push_bind(company.email())
            .push_bind(company.created_at());
    });
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn create(&self, company: &Company) -> RepositoryResult<()> {
        self.create_batch(std::slice::from_ref(company)).await?;
        Ok(())
    }

    async fn create_batch(&self, companies: &[Company]) -> RepositoryResult<usize> {
        if companies.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        for chunk in companies.chunks(INSERT_CHUNK) {
            let mut builder = QueryBuilder::new(format!("INSERT INTO companies ({}) ", COMPANY_COLUMNS));
            push_company_values(&mut builder, chunk);
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        Ok(companies.len())
    }

    async fn update(&self, company: &Company) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE companies SET
                name = $2,
                registration_date = $3,
                registration_number = $4,
                address = $5,
                contact_person = $6,
                departments = $7,
                employee_count = $8,
                phone = $9,
                email = $10
            WHERE id = $1
            "#,
        )
        .bind(company.id())
        .bind(company.name())
        .bind(company.registration_date())
        .bind(company.registration_number())
        .bind(company.address())
        .bind(company.contact_person())
        .bind(company.departments().as_slice().to_vec())
        .bind(company.employee_count())
        .bind(company.phone())
        .bind(company.email())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Company", company.id()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Company", id));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Company::from))
    }

    async fn list(&self, query: &CompanyQuery) -> RepositoryResult<Vec<Company>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM companies WHERE TRUE",
            COMPANY_COLUMNS
        ));

        if let Some(search) = &query.search {
            let pattern = like_pattern(search);
            builder
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR registration_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR contact_person ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(date) = query.registration_date {
            builder.push(" AND registration_date = ").push_bind(date);
        }
        if let Some(count) = query.employee_count {
            builder.push(" AND employee_count = ").push_bind(count);
        }

        builder
            .push(" ORDER BY ")
            .push(Self::sort_column(query.ordering.field))
            .push(if query.ordering.descending { " DESC" } else { " ASC" })
            .push(", id ASC");

        if let Some(page) = query.page {
            builder
                .push(" LIMIT ")
                .push_bind(page.limit as i64)
                .push(" OFFSET ")
                .push_bind(page.offset as i64);
        }

        let rows = builder
            .build_query_as::<CompanyRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companies")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn resolve_references(
        &self,
        references: &[String],
    ) -> RepositoryResult<HashMap<String, Uuid>> {
        if references.is_empty() {
            return Ok(HashMap::new());
        }

        let trimmed: Vec<String> = references.iter().map(|r| r.trim().to_string()).collect();
        let lowered: Vec<String> = trimmed.iter().map(|r| r.to_lowercase()).collect();

        let candidates: Vec<(Uuid, String, String)> = sqlx::query_as(
            r#"
            SELECT id, registration_number, name
            FROM companies
            WHERE registration_number = ANY($1) OR LOWER(name) = ANY($2)
            "#,
        )
        .bind(&trimmed)
        .bind(&lowered)
        .fetch_all(&self.pool)
        .await?;

        Ok(match_references(
            references,
            candidates
                .iter()
                .map(|(id, number, name)| (*id, number.as_str(), name.as_str())),
        ))
    }
}
