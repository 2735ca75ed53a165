use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::like_pattern;
use crate::domain::employee::{
    Criterion, Employee, EmployeeDetails, EmployeeFilter, EmployeeWithCompany,
};
use crate::domain::repositories::errors::RepositoryResult;
use crate::domain::repositories::{
    EmployeeQuery, EmployeeRepository, EmployeeSortField, RepositoryError,
};

const EMPLOYEE_COLUMNS: &str = "id, name, employee_id, company_id, department, role, \
     start_date, end_date, duties, created_at";

const JOINED_SELECT: &str = "SELECT e.id, e.name, e.employee_id, e.company_id, e.department, \
     e.role, e.start_date, e.end_date, e.duties, e.created_at, c.name AS company_name \
     FROM employees e JOIN companies c ON c.id = e.company_id";

const INSERT_CHUNK: usize = 1000;

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: Uuid,
    name: String,
    employee_id: String,
    company_id: Uuid,
    department: String,
    role: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    duties: String,
    created_at: DateTime<Utc>,
    company_name: String,
}

impl From<EmployeeRow> for EmployeeWithCompany {
    fn from(row: EmployeeRow) -> Self {
        let employee = Employee::from_persistence(
            row.id,
            EmployeeDetails {
                name: row.name,
                employee_id: row.employee_id,
                company_id: row.company_id,
                department: row.department,
                role: row.role,
                start_date: row.start_date,
                end_date: row.end_date,
                duties: row.duties,
            },
            row.created_at,
        );

        EmployeeWithCompany {
            employee,
            company_name: row.company_name,
        }
    }
}

/// PostgreSQL implementation of EmployeeRepository
///
/// Every read joins `companies` so results carry the company name without a
/// second query.
pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn sort_column(field: EmployeeSortField) -> &'static str {
        match field {
            EmployeeSortField::Name => "e.name",
            EmployeeSortField::StartDate => "e.start_date",
            EmployeeSortField::EndDate => "e.end_date",
            EmployeeSortField::CreatedAt => "e.created_at",
        }
    }
}

/// Renders the filter as a WHERE clause over the joined `e`/`c` aliases
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &EmployeeFilter) {
    builder.push(" WHERE TRUE");

    for criterion in filter.criteria() {
        match criterion {
            Criterion::NameContains(term) => {
                builder.push(" AND e.name ILIKE ").push_bind(like_pattern(term));
            }
            Criterion::EmployeeIdContains(term) => {
                builder
                    .push(" AND e.employee_id ILIKE ")
                    .push_bind(like_pattern(term));
            }
            Criterion::CompanyNameContains(term) => {
                builder.push(" AND c.name ILIKE ").push_bind(like_pattern(term));
            }
            Criterion::DepartmentContains(term) => {
                builder
                    .push(" AND e.department ILIKE ")
                    .push_bind(like_pattern(term));
            }
            Criterion::RoleContains(term) => {
                builder.push(" AND e.role ILIKE ").push_bind(like_pattern(term));
            }
            Criterion::StartDateFrom(date) => {
                builder.push(" AND e.start_date >= ").push_bind(*date);
            }
            Criterion::StartDateTo(date) => {
                builder.push(" AND e.start_date <= ").push_bind(*date);
            }
            Criterion::Active(true) => {
                builder.push(" AND e.end_date IS NULL");
            }
            Criterion::Active(false) => {
                builder.push(" AND e.end_date IS NOT NULL");
            }
            Criterion::CompanyIs(company_id) => {
                builder.push(" AND e.company_id = ").push_bind(*company_id);
            }
            Criterion::DepartmentIs(department) => {
                builder.push(" AND e.department = ").push_bind(department.clone());
            }
            Criterion::StartDateOn(date) => {
                builder.push(" AND e.start_date = ").push_bind(*date);
            }
            Criterion::EndDateOn(date) => {
                builder.push(" AND e.end_date = ").push_bind(*date);
            }
            Criterion::Keyword(term) => {
                let pattern = like_pattern(term);
                builder
                    .push(" AND (e.name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR e.employee_id ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR e.role ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
        }
    }
}

fn push_employee_values<'a>(builder: &mut QueryBuilder<'a, Postgres>, employees: &'a [Employee]) {
    builder.push_values(employees, |mut row, employee| {
        row.push_bind(employee.id())
            .push_bind(employee.name())
            .push_bind(employee.employee_id())
            .push_bind(employee.company_id())
            .push_bind(employee.department())
            .push_bind(employee.role())
            .push_bind(employee.start_date())
            .push_bind(employee.end_date())
            .push_bind(employee.duties())
            .push_bind(employee.created_at());
    });
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn create(&self, employee: &Employee) -> RepositoryResult<()> {
        self.create_batch(std::slice::from_ref(employee)).await?;
        Ok(())
    }

    async fn create_batch(&self, employees: &[Employee]) -> RepositoryResult<usize> {
        if employees.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        for chunk in employees.chunks(INSERT_CHUNK) {
            let mut builder =
                QueryBuilder::new(format!("INSERT INTO employees ({}) ", EMPLOYEE_COLUMNS));
            push_employee_values(&mut builder, chunk);
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        Ok(employees.len())
    }

    async fn update(&self, employee: &Employee) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE employees SET
                name = $2,
                employee_id = $3,
                company_id = $4,
                department = $5,
                role = $6,
                start_date = $7,
                end_date = $8,
                duties = $9
            WHERE id = $1
            "#,
        )
        .bind(employee.id())
        .bind(employee.name())
        .bind(employee.employee_id())
        .bind(employee.company_id())
        .bind(employee.department())
        .bind(employee.role())
        .bind(employee.start_date())
        .bind(employee.end_date())
        .bind(employee.duties())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Employee", employee.id()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Employee", id));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<EmployeeWithCompany>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!("{} WHERE e.id = $1", JOINED_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(EmployeeWithCompany::from))
    }

    async fn list(&self, query: &EmployeeQuery) -> RepositoryResult<Vec<EmployeeWithCompany>> {
        let mut builder = QueryBuilder::<Postgres>::new(JOINED_SELECT);
        push_filter(&mut builder, &query.filter);

        builder
            .push(" ORDER BY ")
            .push(Self::sort_column(query.ordering.field))
            .push(if query.ordering.descending { " DESC" } else { " ASC" })
            .push(", e.id ASC");

        if let Some(page) = query.page {
            builder
                .push(" LIMIT ")
                .push_bind(page.limit as i64)
                .push(" OFFSET ")
                .push_bind(page.offset as i64);
        }

        let rows = builder
            .build_query_as::<EmployeeRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(EmployeeWithCompany::from).collect())
    }

    async fn count(&self, filter: &EmployeeFilter) -> RepositoryResult<i64> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM employees e JOIN companies c ON c.id = e.company_id",
        );
        push_filter(&mut builder, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
