use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering as CmpOrdering;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::audit::AuditLog;
use crate::domain::company::Company;
use crate::domain::employee::{Employee, EmployeeFilter, EmployeeWithCompany};
use crate::domain::employment_history::EmploymentHistory;
use crate::domain::repositories::company_repository::match_references;
use crate::domain::repositories::errors::RepositoryResult;
use crate::domain::repositories::{
    AuditLogQuery, AuditLogRepository, AuditSortField, CompanyQuery, CompanyRepository,
    CompanySortField, EmployeeQuery, EmployeeRepository, EmployeeSortField,
    EmploymentHistoryRepository, HistoryQuery, HistorySortField, RepositoryError, User, UserQuery,
    UserRepository,
};
use crate::domain::user::{Email, UserProfile};

#[derive(Default)]
struct Tables {
    companies: HashMap<Uuid, Company>,
    employees: HashMap<Uuid, Employee>,
    history: Vec<EmploymentHistory>,
    audit_logs: Vec<AuditLog>,
    users: HashMap<Uuid, User>,
    last_login: HashMap<Uuid, DateTime<Utc>>,
}

impl Tables {
    fn check_company_constraints(&self, company: &Company, taken: &HashSet<&str>) -> RepositoryResult<()> {
        let duplicate = taken.contains(company.registration_number())
            || self.companies.values().any(|existing| {
                existing.id() != company.id()
                    && existing.registration_number() == company.registration_number()
            });

        if duplicate {
            return Err(RepositoryError::Conflict(format!(
                "duplicate registration number: {}",
                company.registration_number()
            )));
        }

        Ok(())
    }

    fn check_employee_constraints(&self, employee: &Employee) -> RepositoryResult<()> {
        if !self.companies.contains_key(&employee.company_id()) {
            return Err(RepositoryError::Conflict(format!(
                "employee {} references unknown company {}",
                employee.employee_id(),
                employee.company_id()
            )));
        }

        Ok(())
    }

    fn joined(&self, employee: &Employee) -> EmployeeWithCompany {
        let company_name = self
            .companies
            .get(&employee.company_id())
            .map(|company| company.name().to_string())
            .unwrap_or_default();

        EmployeeWithCompany {
            employee: employee.clone(),
            company_name,
        }
    }
}

/// Process-local storage implementing every repository port
///
/// All tables sit behind one lock, so a batch insert validates and stores its
/// rows without any other writer interleaving. Used by the test suite and
/// when the service runs without `DATABASE_URL`.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a tenure record; history has no write path through the API
    pub async fn insert_history(&self, entry: EmploymentHistory) {
        self.tables.write().await.history.push(entry);
    }

    /// Last successful login recorded for a user
    pub async fn last_login(&self, user_id: Uuid) -> Option<DateTime<Utc>> {
        self.tables.read().await.last_login.get(&user_id).copied()
    }
}

/// NULL end dates sort after every date, as in PostgreSQL
fn compare_optional_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> CmpOrdering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Greater,
        (Some(_), None) => CmpOrdering::Less,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn create(&self, company: &Company) -> RepositoryResult<()> {
        CompanyRepository::create_batch(self, std::slice::from_ref(company)).await?;
        Ok(())
    }

    async fn create_batch(&self, companies: &[Company]) -> RepositoryResult<usize> {
        let mut tables = self.tables.write().await;

        let mut taken = HashSet::new();
        for company in companies {
            tables.check_company_constraints(company, &taken)?;
            taken.insert(company.registration_number());
        }

        for company in companies {
            tables.companies.insert(company.id(), company.clone());
        }

        Ok(companies.len())
    }

    async fn update(&self, company: &Company) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        if !tables.companies.contains_key(&company.id()) {
            return Err(RepositoryError::not_found("Company", company.id()));
        }
        tables.check_company_constraints(company, &HashSet::new())?;
        tables.companies.insert(company.id(), company.clone());

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        if tables.companies.remove(&id).is_none() {
            return Err(RepositoryError::not_found("Company", id));
        }

        tables.employees.retain(|_, employee| employee.company_id() != id);
        let employees: HashSet<Uuid> = tables.employees.keys().copied().collect();
        tables
            .history
            .retain(|entry| entry.company_id != id && employees.contains(&entry.employee_id));

        for user in tables.users.values_mut() {
            if user.profile.company_id == Some(id) {
                user.profile.company_id = None;
            }
        }

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Company>> {
        Ok(self.tables.read().await.companies.get(&id).cloned())
    }

    async fn list(&self, query: &CompanyQuery) -> RepositoryResult<Vec<Company>> {
        let tables = self.tables.read().await;

        let mut companies: Vec<Company> = tables
            .companies
            .values()
            .filter(|company| query.matches(company))
            .cloned()
            .collect();

        companies.sort_by(|a, b| {
            let primary = match query.ordering.field {
                CompanySortField::Name => a.name().cmp(b.name()),
                CompanySortField::RegistrationDate => a.registration_date().cmp(&b.registration_date()),
                CompanySortField::EmployeeCount => a.employee_count().cmp(&b.employee_count()),
            };
            query.ordering.apply(primary).then_with(|| a.id().cmp(&b.id()))
        });

        Ok(match query.page {
            Some(page) => page.slice(companies),
            None => companies,
        })
    }

    async fn count(&self) -> RepositoryResult<i64> {
        Ok(self.tables.read().await.companies.len() as i64)
    }

    async fn resolve_references(
        &self,
        references: &[String],
    ) -> RepositoryResult<HashMap<String, Uuid>> {
        let tables = self.tables.read().await;

        Ok(match_references(
            references,
            tables
                .companies
                .values()
                .map(|company| (company.id(), company.registration_number(), company.name())),
        ))
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn create(&self, employee: &Employee) -> RepositoryResult<()> {
        EmployeeRepository::create_batch(self, std::slice::from_ref(employee)).await?;
        Ok(())
    }

    async fn create_batch(&self, employees: &[Employee]) -> RepositoryResult<usize> {
        let mut tables = self.tables.write().await;

        for employee in employees {
            tables.check_employee_constraints(employee)?;
        }

        for employee in employees {
            tables.employees.insert(employee.id(), employee.clone());
        }

        Ok(employees.len())
    }

    async fn update(&self, employee: &Employee) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        if !tables.employees.contains_key(&employee.id()) {
            return Err(RepositoryError::not_found("Employee", employee.id()));
        }
        tables.check_employee_constraints(employee)?;
        tables.employees.insert(employee.id(), employee.clone());

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        if tables.employees.remove(&id).is_none() {
            return Err(RepositoryError::not_found("Employee", id));
        }
        tables.history.retain(|entry| entry.employee_id != id);

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<EmployeeWithCompany>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.get(&id).map(|employee| tables.joined(employee)))
    }

    async fn list(&self, query: &EmployeeQuery) -> RepositoryResult<Vec<EmployeeWithCompany>> {
        let tables = self.tables.read().await;

        let mut rows: Vec<EmployeeWithCompany> = tables
            .employees
            .values()
            .map(|employee| tables.joined(employee))
            .filter(|row| query.filter.matches(row))
            .collect();

        rows.sort_by(|a, b| {
            let (a_emp, b_emp) = (&a.employee, &b.employee);
            let primary = match query.ordering.field {
                EmployeeSortField::Name => a_emp.name().cmp(b_emp.name()),
                EmployeeSortField::StartDate => a_emp.start_date().cmp(&b_emp.start_date()),
                EmployeeSortField::EndDate => {
                    compare_optional_dates(a_emp.end_date(), b_emp.end_date())
                }
                EmployeeSortField::CreatedAt => a_emp.created_at().cmp(&b_emp.created_at()),
            };
            query
                .ordering
                .apply(primary)
                .then_with(|| a_emp.id().cmp(&b_emp.id()))
        });

        Ok(match query.page {
            Some(page) => page.slice(rows),
            None => rows,
        })
    }

    async fn count(&self, filter: &EmployeeFilter) -> RepositoryResult<i64> {
        let tables = self.tables.read().await;

        let count = tables
            .employees
            .values()
            .filter(|employee| filter.matches(&tables.joined(employee)))
            .count();

        Ok(count as i64)
    }
}

#[async_trait]
impl EmploymentHistoryRepository for InMemoryStore {
    async fn list(&self, query: &HistoryQuery) -> RepositoryResult<Vec<EmploymentHistory>> {
        let tables = self.tables.read().await;

        let mut entries: Vec<EmploymentHistory> = tables
            .history
            .iter()
            .filter(|entry| {
                let employee_name = tables
                    .employees
                    .get(&entry.employee_id)
                    .map(|employee| employee.name())
                    .unwrap_or_default();
                let company_name = tables
                    .companies
                    .get(&entry.company_id)
                    .map(|company| company.name())
                    .unwrap_or_default();
                query.filter.matches(entry, employee_name, company_name)
            })
            .cloned()
            .collect();

        entries.sort_by(|a, b| {
            let primary = match query.ordering.field {
                HistorySortField::StartDate => a.start_date.cmp(&b.start_date),
                HistorySortField::EndDate => compare_optional_dates(a.end_date, b.end_date),
            };
            query.ordering.apply(primary).then_with(|| a.id.cmp(&b.id))
        });

        Ok(entries)
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryStore {
    async fn append(&self, entry: &AuditLog) -> RepositoryResult<()> {
        self.tables.write().await.audit_logs.push(entry.clone());
        Ok(())
    }

    async fn list(&self, query: &AuditLogQuery) -> RepositoryResult<Vec<AuditLog>> {
        let tables = self.tables.read().await;

        let mut entries: Vec<(usize, &AuditLog)> = tables
            .audit_logs
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                query.user_id.map_or(true, |id| entry.user_id == Some(id))
                    && query.action.map_or(true, |action| entry.action == action)
                    && query
                        .entity_type
                        .as_ref()
                        .map_or(true, |entity_type| &entry.entity_type == entity_type)
                    && query
                        .on_date
                        .map_or(true, |date| entry.timestamp.date_naive() == date)
                    && query.search.as_ref().map_or(true, |term| {
                        let email = entry
                            .user_id
                            .and_then(|id| tables.users.get(&id))
                            .map(|user| user.email.as_str())
                            .unwrap_or_default();
                        [entry.entity_type.as_str(), entry.entity_id.as_str(), email]
                            .iter()
                            .any(|text| contains_ignore_case(text, term))
                    })
            })
            .collect();

        // Appends arrive in time order, so position breaks timestamp ties.
        entries.sort_by(|(a_pos, a), (b_pos, b)| {
            let primary = match query.ordering.field {
                AuditSortField::Timestamp => a.timestamp.cmp(&b.timestamp),
            };
            query.ordering.apply(primary.then_with(|| a_pos.cmp(b_pos)))
        });

        Ok(entries
            .into_iter()
            .take(query.limit)
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> RepositoryResult<Uuid> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Conflict(format!(
                "duplicate email: {}",
                user.email
            )));
        }

        if let Some(company_id) = user.profile.company_id {
            if !tables.companies.contains_key(&company_id) {
                return Err(RepositoryError::Conflict(format!(
                    "unknown company {}",
                    company_id
                )));
            }
        }

        let id = user.id;
        tables.users.insert(id, user);

        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|user| &user.email == email).cloned())
    }

    async fn list(&self, query: &UserQuery) -> RepositoryResult<Vec<User>> {
        let tables = self.tables.read().await;

        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|user| query.matches(user))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.email.as_str().cmp(b.email.as_str()));

        Ok(users)
    }

    async fn update_profile(&self, user_id: Uuid, profile: UserProfile) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        if let Some(company_id) = profile.company_id {
            if !tables.companies.contains_key(&company_id) {
                return Err(RepositoryError::Conflict(format!(
                    "unknown company {}",
                    company_id
                )));
            }
        }

        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| RepositoryError::not_found("User", user_id))?;
        user.profile = profile;

        Ok(())
    }

    async fn update_last_login(&self, user_id: Uuid) -> RepositoryResult<()> {
        self.tables.write().await.last_login.insert(user_id, Utc::now());
        Ok(())
    }
}
