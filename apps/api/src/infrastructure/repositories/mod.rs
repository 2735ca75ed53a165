// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_audit_log_repository;
pub mod postgres_company_repository;
pub mod postgres_employee_repository;
pub mod postgres_history_repository;
pub mod postgres_user_repository;

pub use in_memory::InMemoryStore;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_company_repository::PostgresCompanyRepository;
pub use postgres_employee_repository::PostgresEmployeeRepository;
pub use postgres_history_repository::PostgresHistoryRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::repositories::RepositoryError;

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db_error)
                if db_error.is_unique_violation()
                    || db_error.is_foreign_key_violation()
                    || db_error.is_check_violation() =>
            {
                RepositoryError::Conflict(db_error.message().to_string())
            }
            _ => RepositoryError::Storage(error.to_string()),
        }
    }
}

/// Escapes `%`, `_` and `\` so user input is matched literally by ILIKE
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_term() {
        assert_eq!(like_pattern("smith"), "%smith%");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }
}
