// Repository ports
// Storage contracts implemented by the infrastructure adapters

pub mod audit_log_repository;
pub mod company_repository;
pub mod employee_repository;
pub mod employment_history_repository;
pub mod errors;
pub mod pagination;
pub mod user_repository;

pub use audit_log_repository::{AuditLogQuery, AuditLogRepository, AuditSortField};
pub use company_repository::{match_references, CompanyQuery, CompanyRepository, CompanySortField};
pub use employee_repository::{EmployeeQuery, EmployeeRepository, EmployeeSortField};
pub use employment_history_repository::{
    EmploymentHistoryRepository, HistoryQuery, HistorySortField,
};
pub use errors::RepositoryError;
pub use pagination::{Ordering, PageRequest};
pub use user_repository::{User, UserQuery, UserRepository};
