// Domain layer module exports
// Entities, value objects and repository ports; no infrastructure concerns

pub mod audit;
pub mod company;
pub mod employee;
pub mod employment_history;
pub mod repositories;
pub mod user;
