//! Talent Verify API Library
//!
//! Employment verification records: companies, employees and their tenure
//! history, with bulk import from CSV/Excel files and employee search.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ingest;
pub mod search;
