// Employee domain module

#![allow(clippy::module_inception)]

pub mod employee;
pub mod filter;

pub use employee::{Employee, EmployeeDetails, EmployeeWithCompany};
pub use filter::{Criterion, EmployeeFilter};
