// Company domain module
// Contains the company aggregate and its value objects

#![allow(clippy::module_inception)]

pub mod company;
pub mod value_objects;

pub use company::{Company, CompanyDetails};
pub use value_objects::Departments;
