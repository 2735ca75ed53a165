//! Employee search: parameter validation, filter composition and paging

pub mod errors;
pub mod paginator;
pub mod query;
pub mod service;

pub use errors::SearchError;
pub use paginator::{Page, Paginator, SearchResponse, PAGE_SIZE};
pub use query::SearchParams;
pub use service::SearchService;
