use thiserror::Error;

use crate::domain::repositories::RepositoryError;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Rejected before any query runs
    #[error("Invalid search parameters: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}
