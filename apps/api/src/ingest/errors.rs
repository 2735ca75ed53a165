use thiserror::Error;

use crate::domain::repositories::RepositoryError;

/// Failures of a bulk upload; none of them leaves partial data behind
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No file provided")]
    MissingFile,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// A row could not be turned into a record; `row` is the 1-based data row
    #[error("Row {row}: {message}")]
    RowCoercion { row: usize, message: String },

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl IngestError {
    pub fn row(row: usize, field: &str, detail: impl std::fmt::Display) -> Self {
        IngestError::RowCoercion {
            row,
            message: format!("{}: {}", field, detail),
        }
    }
}
