//! Bulk import of companies and employees from uploaded tabular files
//!
//! The pipeline runs in three steps: [`format`] picks a reader from the file
//! name, [`parser`] turns the bytes into [`row::Row`]s, and the
//! [`coordinator`] coerces rows into domain records and stores them in one
//! atomic batch.

pub mod coordinator;
pub mod errors;
pub mod format;
pub mod parser;
pub mod row;

pub use coordinator::{BulkIngestionCoordinator, IngestReport, RecordKind, UploadedFile};
pub use errors::IngestError;
pub use format::FileFormat;
pub use row::{CellValue, Row};
