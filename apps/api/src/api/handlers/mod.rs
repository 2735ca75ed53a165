pub mod audit_logs;
pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod employees;
pub mod employment_history;
pub mod search;
pub mod user_profiles;

use axum::extract::Multipart;

use crate::api::errors::ApiError;
use crate::ingest::UploadedFile;

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

/// Pulls the `file` field out of a multipart body, ignoring other fields
pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        return Ok(Some(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}
