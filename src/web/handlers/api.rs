//! Downloads and JSON endpoints.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::Response,
    Json,
};

use super::AppState;
use crate::storage::{AccountInfo, DirectoryEntry, StorageUsage};
use crate::web::dto::{FilePathQuery, MetadataResponse, PathQuery, StatusResponse};
use crate::web::error::ApiError;

/// Build a Content-Disposition value for an attachment.
///
/// Control characters are dropped. Names that are not plain ASCII also get
/// an RFC 5987 `filename*` parameter, with an ASCII fallback in `filename`.
pub fn content_disposition_header(filename: &str) -> String {
    let cleaned: String = filename.chars().filter(|c| !c.is_control()).collect();

    if cleaned.is_ascii() && !cleaned.contains(['"', '\\']) {
        return format!("attachment; filename=\"{}\"", cleaned);
    }

    let fallback: String = cleaned
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            c => c,
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(&cleaned)
    )
}

/// GET /download - File content as an attachment.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilePathQuery>,
) -> Result<Response<Body>, ApiError> {
    let storage = state.storage()?;
    let file = storage.download_file(&query.file_path).await?;

    Response::builder()
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&file.filename),
        )
        .header(header::CONTENT_LENGTH, file.content.len())
        .body(Body::from(file.content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// GET /metadata
pub async fn metadata(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilePathQuery>,
) -> Result<Json<MetadataResponse>, ApiError> {
    let storage = state.storage()?;
    let meta = storage.get_metadata(&query.file_path).await?;
    Ok(Json(MetadataResponse::new(meta)))
}

/// GET /status - Never contacts Dropbox.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse::new(
        state.storage.is_some(),
        state.token_present,
    ))
}

/// GET /api/user
pub async fn api_user(State(state): State<Arc<AppState>>) -> Result<Json<AccountInfo>, ApiError> {
    let storage = state.storage()?;
    Ok(Json(storage.get_user_info().await?))
}

/// GET /api/storage
pub async fn api_storage(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StorageUsage>, ApiError> {
    let storage = state.storage()?;
    Ok(Json(storage.get_storage_info().await?))
}

/// GET /api/folder
pub async fn api_folder(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Json<Vec<DirectoryEntry>>, ApiError> {
    let storage = state.storage()?;
    Ok(Json(storage.list_folder(&query.path).await?))
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
