//! Form actions. Each one redirects back to the folder page.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Response,
    Form,
};

use super::{redirect_to_folder, AppState, Flash};
use crate::storage::join_path;
use crate::web::dto::{CreateFolderForm, ItemForm};
use crate::web::error::ApiError;

/// POST /create-folder
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateFolderForm>,
) -> Result<Response, ApiError> {
    let storage = state.storage()?;

    let folder_path = join_path(&form.path, &form.folder_name);
    let flash = match storage.create_folder(&folder_path).await {
        Ok(_) => Flash::Success(format!("Folder '{}' created", form.folder_name)),
        Err(e) => Flash::Error(e.to_string()),
    };

    Ok(redirect_to_folder(&form.path, flash))
}

/// POST /delete
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ItemForm>,
) -> Result<Response, ApiError> {
    let storage = state.storage()?;

    let flash = match storage.delete_item(&form.item_path).await {
        Ok(()) => Flash::Success("Item deleted".to_string()),
        Err(e) => Flash::Error(e.to_string()),
    };

    Ok(redirect_to_folder(&form.current_path, flash))
}

/// POST /share
pub async fn share(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ItemForm>,
) -> Result<Response, ApiError> {
    let storage = state.storage()?;

    let flash = match storage.create_shared_link(&form.item_path).await {
        Ok(link) => Flash::Success(format!("Link created: {}", link.url)),
        Err(e) => Flash::Error(e.to_string()),
    };

    Ok(redirect_to_folder(&form.current_path, flash))
}

/// Strip any directory part a browser may send with the file name.
fn upload_file_name(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim()
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Upload exceeds the maximum size")
    } else {
        tracing::warn!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    }
}

/// POST /upload - Multipart `path` and `file`.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let storage = state.storage()?;

    let mut path = String::new();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "path" => {
                path = field.text().await.map_err(multipart_error)?;
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(|raw| upload_file_name(raw).to_string())
                    .unwrap_or_default();
                let content = field.bytes().await.map_err(multipart_error)?.to_vec();
                file = Some((filename, content));
            }
            _ => {}
        }
    }

    let (filename, content) = file.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    if filename.is_empty() {
        return Err(ApiError::bad_request("No file provided"));
    }

    if content.len() > state.max_upload_bytes {
        let max_mb = state.max_upload_bytes / 1024 / 1024;
        return Err(ApiError::payload_too_large(format!(
            "File too large (max {}MB)",
            max_mb
        )));
    }

    let file_path = join_path(&path, &filename);
    let flash = match storage.upload_file(content, &file_path).await {
        Ok(_) => Flash::Success(format!("File '{}' uploaded", filename)),
        Err(e) => Flash::Error(e.to_string()),
    };

    Ok(redirect_to_folder(&path, flash))
}
