//! HTTP client for the Dropbox API v2.
//!
//! RPC endpoints take a JSON body; content endpoints take their arguments
//! in the `Dropbox-API-Arg` header and carry file bytes in the body.

use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value as JsonValue};

use super::error::DropboxError;
use super::types::{
    CreateFolderResult, DeleteResult, Download, FileMetadata, FolderMetadata, FullAccount,
    ListFolderResult, ListSharedLinksResult, Metadata, SearchResult, SharedLinkMetadata,
    SpaceUsage,
};
use crate::config::DropboxConfig;
use crate::{AppError, Result};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("dropbox-web/", env!("CARGO_PKG_VERSION"));

/// Header carrying content-endpoint arguments.
const API_ARG_HEADER: &str = "Dropbox-API-Arg";

/// Header carrying download metadata.
const API_RESULT_HEADER: &str = "Dropbox-API-Result";

/// Result type for remote calls.
pub type ApiResult<T> = std::result::Result<T, DropboxError>;

/// Normalize a path for the Dropbox API: root is `""`, everything else
/// starts with a single `/` and has no trailing `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Serialize a header argument, escaping every non-ASCII character as
/// `\uXXXX` so the value is a valid HTTP header.
pub fn header_safe_json(value: &JsonValue) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// Dropbox API client bound to one access token.
#[derive(Debug, Clone)]
pub struct DropboxClient {
    http: Client,
    token: String,
    api_base: String,
    content_base: String,
}

impl DropboxClient {
    /// Create a client from configuration.
    ///
    /// Fails when the token is empty or the HTTP client cannot be built.
    pub fn new(config: &DropboxConfig) -> Result<Self> {
        if !config.has_token() {
            return Err(AppError::Validation(
                "Dropbox access token is not set".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Client(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            token: config.access_token.trim().to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            content_base: config.content_base.trim_end_matches('/').to_string(),
        })
    }

    /// Call an RPC endpoint. `None` sends no body.
    async fn rpc<T: DeserializeOwned>(&self, endpoint: &str, body: Option<JsonValue>) -> ApiResult<T> {
        let url = format!("{}/{}", self.api_base, endpoint);
        tracing::debug!(endpoint, "Dropbox RPC call");

        let mut request = self.http.post(&url).bearer_auth(&self.token);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(DropboxError::from_response(
                status.as_u16(),
                &String::from_utf8_lossy(&bytes),
            ));
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| DropboxError::Decode(format!("{endpoint}: {e}")))
    }

    /// Get the account linked to the token.
    pub async fn get_current_account(&self) -> ApiResult<FullAccount> {
        self.rpc("users/get_current_account", None).await
    }

    /// Get space usage and allocation.
    pub async fn get_space_usage(&self) -> ApiResult<SpaceUsage> {
        self.rpc("users/get_space_usage", None).await
    }

    /// List a folder, following the cursor until every entry is fetched.
    pub async fn list_folder(&self, path: &str) -> ApiResult<Vec<Metadata>> {
        let body = json!({
            "path": normalize_path(path),
            "recursive": false,
            "include_deleted": false
        });

        let mut page: ListFolderResult = self.rpc("files/list_folder", Some(body)).await?;
        let mut entries = std::mem::take(&mut page.entries);

        while page.has_more {
            let body = json!({ "cursor": page.cursor });
            page = self.rpc("files/list_folder/continue", Some(body)).await?;
            entries.append(&mut page.entries);
        }

        Ok(entries)
    }

    /// Get metadata of a file or folder.
    pub async fn get_metadata(&self, path: &str) -> ApiResult<Metadata> {
        let body = json!({ "path": normalize_path(path) });
        self.rpc("files/get_metadata", Some(body)).await
    }

    /// Create a folder. Fails if something already exists at the path.
    pub async fn create_folder(&self, path: &str) -> ApiResult<FolderMetadata> {
        let body = json!({
            "path": normalize_path(path),
            "autorename": false
        });
        let result: CreateFolderResult = self.rpc("files/create_folder_v2", Some(body)).await?;
        Ok(result.metadata)
    }

    /// Delete a file or a folder with its contents.
    pub async fn delete(&self, path: &str) -> ApiResult<Metadata> {
        let body = json!({ "path": normalize_path(path) });
        let result: DeleteResult = self.rpc("files/delete_v2", Some(body)).await?;
        Ok(result.metadata)
    }

    /// Upload bytes to a path, overwriting any existing file.
    pub async fn upload(&self, path: &str, content: Vec<u8>) -> ApiResult<FileMetadata> {
        let arg = json!({
            "path": normalize_path(path),
            "mode": "overwrite",
            "autorename": false,
            "mute": false
        });
        let url = format!("{}/files/upload", self.content_base);
        tracing::debug!(bytes = content.len(), "Dropbox upload");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(API_ARG_HEADER, header_safe_json(&arg))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(content)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(DropboxError::from_response(
                status.as_u16(),
                &String::from_utf8_lossy(&bytes),
            ));
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| DropboxError::Decode(format!("files/upload: {e}")))
    }

    /// Download a file into memory.
    pub async fn download(&self, path: &str) -> ApiResult<Download> {
        let arg = json!({ "path": normalize_path(path) });
        let url = format!("{}/files/download", self.content_base);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(API_ARG_HEADER, header_safe_json(&arg))
            .send()
            .await?;

        let status = response.status();
        let metadata = parse_api_result(response.headers());
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(DropboxError::from_response(
                status.as_u16(),
                &String::from_utf8_lossy(&bytes),
            ));
        }

        Ok(Download {
            metadata,
            content: bytes.to_vec(),
        })
    }

    /// Create a public shared link.
    pub async fn create_shared_link(&self, path: &str) -> ApiResult<SharedLinkMetadata> {
        let body = json!({
            "path": normalize_path(path),
            "settings": {
                "requested_visibility": "public"
            }
        });
        self.rpc("sharing/create_shared_link_with_settings", Some(body))
            .await
    }

    /// List shared links, either all of them or only those of one path.
    /// Follows the cursor until every page is fetched.
    pub async fn list_shared_links(&self, path: Option<&str>) -> ApiResult<Vec<SharedLinkMetadata>> {
        let mut body = match path {
            Some(path) => json!({ "path": normalize_path(path), "direct_only": true }),
            None => json!({}),
        };

        let mut page: ListSharedLinksResult =
            self.rpc("sharing/list_shared_links", Some(body.clone())).await?;
        let mut links = std::mem::take(&mut page.links);

        while page.has_more {
            let Some(cursor) = page.cursor.take() else {
                break;
            };
            body["cursor"] = JsonValue::String(cursor);
            page = self.rpc("sharing/list_shared_links", Some(body.clone())).await?;
            links.append(&mut page.links);
        }

        Ok(links)
    }

    /// Search file and folder names.
    pub async fn search(
        &self,
        query: &str,
        path: Option<&str>,
        max_results: u64,
    ) -> ApiResult<SearchResult> {
        let mut options = json!({
            "max_results": max_results,
            "filename_only": true
        });
        if let Some(path) = path {
            options["path"] = JsonValue::String(normalize_path(path));
        }

        let body = json!({
            "query": query,
            "options": options
        });
        self.rpc("files/search_v2", Some(body)).await
    }
}

/// Decode the `Dropbox-API-Result` header of a download response.
fn parse_api_result(headers: &HeaderMap) -> Option<FileMetadata> {
    let value = headers.get(API_RESULT_HEADER)?.to_str().ok()?;
    match serde_json::from_str(value) {
        Ok(meta) => Some(meta),
        Err(e) => {
            tracing::debug!("Ignoring undecodable {}: {}", API_RESULT_HEADER, e);
            None
        }
    }
}
