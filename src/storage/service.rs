//! Storage service: one method per remote operation.
//!
//! Every method returns `Result<_, StorageError>`. A failed remote call is
//! logged and returned as-is; nothing is retried.

use thiserror::Error;

use super::models::{
    AccountInfo, CreatedFolder, CreatedLink, DirectoryEntry, DownloadedFile, ItemMetadata,
    SearchMatch, SharedLink, StorageUsage, UploadedFile,
};
use super::paths::file_name;
use crate::config::DropboxConfig;
use crate::dropbox::types::MetadataV2;
use crate::dropbox::{ApiResult, DropboxClient, DropboxError};

/// Error returned by the storage service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// A remote call failed.
    #[error("{0}")]
    Remote(#[from] DropboxError),

    /// A search call failed.
    #[error("search failed: {0}")]
    Search(DropboxError),

    /// The path refers to a deleted entry.
    #[error("not found: {0}")]
    Deleted(String),
}

impl StorageError {
    /// The underlying remote error, if any.
    pub fn remote(&self) -> Option<&DropboxError> {
        match self {
            StorageError::Remote(e) | StorageError::Search(e) => Some(e),
            StorageError::Deleted(_) => None,
        }
    }

    /// Whether the error means the item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::Deleted(_) | StorageError::Remote(DropboxError::NotFound(_))
        )
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Log a failed call and convert it.
fn report<T>(operation: &str, result: ApiResult<T>) -> StorageResult<T> {
    result.map_err(|e| {
        tracing::warn!(operation, error = %e, "Dropbox call failed");
        StorageError::Remote(e)
    })
}

/// Adapter over the Dropbox client.
#[derive(Debug, Clone)]
pub struct StorageService {
    client: DropboxClient,
    search_max_results: u64,
}

impl StorageService {
    /// Create the service from configuration.
    pub fn new(config: &DropboxConfig) -> crate::Result<Self> {
        let client = DropboxClient::new(config)?;
        Ok(Self::from_client(client, config.search_max_results))
    }

    /// Create the service from an existing client.
    pub fn from_client(client: DropboxClient, search_max_results: u64) -> Self {
        Self {
            client,
            search_max_results,
        }
    }

    /// Account owner information.
    pub async fn get_user_info(&self) -> StorageResult<AccountInfo> {
        let account = report("get_user_info", self.client.get_current_account().await)?;
        Ok(account.into())
    }

    /// Storage usage in megabytes.
    pub async fn get_storage_info(&self) -> StorageResult<StorageUsage> {
        let usage = report("get_storage_info", self.client.get_space_usage().await)?;
        Ok(usage.into())
    }

    /// Entries of a folder. An empty path lists the root.
    pub async fn list_folder(&self, path: &str) -> StorageResult<Vec<DirectoryEntry>> {
        let entries = report("list_folder", self.client.list_folder(path).await)?;
        Ok(entries
            .iter()
            .filter_map(DirectoryEntry::from_metadata)
            .collect())
    }

    /// Metadata of a single file or folder.
    pub async fn get_metadata(&self, path: &str) -> StorageResult<ItemMetadata> {
        let meta = report("get_metadata", self.client.get_metadata(path).await)?;
        ItemMetadata::from_metadata(&meta).ok_or_else(|| StorageError::Deleted(path.to_string()))
    }

    /// Create a folder at `path`.
    pub async fn create_folder(&self, path: &str) -> StorageResult<CreatedFolder> {
        let folder = report("create_folder", self.client.create_folder(path).await)?;
        tracing::info!(path, "Created folder");
        Ok(CreatedFolder {
            folder: folder.name,
        })
    }

    /// Delete a file or folder.
    pub async fn delete_item(&self, path: &str) -> StorageResult<()> {
        report("delete_item", self.client.delete(path).await)?;
        tracing::info!(path, "Deleted item");
        Ok(())
    }

    /// Upload bytes to `path`, overwriting an existing file.
    pub async fn upload_file(&self, content: Vec<u8>, path: &str) -> StorageResult<UploadedFile> {
        let size = content.len();
        let file = report("upload_file", self.client.upload(path, content).await)?;
        tracing::info!(path, size, "Uploaded file");
        Ok(UploadedFile { file: file.name })
    }

    /// Download a file into memory.
    pub async fn download_file(&self, path: &str) -> StorageResult<DownloadedFile> {
        let download = report("download_file", self.client.download(path).await)?;
        let filename = match download.metadata {
            Some(meta) => meta.name,
            None => file_name(path).to_string(),
        };
        Ok(DownloadedFile {
            filename,
            content: download.content,
        })
    }

    /// Create a public link, or return the existing one for that path.
    pub async fn create_shared_link(&self, path: &str) -> StorageResult<CreatedLink> {
        let err = match self.client.create_shared_link(path).await {
            Ok(link) => {
                tracing::info!(path, url = %link.url, "Created shared link");
                return Ok(CreatedLink { url: link.url });
            }
            Err(err) if err.is_shared_link_already_exists() => err,
            Err(err) => return report("create_shared_link", Err(err)),
        };

        match self.client.list_shared_links(Some(path)).await {
            Ok(links) => match links.into_iter().next() {
                Some(link) => {
                    tracing::info!(path, url = %link.url, "Reusing existing shared link");
                    Ok(CreatedLink { url: link.url })
                }
                None => report("create_shared_link", Err(err)),
            },
            Err(lookup) => {
                tracing::warn!(path, error = %lookup, "Existing shared link lookup failed");
                report("create_shared_link", Err(err))
            }
        }
    }

    /// All shared links of the account.
    pub async fn list_shared_links(&self) -> StorageResult<Vec<SharedLink>> {
        let links = report("list_shared_links", self.client.list_shared_links(None).await)?;
        Ok(links.into_iter().map(SharedLink::from).collect())
    }

    /// Search names under `path` (the whole account when empty).
    pub async fn search(&self, query: &str, path: &str) -> StorageResult<Vec<SearchMatch>> {
        let scope = if path.trim().is_empty() { None } else { Some(path) };

        let result = self
            .client
            .search(query, scope, self.search_max_results)
            .await
            .map_err(|e| {
                tracing::warn!(operation = "search", error = %e, "Dropbox call failed");
                StorageError::Search(e)
            })?;

        Ok(result
            .matches
            .into_iter()
            .filter_map(|m| {
                let meta = match m.metadata {
                    MetadataV2::Metadata { metadata } => metadata,
                    MetadataV2::Other => return None,
                };
                let entry = DirectoryEntry::from_metadata(&meta)?;
                Some(SearchMatch {
                    name: entry.name,
                    path: entry.path,
                    is_folder: entry.is_folder,
                    match_type: m
                        .match_type
                        .map(|t| t.tag)
                        .unwrap_or_else(|| "unknown".to_string()),
                })
            })
            .collect())
    }
}
