//! View models produced by the storage service.
//!
//! These are rebuilt from Dropbox responses on every request and are
//! serialized as-is by the JSON routes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dropbox::types::{FileMetadata, FullAccount, SharedLinkMetadata, SpaceUsage};
use crate::dropbox::Metadata;

/// Bytes in a megabyte.
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert bytes to megabytes rounded to two decimals. `None` is zero.
pub fn bytes_to_mb(bytes: Option<u64>) -> f64 {
    match bytes {
        Some(bytes) => round2(bytes as f64 / BYTES_PER_MB),
        None => 0.0,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Account owner information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountInfo {
    pub name: String,
    pub email: String,
    pub country: Option<String>,
    pub profile_photo_url: Option<String>,
}

impl From<FullAccount> for AccountInfo {
    fn from(account: FullAccount) -> Self {
        Self {
            name: account.name.display_name,
            email: account.email,
            country: account.country,
            profile_photo_url: account.profile_photo_url,
        }
    }
}

/// Storage usage in megabytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageUsage {
    pub used: f64,
    pub allocated: f64,
    pub free: f64,
    pub used_percentage: f64,
}

impl From<SpaceUsage> for StorageUsage {
    fn from(usage: SpaceUsage) -> Self {
        let used = usage.used;
        let allocated = usage.allocation.allocated();

        // Negative when the account is over quota.
        let free = if allocated > 0 {
            allocated as f64 - used as f64
        } else {
            0.0
        };

        let used_percentage = if allocated > 0 {
            used as f64 / allocated as f64 * 100.0
        } else {
            0.0
        };

        Self {
            used: bytes_to_mb(Some(used)),
            allocated: bytes_to_mb(Some(allocated)),
            free: round2(free / BYTES_PER_MB),
            used_percentage,
        }
    }
}

/// Size and modification time, present on file entries only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDetails {
    pub size: u64,
    pub size_mb: f64,
    pub modified: Option<DateTime<Utc>>,
}

impl From<&FileMetadata> for FileDetails {
    fn from(file: &FileMetadata) -> Self {
        Self {
            size: file.size,
            size_mb: bytes_to_mb(Some(file.size)),
            modified: file.server_modified,
        }
    }
}

/// A file or folder inside a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    /// Lowercased full path.
    pub path: String,
    pub is_folder: bool,
    #[serde(flatten)]
    pub file: Option<FileDetails>,
}

impl DirectoryEntry {
    /// Build an entry from metadata. Deleted entries have no listing entry.
    pub fn from_metadata(meta: &Metadata) -> Option<Self> {
        let file = match meta {
            Metadata::File(f) => Some(FileDetails::from(f)),
            Metadata::Folder(_) => None,
            Metadata::Deleted(_) => return None,
        };

        Some(Self {
            name: meta.name().to_string(),
            path: meta.path_lower().unwrap_or_default().to_string(),
            is_folder: matches!(meta, Metadata::Folder(_)),
            file,
        })
    }
}

/// Metadata of a single item, as shown by `/metadata`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMetadata {
    #[serde(flatten)]
    pub entry: DirectoryEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl ItemMetadata {
    /// Build item metadata. Deleted entries have none.
    pub fn from_metadata(meta: &Metadata) -> Option<Self> {
        let entry = DirectoryEntry::from_metadata(meta)?;
        let content_hash = match meta {
            Metadata::File(f) => f.content_hash.clone(),
            _ => None,
        };
        Some(Self {
            entry,
            content_hash,
        })
    }
}

/// A public shared link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedLink {
    pub url: String,
    pub name: String,
    pub path: Option<String>,
}

impl From<SharedLinkMetadata> for SharedLink {
    fn from(link: SharedLinkMetadata) -> Self {
        Self {
            url: link.url,
            name: link.name,
            path: link.path_lower,
        }
    }
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch {
    pub name: String,
    pub path: String,
    pub is_folder: bool,
    /// Provider match kind (`filename`, `content`, `both`, ...).
    pub match_type: String,
}

/// Result of creating a folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedFolder {
    /// Name of the new folder.
    pub folder: String,
}

/// Result of uploading a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    /// Name of the stored file.
    pub file: String,
}

/// Result of creating (or finding) a shared link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedLink {
    pub url: String,
}

/// A downloaded file held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}
