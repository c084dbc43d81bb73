//! Wire types for the Dropbox API v2.
//!
//! Dropbox encodes unions as JSON objects with a `.tag` field. They are
//! decoded here into Rust enums so callers match on variants instead of
//! probing for fields.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// File, folder or deleted-entry metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum Metadata {
    /// A file.
    File(FileMetadata),
    /// A folder.
    Folder(FolderMetadata),
    /// A deleted entry (only returned when deleted entries are requested).
    Deleted(DeletedMetadata),
}

impl Metadata {
    /// Last path component.
    pub fn name(&self) -> &str {
        match self {
            Metadata::File(f) => &f.name,
            Metadata::Folder(f) => &f.name,
            Metadata::Deleted(d) => &d.name,
        }
    }

    /// Lowercased full path, if the entry is mounted.
    pub fn path_lower(&self) -> Option<&str> {
        match self {
            Metadata::File(f) => f.path_lower.as_deref(),
            Metadata::Folder(f) => f.path_lower.as_deref(),
            Metadata::Deleted(d) => d.path_lower.as_deref(),
        }
    }
}

/// Metadata of a file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub path_display: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub client_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub server_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rev: Option<String>,
    #[serde(default)]
    pub content_hash: Option<String>,
}

/// Metadata of a folder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FolderMetadata {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub path_display: Option<String>,
}

/// Metadata of a deleted entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeletedMetadata {
    pub name: String,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub path_display: Option<String>,
}

/// `files/list_folder` and `files/list_folder/continue` result.
#[derive(Debug, Deserialize)]
pub struct ListFolderResult {
    pub entries: Vec<Metadata>,
    pub cursor: String,
    pub has_more: bool,
}

/// `files/create_folder_v2` result.
#[derive(Debug, Deserialize)]
pub struct CreateFolderResult {
    pub metadata: FolderMetadata,
}

/// `files/delete_v2` result.
#[derive(Debug, Deserialize)]
pub struct DeleteResult {
    pub metadata: Metadata,
}

/// Display name parts of an account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountName {
    pub display_name: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
}

/// `users/get_current_account` result.
#[derive(Debug, Clone, Deserialize)]
pub struct FullAccount {
    pub account_id: Option<String>,
    pub name: AccountName,
    pub email: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
}

/// Space allocation of an account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum SpaceAllocation {
    /// Individual account quota.
    Individual { allocated: u64 },
    /// Team quota shared by all members.
    Team { used: u64, allocated: u64 },
    /// Any allocation kind this client does not know.
    #[serde(other)]
    Other,
}

impl SpaceAllocation {
    /// Allocated bytes, or zero when the allocation shape is unknown.
    pub fn allocated(&self) -> u64 {
        match self {
            SpaceAllocation::Individual { allocated } => *allocated,
            SpaceAllocation::Team { allocated, .. } => *allocated,
            SpaceAllocation::Other => 0,
        }
    }
}

/// `users/get_space_usage` result.
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceUsage {
    pub used: u64,
    pub allocation: SpaceAllocation,
}

/// A shared link as returned by the sharing endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SharedLinkMetadata {
    /// `file` or `folder`.
    #[serde(rename = ".tag", default)]
    pub kind: Option<String>,
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub path_lower: Option<String>,
}

/// `sharing/list_shared_links` result.
#[derive(Debug, Deserialize)]
pub struct ListSharedLinksResult {
    pub links: Vec<SharedLinkMetadata>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Wrapper around the metadata of a search match.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum MetadataV2 {
    /// Regular metadata.
    Metadata { metadata: Metadata },
    /// Any other kind of match this client does not know.
    #[serde(other)]
    Other,
}

/// Kind of a search match.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchMatchType {
    #[serde(rename = ".tag")]
    pub tag: String,
}

/// A single `files/search_v2` match.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchMatch {
    pub metadata: MetadataV2,
    #[serde(default)]
    pub match_type: Option<SearchMatchType>,
}

/// `files/search_v2` result.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub matches: Vec<SearchMatch>,
    #[serde(default)]
    pub has_more: bool,
}

/// A downloaded file and its metadata.
#[derive(Debug)]
pub struct Download {
    /// Metadata from the `Dropbox-API-Result` header, when present.
    pub metadata: Option<FileMetadata>,
    /// File content.
    pub content: Vec<u8>,
}
