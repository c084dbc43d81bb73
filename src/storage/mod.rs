//! Storage adapter over Dropbox.
//!
//! `StorageService` issues one remote call per operation and turns the
//! result into a view model or a [`StorageError`].

pub mod models;
mod paths;
mod service;

pub use models::{
    bytes_to_mb, AccountInfo, CreatedFolder, CreatedLink, DirectoryEntry, DownloadedFile,
    FileDetails, ItemMetadata, SearchMatch, SharedLink, StorageUsage, UploadedFile,
};
pub use paths::{file_name, join_path, parent_path};
pub use service::{StorageError, StorageResult, StorageService};
