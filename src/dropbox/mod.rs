//! Dropbox API v2 client.
//!
//! A thin typed layer over the HTTP endpoints used by the web manager.
//! Every non-success response is classified into a [`DropboxError`].

mod client;
mod error;
pub mod types;

pub use client::{header_safe_json, normalize_path, ApiResult, DropboxClient};
pub use error::DropboxError;
pub use types::{Download, Metadata, SpaceAllocation};
