//! JSON response bodies.

use serde::Serialize;

use crate::storage::ItemMetadata;

/// `GET /status` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Whether the Dropbox adapter was constructed at startup.
    pub dropbox_initialized: bool,
    /// Whether an access token was configured.
    pub token_exists: bool,
}

impl StatusResponse {
    pub fn new(dropbox_initialized: bool, token_exists: bool) -> Self {
        Self {
            status: "ok",
            dropbox_initialized,
            token_exists,
        }
    }
}

/// `GET /metadata` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataResponse {
    pub success: bool,
    pub metadata: ItemMetadata,
}

impl MetadataResponse {
    pub fn new(metadata: ItemMetadata) -> Self {
        Self {
            success: true,
            metadata,
        }
    }
}
