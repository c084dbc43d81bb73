//! Query and form bindings.
//!
//! Optional fields default to `""`; required fields are rejected by the
//! extractor before a handler runs.

use serde::Deserialize;

/// `GET /folder` query.
#[derive(Debug, Default, Deserialize)]
pub struct FolderQuery {
    /// Folder path; empty is the root.
    #[serde(default)]
    pub path: String,
    /// Flash error message from a redirect.
    #[serde(default)]
    pub error: Option<String>,
    /// Flash success message from a redirect.
    #[serde(default)]
    pub success: Option<String>,
}

/// Query carrying an optional folder path.
#[derive(Debug, Default, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub path: String,
}

/// `GET /search` query.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Search text; empty means no search.
    #[serde(default)]
    pub q: String,
    /// Folder to search in; empty is the whole account.
    #[serde(default)]
    pub path: String,
}

/// Query naming a single file or folder.
#[derive(Debug, Deserialize)]
pub struct FilePathQuery {
    pub file_path: String,
}

/// `POST /create-folder` form.
#[derive(Debug, Deserialize)]
pub struct CreateFolderForm {
    /// Parent folder.
    #[serde(default)]
    pub path: String,
    pub folder_name: String,
}

/// `POST /delete` and `POST /share` form.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub item_path: String,
    /// Folder to return to.
    #[serde(default)]
    pub current_path: String,
}
