//! Dropbox Web Manager
//!
//! A server-rendered web front end over one Dropbox account: folder
//! browsing, uploads, downloads, shared links and filename search.

pub mod config;
pub mod dropbox;
pub mod error;
pub mod logging;
pub mod storage;
pub mod template;
pub mod web;

pub use config::Config;
pub use dropbox::{DropboxClient, DropboxError};
pub use error::{AppError, Result};
pub use storage::{StorageError, StorageService};
pub use web::{AppState, WebServer};
