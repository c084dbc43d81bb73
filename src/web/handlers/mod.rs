//! Route handlers and shared application state.

pub mod actions;
pub mod api;
pub mod pages;

pub use actions::*;
pub use api::*;
pub use pages::*;

use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::config::Config;
use crate::storage::StorageService;
use crate::template::{TemplateContext, TemplateLoader};
use crate::web::error::{ApiError, NOT_INITIALIZED};
use crate::web::views::query_param;

/// Default upload limit when none is configured.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 150 * 1024 * 1024;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Dropbox adapter; absent when no access token was configured.
    pub storage: Option<Arc<StorageService>>,
    /// Whether an access token was configured.
    pub token_present: bool,
    /// HTML templates.
    pub templates: TemplateLoader,
    /// Maximum accepted upload size.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create a state without an adapter.
    pub fn new(templates: TemplateLoader) -> Self {
        Self {
            storage: None,
            token_present: false,
            templates,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Build the state from configuration.
    ///
    /// A missing token or a client that cannot be built leaves the adapter
    /// unset; the server still starts.
    pub fn from_config(config: &Config) -> Self {
        let token_present = config.dropbox.has_token();
        let mut state = Self::new(TemplateLoader::new(&config.templates.path))
            .with_token_present(token_present)
            .with_max_upload_bytes(config.files.max_upload_bytes());

        if !token_present {
            tracing::warn!(
                "No Dropbox access token configured. Data routes will report the service as not initialized."
            );
            return state;
        }

        match StorageService::new(&config.dropbox) {
            Ok(storage) => {
                tracing::info!("Dropbox service initialized");
                state = state.with_storage(storage);
            }
            Err(e) => {
                tracing::error!("Failed to initialize Dropbox service: {}", e);
            }
        }

        state
    }

    /// Set the adapter.
    pub fn with_storage(mut self, storage: StorageService) -> Self {
        self.storage = Some(Arc::new(storage));
        self.token_present = true;
        self
    }

    /// Record whether a token was configured.
    pub fn with_token_present(mut self, present: bool) -> Self {
        self.token_present = present;
        self
    }

    /// Set the upload limit.
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// The adapter, or the not-initialized API error.
    pub fn storage(&self) -> Result<&StorageService, ApiError> {
        self.storage.as_deref().ok_or_else(ApiError::not_initialized)
    }

    /// Render a page inside the layout.
    pub fn render_page(
        &self,
        status: StatusCode,
        name: &str,
        title: &str,
        context: &TemplateContext,
    ) -> Response {
        match self.templates.render_page(name, title, context) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(template = name, "Failed to render page: {}", e);
                ApiError::from(crate::AppError::from(e)).into_response()
            }
        }
    }

    /// Render the error page.
    pub fn error_page(&self, status: StatusCode, message: &str) -> Response {
        let mut context = TemplateContext::new();
        context.set("message", message);
        self.render_page(status, "error", "Error", &context)
    }

    /// The error page for a missing adapter.
    pub fn not_initialized_page(&self) -> Response {
        self.error_page(StatusCode::INTERNAL_SERVER_ERROR, NOT_INITIALIZED)
    }
}

/// Outcome carried back to the folder page after a form action.
#[derive(Debug, Clone, PartialEq)]
pub enum Flash {
    Success(String),
    Error(String),
}

/// `302 Found` redirect to `/folder` with a flash message.
pub fn redirect_to_folder(path: &str, flash: Flash) -> Response {
    let (key, message) = match &flash {
        Flash::Success(m) => ("success", m),
        Flash::Error(m) => ("error", m),
    };
    let location = format!(
        "/folder?path={}&{}={}",
        query_param(path),
        key,
        query_param(message)
    );

    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
