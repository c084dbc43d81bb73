//! Router configuration.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use super::handlers::{
    api_folder, api_storage, api_user, create_folder, dashboard, delete_item, download, folder,
    health_check, metadata, search, share, shared_links, status, upload, upload_form, AppState,
};
use super::middleware::security_headers;

/// Room for multipart boundaries and the `path` field on top of the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the application router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let upload_limit = app_state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    let pages: Router<Arc<AppState>> = Router::new()
        .route("/", get(dashboard))
        .route("/folder", get(folder))
        .route("/shared-links", get(shared_links))
        .route("/search", get(search));

    let actions: Router<Arc<AppState>> = Router::new()
        .route("/create-folder", post(create_folder))
        .route("/delete", post(delete_item))
        .route("/share", post(share))
        .route(
            "/upload",
            get(upload_form).merge(post(upload).layer(DefaultBodyLimit::max(upload_limit))),
        );

    let api_routes: Router<Arc<AppState>> = Router::new()
        .route("/user", get(api_user))
        .route("/storage", get(api_storage))
        .route("/folder", get(api_folder));

    Router::new()
        .merge(pages)
        .merge(actions)
        .route("/download", get(download))
        .route("/metadata", get(metadata))
        .route("/status", get(status))
        .nest("/api", api_routes)
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Serve static assets from a directory, if it exists.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let path = Path::new(static_path);
    if !path.is_dir() {
        tracing::warn!("Static directory not found: {}", static_path);
        return None;
    }

    Some(Router::new().nest_service("/static", ServeDir::new(path)))
}

/// Assemble the full application with middleware.
pub fn create_app(app_state: Arc<AppState>, static_path: &str) -> Router {
    let mut router = create_router(app_state).merge(create_health_router());

    if let Some(static_router) = create_static_router(static_path) {
        router = router.merge(static_router);
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(middleware::from_fn(security_headers)),
    )
}
