//! HTML page handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};

use super::AppState;
use crate::storage::parent_path;
use crate::template::{TemplateContext, Value};
use crate::web::dto::{FolderQuery, PathQuery, SearchQuery};
use crate::web::error::ApiError;
use crate::web::views::{self, query_param, ROOT_FOLDER_NAME};

/// GET / - Account and storage overview.
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Response {
    let Some(storage) = state.storage.as_deref() else {
        return state.not_initialized_page();
    };

    let loaded = async {
        let account = storage.get_user_info().await?;
        let usage = storage.get_storage_info().await?;
        Ok::<_, crate::storage::StorageError>((account, usage))
    }
    .await;

    match loaded {
        Ok((account, usage)) => {
            let mut context = TemplateContext::new();
            context.set("account", views::account(&account));
            context.set("usage", views::usage(&usage));
            state.render_page(StatusCode::OK, "dashboard", "Dashboard", &context)
        }
        Err(e) => {
            let status = ApiError::from(e.clone()).status();
            state.error_page(status, &format!("Error loading data: {e}"))
        }
    }
}

/// GET /folder - Folder listing.
pub async fn folder(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FolderQuery>,
) -> Response {
    let Some(storage) = state.storage.as_deref() else {
        return state.not_initialized_page();
    };

    let path = query.path;

    let folder_name = if path.is_empty() {
        ROOT_FOLDER_NAME.to_string()
    } else {
        match storage.get_metadata(&path).await {
            Ok(meta) => meta.entry.name,
            Err(_) => ROOT_FOLDER_NAME.to_string(),
        }
    };

    let mut context = TemplateContext::new();
    match storage.list_folder(&path).await {
        Ok(entries) => {
            context.set("entries", views::list(&entries, views::entry));
        }
        Err(e) => {
            context.set("entries", Value::List(Vec::new()));
            context.set("list_error", e.to_string());
        }
    }

    let parent = parent_path(&path);
    context.set("folder_name", folder_name.as_str());
    context.set("current_path", path.as_str());
    context.set("current_query", query_param(&path));
    context.set("parent_path", parent.as_str());
    context.set("parent_query", query_param(&parent));
    context.set("success", query.success);
    context.set("error", query.error);

    state.render_page(StatusCode::OK, "folder", &folder_name, &context)
}

/// GET /upload - Upload form. Needs no Dropbox access.
pub async fn upload_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Response {
    let mut context = TemplateContext::new();
    context.set("path", query.path.as_str());
    context.set("path_query", query_param(&query.path));
    context.set("max_upload_mb", (state.max_upload_bytes / (1024 * 1024)) as u64);

    state.render_page(StatusCode::OK, "upload", "Upload", &context)
}

/// GET /shared-links - All shared links of the account.
pub async fn shared_links(State(state): State<Arc<AppState>>) -> Response {
    let Some(storage) = state.storage.as_deref() else {
        return state.not_initialized_page();
    };

    let mut context = TemplateContext::new();
    match storage.list_shared_links().await {
        Ok(links) => context.set("links", views::list(&links, views::shared_link)),
        Err(e) => {
            context.set("links", Value::List(Vec::new()));
            context.set("error", e.to_string());
        }
    }

    state.render_page(StatusCode::OK, "shared_links", "Shared links", &context)
}

/// GET /search - Filename search. An empty query shows the form only.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let Some(storage) = state.storage.as_deref() else {
        return state.not_initialized_page();
    };

    let mut context = TemplateContext::new();
    context.set("query", query.q.as_str());
    context.set("search_path", query.path.as_str());

    if query.q.is_empty() {
        context.set("results", Value::List(Vec::new()));
    } else {
        match storage.search(&query.q, &query.path).await {
            Ok(results) => {
                context.set("result_count", results.len() as u64);
                context.set("results", views::list(&results, views::search_match));
            }
            Err(e) => {
                context.set("results", Value::List(Vec::new()));
                context.set("error", e.to_string());
            }
        }
    }

    state.render_page(StatusCode::OK, "search", "Search", &context)
}
