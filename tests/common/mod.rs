//! Shared helpers for integration tests.
//!
//! `FakeDropbox` is an axum router bound to `127.0.0.1:0` that records
//! every request and answers with canned responses per endpoint.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use axum_test::TestServer;
use dropbox_web::config::DropboxConfig;
use dropbox_web::template::TemplateLoader;
use dropbox_web::web::{create_app, AppState};
use dropbox_web::StorageService;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Token the fake server expects.
pub const TEST_TOKEN: &str = "test-token";

/// A request received by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Endpoint below `/2/`, e.g. `files/list_folder`.
    pub endpoint: String,
    pub authorization: Option<String>,
    /// `Dropbox-API-Arg` header of content endpoints.
    pub api_arg: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body decoded as JSON, or the `Dropbox-API-Arg` header for content calls.
    pub fn args(&self) -> Value {
        if let Some(arg) = &self.api_arg {
            return serde_json::from_str(arg).unwrap();
        }
        if self.body.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: StatusCode,
    body: Vec<u8>,
    api_result: Option<String>,
}

#[derive(Debug, Default)]
struct FakeState {
    requests: Mutex<Vec<RecordedRequest>>,
    /// Queued responses per endpoint; the last one repeats.
    responses: Mutex<HashMap<String, Vec<CannedResponse>>>,
}

/// In-process stand-in for the Dropbox API.
#[derive(Clone)]
pub struct FakeDropbox {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        endpoint: endpoint.clone(),
        authorization: header("authorization"),
        api_arg: header("dropbox-api-arg"),
        body: body.to_vec(),
    });

    let canned = {
        let mut responses = state.responses.lock().unwrap();
        match responses.get_mut(&endpoint) {
            Some(queue) if queue.len() > 1 => Some(queue.remove(0)),
            Some(queue) => queue.first().cloned(),
            None => None,
        }
    };
    match canned {
        Some(canned) => {
            let mut response = (canned.status, canned.body).into_response();
            if let Some(result) = canned.api_result {
                response
                    .headers_mut()
                    .insert("dropbox-api-result", result.parse().unwrap());
            }
            response
        }
        None => (
            StatusCode::BAD_REQUEST,
            json!({ "error_summary": format!("unexpected endpoint {endpoint}") }).to_string(),
        )
            .into_response(),
    }
}

impl FakeDropbox {
    /// Start the fake server on a random port.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/2/*endpoint", post(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Base URL to use for both `api_base` and `content_base`.
    pub fn base_url(&self) -> String {
        format!("http://{}/2", self.addr)
    }

    /// Client configuration pointing at this server.
    pub fn config(&self) -> DropboxConfig {
        DropboxConfig {
            access_token: TEST_TOKEN.to_string(),
            api_base: self.base_url(),
            content_base: self.base_url(),
            ..DropboxConfig::default()
        }
    }

    /// Storage service talking to this server.
    pub fn storage(&self) -> StorageService {
        StorageService::new(&self.config()).unwrap()
    }

    /// Answer `endpoint` with a JSON body.
    pub fn respond(&self, endpoint: &str, status: u16, body: Value) {
        self.respond_pages(endpoint, vec![body]);
        if let Some(queue) = self.state.responses.lock().unwrap().get_mut(endpoint) {
            queue[0].status = StatusCode::from_u16(status).unwrap();
        }
    }

    /// Answer successive calls to `endpoint` with successive 200 bodies.
    pub fn respond_pages(&self, endpoint: &str, pages: Vec<Value>) {
        let queue = pages
            .into_iter()
            .map(|body| CannedResponse {
                status: StatusCode::OK,
                body: body.to_string().into_bytes(),
                api_result: None,
            })
            .collect();
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), queue);
    }

    /// Answer `files/download` with file bytes and result metadata.
    pub fn respond_download(&self, metadata: Option<Value>, content: &[u8]) {
        self.state.responses.lock().unwrap().insert(
            "files/download".to_string(),
            vec![CannedResponse {
                status: StatusCode::OK,
                body: content.to_vec(),
                api_result: metadata.map(|m| m.to_string()),
            }],
        );
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests received for one endpoint.
    pub fn requests_to(&self, endpoint: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.endpoint == endpoint)
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

/// Dropbox error body as returned for endpoint errors.
pub fn dropbox_error(summary: &str, tag: &str) -> Value {
    json!({
        "error_summary": summary,
        "error": { ".tag": tag }
    })
}

pub fn file_json(name: &str, path: &str, size: u64) -> Value {
    json!({
        ".tag": "file",
        "name": name,
        "id": format!("id:{name}"),
        "path_lower": path.to_lowercase(),
        "path_display": path,
        "size": size,
        "client_modified": "2024-03-01T09:00:00Z",
        "server_modified": "2024-03-01T10:00:00Z",
        "rev": "015f",
        "content_hash": "abc123"
    })
}

pub fn folder_json(name: &str, path: &str) -> Value {
    json!({
        ".tag": "folder",
        "name": name,
        "id": format!("id:{name}"),
        "path_lower": path.to_lowercase(),
        "path_display": path
    })
}

pub fn shared_link_json(name: &str, path: &str, url: &str) -> Value {
    json!({
        ".tag": "file",
        "url": url,
        "name": name,
        "path_lower": path.to_lowercase(),
        "link_permissions": { "can_revoke": true }
    })
}

pub fn account_json() -> Value {
    json!({
        "account_id": "dbid:AAH4f99T0taONIb-OurWxbNQ6ywGRopQngc",
        "name": {
            "given_name": "Franz",
            "surname": "Ferdinand",
            "familiar_name": "Franz",
            "display_name": "Franz Ferdinand (Personal)",
            "abbreviated_name": "FF"
        },
        "email": "franz@example.com",
        "email_verified": true,
        "disabled": false,
        "country": "US",
        "locale": "en",
        "account_type": { ".tag": "basic" }
    })
}

/// Router state without a Dropbox adapter.
pub fn unconfigured_state() -> AppState {
    AppState::new(TemplateLoader::new("templates"))
}

/// Router state with an adapter talking to `fake`.
pub fn configured_state(fake: &FakeDropbox) -> AppState {
    AppState::new(TemplateLoader::new("templates")).with_storage(fake.storage())
}

/// Test server over the full application.
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_app(Arc::new(state), "static")).unwrap()
}
