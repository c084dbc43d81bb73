//! HTML pages and form actions over the full application.

mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use common::{
    account_json, configured_state, dropbox_error, file_json, folder_json, shared_link_json,
    test_server, unconfigured_state, FakeDropbox,
};
use dropbox_web::AppState;
use serde_json::json;

const NOT_INITIALIZED: &str = "Dropbox service is not initialized. Check the access token.";

fn respond_usage(fake: &FakeDropbox) {
    fake.respond(
        "users/get_space_usage",
        200,
        json!({
            "used": 314572800u64,
            "allocation": { ".tag": "individual", "allocated": 2147483648u64 }
        }),
    );
}

// ============================================================================
// Without a token
// ============================================================================

#[tokio::test]
async fn test_pages_without_token_render_error_page() {
    let server = test_server(unconfigured_state());

    for path in ["/", "/folder", "/shared-links", "/search?q=x"] {
        let response = server.get(path).await;
        assert_eq!(
            response.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "{path}"
        );
        let html = response.text();
        assert!(html.contains("Something went wrong"), "{path}");
        assert!(html.contains(NOT_INITIALIZED), "{path}");
    }
}

#[tokio::test]
async fn test_upload_form_without_token() {
    let server = test_server(unconfigured_state());

    let response = server.get("/upload").add_query_param("path", "/Work").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("Upload a file"));
    assert!(html.contains("value=\"/Work\""));
    assert!(html.contains("Maximum size: 150 MB"));
}

#[tokio::test]
async fn test_actions_without_token_return_json_error() {
    let server = test_server(unconfigured_state());

    let upload = MultipartForm::new()
        .add_text("path", "")
        .add_part("file", Part::bytes(b"hello".to_vec()).file_name("a.txt"));

    let responses = [
        (
            "/create-folder",
            server
                .post("/create-folder")
                .form(&[("path", ""), ("folder_name", "New")])
                .await,
        ),
        (
            "/delete",
            server
                .post("/delete")
                .form(&[("item_path", "/a.txt"), ("current_path", "")])
                .await,
        ),
        (
            "/share",
            server
                .post("/share")
                .form(&[("item_path", "/a.txt"), ("current_path", "")])
                .await,
        ),
        ("/upload", server.post("/upload").multipart(upload).await),
    ];

    for (route, response) in responses {
        assert_eq!(
            response.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "{route}"
        );
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "SERVICE_NOT_INITIALIZED", "{route}");
        assert_eq!(body["error"]["message"], NOT_INITIALIZED, "{route}");
    }
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_dashboard() {
    let fake = FakeDropbox::start().await;
    fake.respond("users/get_current_account", 200, account_json());
    respond_usage(&fake);
    let server = test_server(configured_state(&fake));

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<title>Dashboard - Dropbox Web Manager</title>"));
    assert!(html.contains("Franz Ferdinand (Personal)"));
    assert!(html.contains("franz@example.com"));
    assert!(html.contains("300 MB (14.65%)"));
    assert!(html.contains("2048 MB"));
    assert!(html.contains("1748 MB"));
}

#[tokio::test]
async fn test_dashboard_error_page() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "users/get_current_account",
        401,
        dropbox_error("invalid_access_token/", "invalid_access_token"),
    );
    let server = test_server(configured_state(&fake));

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let html = response.text();
    assert!(html.contains("Error loading data: authentication failed: invalid_access_token/"));
    assert!(fake.requests_to("users/get_space_usage").is_empty());
}

// ============================================================================
// Folder
// ============================================================================

#[tokio::test]
async fn test_root_folder_listing() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "files/list_folder",
        200,
        json!({
            "entries": [
                file_json("Report.pdf", "/Report.pdf", 2097152),
                folder_json("Archive", "/Archive")
            ],
            "cursor": "c",
            "has_more": false
        }),
    );
    let server = test_server(configured_state(&fake));

    let response = server.get("/folder").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<h1>Root folder</h1>"));
    assert!(html.contains("href=\"/download?file_path=%2Freport.pdf\">Report.pdf</a>"));
    assert!(html.contains("href=\"/folder?path=%2Farchive\">Archive/</a>"));
    assert!(html.contains("2 MB"));
    assert!(html.contains("2024-03-01 10:00"));
    // The root is listed without a metadata lookup.
    assert!(fake.requests_to("files/get_metadata").is_empty());
}

#[tokio::test]
async fn test_subfolder_uses_metadata_name() {
    let fake = FakeDropbox::start().await;
    fake.respond("files/get_metadata", 200, folder_json("Work", "/Work"));
    fake.respond(
        "files/list_folder",
        200,
        json!({ "entries": [], "cursor": "c", "has_more": false }),
    );
    let server = test_server(configured_state(&fake));

    let response = server.get("/folder").add_query_param("path", "/Work").await;

    let html = response.text();
    assert!(html.contains("<title>Work - Dropbox Web Manager</title>"));
    assert!(html.contains("This folder is empty."));
    assert!(html.contains("href=\"/folder?path=\">Up</a>"));
    assert!(html.contains("href=\"/upload?path=%2FWork\""));
}

#[tokio::test]
async fn test_folder_with_unresolvable_name_and_list_error() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "files/get_metadata",
        409,
        dropbox_error("path/not_found/.", "path"),
    );
    fake.respond(
        "files/list_folder",
        409,
        dropbox_error("path/not_found/..", "path"),
    );
    let server = test_server(configured_state(&fake));

    let response = server.get("/folder").add_query_param("path", "/gone").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<h1>Root folder</h1>"));
    assert!(html.contains("Could not list folder: not found: path/not_found/.."));
}

#[tokio::test]
async fn test_folder_shows_flash_messages() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "files/list_folder",
        200,
        json!({ "entries": [], "cursor": "c", "has_more": false }),
    );
    let server = test_server(configured_state(&fake));

    let response = server
        .get("/folder")
        .add_query_param("success", "Item deleted")
        .await;
    assert!(response
        .text()
        .contains("<div class=\"flash flash-success\">Item deleted</div>"));

    let response = server
        .get("/folder")
        .add_query_param("error", "<b>bad</b>")
        .await;
    assert!(response
        .text()
        .contains("<div class=\"flash flash-error\">&lt;b&gt;bad&lt;/b&gt;</div>"));
}

// ============================================================================
// Form actions
// ============================================================================

#[tokio::test]
async fn test_create_folder_redirects_with_success() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "files/create_folder_v2",
        200,
        json!({ "metadata": folder_json("Photos", "/Work/Photos") }),
    );
    let server = test_server(configured_state(&fake));

    let response = server
        .post("/create-folder")
        .form(&[("path", "/Work"), ("folder_name", "Photos")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "/folder?path=%2FWork&success=Folder%20%27Photos%27%20created"
    );
    assert_eq!(
        fake.requests_to("files/create_folder_v2")[0].args()["path"],
        "/Work/Photos"
    );
}

#[tokio::test]
async fn test_create_folder_in_root() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "files/create_folder_v2",
        200,
        json!({ "metadata": folder_json("New", "/New") }),
    );
    let server = test_server(configured_state(&fake));

    let response = server
        .post("/create-folder")
        .form(&[("folder_name", "New")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert!(response
        .header("location")
        .to_str()
        .unwrap()
        .starts_with("/folder?path=&success="));
    assert_eq!(
        fake.requests_to("files/create_folder_v2")[0].args()["path"],
        "/New"
    );
}

#[tokio::test]
async fn test_create_folder_failure_redirects_with_error() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "files/create_folder_v2",
        409,
        dropbox_error("path/conflict/folder/", "path"),
    );
    let server = test_server(configured_state(&fake));

    let response = server
        .post("/create-folder")
        .form(&[("path", ""), ("folder_name", "Taken")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "/folder?path=&error=conflict%3A%20path%2Fconflict%2Ffolder%2F"
    );
}

#[tokio::test]
async fn test_delete_redirects_to_current_path() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "files/delete_v2",
        200,
        json!({ "metadata": file_json("a.txt", "/Work/a.txt", 1) }),
    );
    let server = test_server(configured_state(&fake));

    let response = server
        .post("/delete")
        .form(&[("item_path", "/work/a.txt"), ("current_path", "/Work")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "/folder?path=%2FWork&success=Item%20deleted"
    );
    assert_eq!(
        fake.requests_to("files/delete_v2")[0].args()["path"],
        "/work/a.txt"
    );
}

#[tokio::test]
async fn test_share_redirects_with_url() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "sharing/create_shared_link_with_settings",
        409,
        dropbox_error("shared_link_already_exists/metadata/", "shared_link_already_exists"),
    );
    fake.respond(
        "sharing/list_shared_links",
        200,
        json!({
            "links": [shared_link_json("a.txt", "/a.txt", "https://db.tt/abc")],
            "has_more": false
        }),
    );
    let server = test_server(configured_state(&fake));

    let response = server
        .post("/share")
        .form(&[("item_path", "/a.txt"), ("current_path", "")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "/folder?path=&success=Link%20created%3A%20https%3A%2F%2Fdb.tt%2Fabc"
    );
}

#[tokio::test]
async fn test_upload_multipart() {
    let fake = FakeDropbox::start().await;
    fake.respond("files/upload", 200, file_json("notes.txt", "/Work/notes.txt", 5));
    let server = test_server(configured_state(&fake));

    let form = MultipartForm::new().add_text("path", "/Work").add_part(
        "file",
        Part::bytes(b"hello".to_vec())
            .file_name("notes.txt")
            .mime_type("text/plain"),
    );
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "/folder?path=%2FWork&success=File%20%27notes.txt%27%20uploaded"
    );

    let request = &fake.requests_to("files/upload")[0];
    assert_eq!(request.body, b"hello");
    assert_eq!(request.args()["path"], "/Work/notes.txt");
}

#[tokio::test]
async fn test_upload_strips_client_directories() {
    let fake = FakeDropbox::start().await;
    fake.respond("files/upload", 200, file_json("photo.jpg", "/photo.jpg", 3));
    let server = test_server(configured_state(&fake));

    let form = MultipartForm::new().add_text("path", "").add_part(
        "file",
        Part::bytes(vec![1, 2, 3]).file_name("C:\\Users\\ann\\photo.jpg"),
    );
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        fake.requests_to("files/upload")[0].args()["path"],
        "/photo.jpg"
    );
}

#[tokio::test]
async fn test_upload_without_file() {
    let fake = FakeDropbox::start().await;
    let server = test_server(configured_state(&fake));

    let form = MultipartForm::new().add_text("path", "/Work");
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["message"], "No file provided");
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn test_upload_too_large() {
    let fake = FakeDropbox::start().await;
    let state: AppState = configured_state(&fake).with_max_upload_bytes(4);
    let server = test_server(state);

    let form = MultipartForm::new()
        .add_text("path", "")
        .add_part("file", Part::bytes(b"too big".to_vec()).file_name("big.bin"));
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(fake.request_count(), 0);
}

// ============================================================================
// Shared links and search
// ============================================================================

#[tokio::test]
async fn test_shared_links_page() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "sharing/list_shared_links",
        200,
        json!({
            "links": [shared_link_json("a.txt", "/Docs/a.txt", "https://db.tt/a")],
            "has_more": false
        }),
    );
    let server = test_server(configured_state(&fake));

    let response = server.get("/shared-links").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<td>a.txt</td>"));
    assert!(html.contains("<td>/docs/a.txt</td>"));
    assert!(html.contains("href=\"https://db.tt/a\""));
}

#[tokio::test]
async fn test_shared_links_page_error_is_inline() {
    let fake = FakeDropbox::start().await;
    let server = test_server(configured_state(&fake));

    let response = server.get("/shared-links").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Could not load shared links:"));
}

#[tokio::test]
async fn test_search_without_query_makes_no_call() {
    let fake = FakeDropbox::start().await;
    let server = test_server(configured_state(&fake));

    let response = server.get("/search").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("<h1>Search</h1>"));
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn test_search_results() {
    let fake = FakeDropbox::start().await;
    fake.respond(
        "files/search_v2",
        200,
        json!({
            "matches": [{
                "metadata": { ".tag": "metadata", "metadata": file_json("plan.txt", "/Work/plan.txt", 4) },
                "match_type": { ".tag": "filename" }
            }],
            "has_more": false
        }),
    );
    let server = test_server(configured_state(&fake));

    let response = server
        .get("/search")
        .add_query_param("q", "plan")
        .add_query_param("path", "/Work")
        .await;

    let html = response.text();
    assert!(html.contains("1 result(s) for \"plan\""));
    assert!(html.contains("href=\"/download?file_path=%2Fwork%2Fplan.txt\">plan.txt</a>"));
    assert!(html.contains("<td>filename</td>"));
    assert_eq!(
        fake.requests_to("files/search_v2")[0].args()["options"]["path"],
        "/Work"
    );
}

#[tokio::test]
async fn test_search_error_is_inline() {
    let fake = FakeDropbox::start().await;
    fake.respond("files/search_v2", 500, json!({}));
    let server = test_server(configured_state(&fake));

    let response = server.get("/search").add_query_param("q", "plan").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .text()
        .contains("<div class=\"flash flash-error\">search failed: "));
}

#[tokio::test]
async fn test_search_nothing_found() {
    let fake = FakeDropbox::start().await;
    fake.respond("files/search_v2", 200, json!({ "matches": [], "has_more": false }));
    let server = test_server(configured_state(&fake));

    let response = server.get("/search").add_query_param("q", "zzz").await;

    assert!(response.text().contains("Nothing found for \"zzz\"."));
}

// ============================================================================
// Layout and headers
// ============================================================================

#[tokio::test]
async fn test_pages_carry_security_headers() {
    let server = test_server(unconfigured_state());

    let response = server.get("/upload").await;

    assert_eq!(response.header("x-frame-options"), "DENY");
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("cache-control"), "no-store, max-age=0");
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/html"));
}

#[tokio::test]
async fn test_static_stylesheet() {
    let server = test_server(unconfigured_state());

    let response = server.get("/static/style.css").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/css"));
}
