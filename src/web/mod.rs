//! Web front end.
//!
//! Server-rendered HTML pages, form actions that redirect back to the
//! folder page, downloads and a few JSON endpoints.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod views;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_app, create_router};
pub use server::WebServer;
