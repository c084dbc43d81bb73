//! Web server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::{AppError, Result};

use super::handlers::AppState;
use super::router::create_app;

/// HTTP server for the web manager.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    static_path: String,
}

impl WebServer {
    /// Create a server from configuration, building the Dropbox adapter.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_state(config, AppState::from_config(config))
    }

    /// Create a server with a prepared state.
    pub fn with_state(config: &Config, state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| {
                AppError::Config(format!(
                    "invalid server address {}:{}: {}",
                    config.server.host, config.server.port, e
                ))
            })?;

        Ok(Self {
            addr,
            app_state: Arc::new(state),
            static_path: config.web.static_path.clone(),
        })
    }

    /// Get the configured address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = create_app(self.app_state, &self.static_path);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = create_app(self.app_state, &self.static_path);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
