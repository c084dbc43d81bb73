//! Configuration module for the Dropbox web manager.

use serde::Deserialize;
use std::path::Path;

use crate::{AppError, Result};

/// Environment variable holding the Dropbox access token.
pub const ACCESS_TOKEN_ENV: &str = "DROPBOX_ACCESS_TOKEN";

/// Environment variable overriding the HTTP port.
pub const PORT_ENV: &str = "DROPBOX_WEB_PORT";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Dropbox API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DropboxConfig {
    /// Access token for the account. Empty means the service is disabled.
    #[serde(default)]
    pub access_token: String,
    /// Base URL for RPC endpoints.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Base URL for content (upload/download) endpoints.
    #[serde(default = "default_content_base")]
    pub content_base: String,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum number of search results requested.
    #[serde(default = "default_search_max_results")]
    pub search_max_results: u64,
}

fn default_api_base() -> String {
    "https://api.dropboxapi.com/2".to_string()
}

fn default_content_base() -> String {
    "https://content.dropboxapi.com/2".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_search_max_results() -> u64 {
    100
}

impl DropboxConfig {
    /// Whether an access token is configured.
    pub fn has_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

impl Default for DropboxConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_base: default_api_base(),
            content_base: default_content_base(),
            timeout_secs: default_timeout(),
            search_max_results: default_search_max_results(),
        }
    }
}

/// Upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_max_upload_size() -> u64 {
    150
}

impl FilesConfig {
    /// Maximum upload size in bytes, capped at `usize::MAX`.
    pub fn max_upload_bytes(&self) -> usize {
        let bytes = self.max_upload_size_mb.saturating_mul(1024 * 1024);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Templates configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Path to the templates directory.
    #[serde(default = "default_templates_path")]
    pub path: String,
}

fn default_templates_path() -> String {
    "templates".to_string()
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            path: default_templates_path(),
        }
    }
}

/// Web UI configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Path to static files directory, served under `/static`.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_static_path() -> String {
    "static".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_path: default_static_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/dropbox-web.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Dropbox configuration.
    #[serde(default)]
    pub dropbox: DropboxConfig,
    /// Upload configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Templates configuration.
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Web UI configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(AppError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| AppError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DROPBOX_ACCESS_TOKEN`: the Dropbox access token
    /// - `DROPBOX_WEB_PORT`: the HTTP port
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.dropbox.access_token = token.trim().to_string();
            }
        }

        if let Ok(port) = std::env::var(PORT_ENV) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid {}: {}", PORT_ENV, port),
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The host is empty
    /// - The upload limit is zero
    /// - A Dropbox base URL is not a valid http(s) URL
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::Validation("server.host must not be empty".to_string()));
        }

        if self.files.max_upload_size_mb == 0 {
            return Err(AppError::Validation(
                "files.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }

        for (name, value) in [
            ("dropbox.api_base", &self.dropbox.api_base),
            ("dropbox.content_base", &self.dropbox.content_base),
        ] {
            let parsed = url::Url::parse(value)
                .map_err(|e| AppError::Config(format!("{name} is not a valid URL: {e}")))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(AppError::Config(format!("{name} must use http or https")));
            }
        }

        Ok(())
    }
}
