//! Dropbox API error classification.

use serde::Deserialize;
use thiserror::Error;

/// Maximum length of an error summary kept from a response body.
const MAX_SUMMARY_LEN: usize = 200;

/// Errors returned by the Dropbox client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DropboxError {
    /// Transport failure (DNS, TLS, timeout, connection reset).
    #[error("connection to Dropbox failed: {0}")]
    Connection(String),

    /// The access token is invalid, expired or lacks a scope.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The path or shared link does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Endpoint-specific error (HTTP 409).
    #[error("conflict: {summary}")]
    Conflict {
        /// Dropbox `error_summary`.
        summary: String,
        /// Top-level `.tag` of the error union, if present.
        tag: Option<String>,
    },

    /// Too many requests (HTTP 429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Any other non-success status.
    #[error("Dropbox API error {status}: {summary}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error summary or truncated body.
        summary: String,
    },

    /// A success response whose body did not match the expected shape.
    #[error("unexpected response from Dropbox: {0}")]
    Decode(String),
}

/// Error body shape shared by all Dropbox endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_summary: String,
    #[serde(default)]
    error: serde_json::Value,
}

impl DropboxError {
    /// Classify a non-success HTTP response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let (summary, tag) = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) if !parsed.error_summary.is_empty() => {
                let tag = parsed
                    .error
                    .get(".tag")
                    .and_then(|t| t.as_str())
                    .map(str::to_string);
                (parsed.error_summary, tag)
            }
            _ => (truncate(body.trim()), None),
        };

        let summary = if summary.is_empty() {
            format!("HTTP {status}")
        } else {
            summary
        };

        if status == 401 || summary.contains("missing_scope") {
            return DropboxError::Auth(summary);
        }
        if status == 429 {
            return DropboxError::RateLimited(summary);
        }
        if summary.contains("not_found") {
            return DropboxError::NotFound(summary);
        }
        if status == 409 {
            return DropboxError::Conflict { summary, tag };
        }

        DropboxError::Api { status, summary }
    }

    /// Whether this is the "shared link already exists" conflict.
    pub fn is_shared_link_already_exists(&self) -> bool {
        match self {
            DropboxError::Conflict { summary, tag } => {
                tag.as_deref() == Some("shared_link_already_exists")
                    || summary.starts_with("shared_link_already_exists")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for DropboxError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DropboxError::Decode(e.to_string())
        } else {
            DropboxError::Connection(e.to_string())
        }
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(MAX_SUMMARY_LEN).collect()
}
