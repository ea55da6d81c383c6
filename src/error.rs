//! Error types
//!
//! [`CloudflareError`] is what the adapter returns. Non-2xx responses map to
//! `Transport` and `success: false` envelopes map to `Api`.
//! [`ToolError`] wraps it with the failures that belong to the tool catalog.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`CloudflareClient`](crate::cloudflare::CloudflareClient)
#[derive(Debug, Error)]
pub enum CloudflareError {
    /// No API token was configured
    #[error("CLOUDFLARE_API_TOKEN is required")]
    MissingToken,

    /// The HTTP layer answered with a non-2xx status
    #[error("Cloudflare {} {}: {}{}", .method, .url, .status, body_suffix(.body))]
    Transport {
        method: String,
        url: String,
        status: u16,
        body: Option<String>,
    },

    /// 2xx response whose envelope reported `success: false`
    #[error("Cloudflare API error: {}", Value::Array(.errors.clone()))]
    Api { errors: Vec<Value> },

    /// The request never produced a status (connect, TLS, body write)
    #[error("Failed to call Cloudflare API: {0}")]
    Request(#[from] reqwest::Error),

    /// A 2xx body that is not a valid envelope
    #[error("Failed to parse Cloudflare response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(text) if !text.is_empty() => format!(" {}", text),
        _ => String::new(),
    }
}

impl CloudflareError {
    /// HTTP status for `Transport` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            CloudflareError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Provider error list for `Api` errors
    pub fn api_errors(&self) -> Option<&[Value]> {
        match self {
            CloudflareError::Api { errors } => Some(errors),
            _ => None,
        }
    }
}

/// Errors returned while resolving or executing a tool
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments did not match the tool's input shape
    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("account_id required (or set CLOUDFLARE_ACCOUNT_ID)")]
    MissingAccountId,

    #[error(transparent)]
    Cloudflare(#[from] CloudflareError),
}
