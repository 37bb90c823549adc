use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `peerstat-api` crate.
///
/// Covers every failure mode between reading the key file and decoding the
/// metrics response. `peerstat-core` maps these into user-facing categories.
#[derive(Debug, Error)]
pub enum Error {
    // ── Credentials ─────────────────────────────────────────────────
    /// The key file could not be read or did not hold a usable key.
    #[error("Invalid key file {}: {message}", path.display())]
    KeyFile { path: PathBuf, message: String },

    /// The appliance rejected the API key (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The appliance answered with something other than `200 OK`.
    #[error("Non-200 status code requesting peer metrics: {status}")]
    Status { status: reqwest::StatusCode, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Error parsing response JSON: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The HTTP status the appliance returned, if the error carries one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Authentication { .. } => Some(reqwest::StatusCode::UNAUTHORIZED),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}
