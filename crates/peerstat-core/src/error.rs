// ── Core error types ──
//
// User-facing errors from peerstat-core. The `From<peerstat_api::Error>`
// impl folds transport-layer failures into the three terminal categories
// the report distinguishes: transport, HTTP status, and response decoding.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Setup errors ─────────────────────────────────────────────────
    #[error("Cannot use key file {}: {message}", path.display())]
    Credentials { path: PathBuf, message: String },

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("HTTP client setup failed: {message}")]
    ClientSetup { message: String },

    // ── Request errors ───────────────────────────────────────────────
    #[error("Error requesting peer metrics: {reason}")]
    Transport { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Non-200 status code requesting peer metrics: {status}")]
    HttpStatus { status: String, body: String },

    #[error("Error parsing response JSON: {message}")]
    InvalidResponse { message: String },

    // ── Output errors ────────────────────────────────────────────────
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Returns `true` for the failures that happen while talking to the
    /// appliance: transport, authentication, HTTP status, and decoding.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::AuthenticationFailed { .. }
                | Self::HttpStatus { .. }
                | Self::InvalidResponse { .. }
        )
    }
}

impl From<peerstat_api::Error> for CoreError {
    fn from(err: peerstat_api::Error) -> Self {
        use peerstat_api::Error as Api;

        match err {
            Api::KeyFile { path, message } => CoreError::Credentials { path, message },
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::Transport(e) => CoreError::Transport {
                reason: e.to_string(),
            },
            Api::InvalidUrl(e) => CoreError::ClientSetup {
                message: format!("invalid appliance URL: {e}"),
            },
            Api::Tls(message) => CoreError::ClientSetup { message },
            Api::Status { status, body } => CoreError::HttpStatus {
                status: status.to_string(),
                body,
            },
            Api::Deserialization { message, .. } => CoreError::InvalidResponse { message },
        }
    }
}
