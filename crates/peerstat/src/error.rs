//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with help text and
//! process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use peerstat_config::ConfigError;
use peerstat_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    /// Transport failure, non-200 status, or undecodable response.
    pub const REQUEST_FAILED: i32 = -1;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Request ──────────────────────────────────────────────────────

    #[error("Error requesting peer metrics: {reason}")]
    #[diagnostic(
        code(peerstat::transport),
        help(
            "Check the hostname in your key file and that the appliance is reachable.\n\
             Self-signed certificates need --insecure (-k) or insecure = true in the config."
        )
    )]
    Transport { reason: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(peerstat::auth_failed),
        help("Verify the API key in your key file is valid and not revoked.")
    )]
    AuthFailed { message: String },

    #[error("Non-200 status code requesting peer metrics: {status}")]
    #[diagnostic(code(peerstat::http_status))]
    HttpStatus { status: String },

    #[error("Error parsing response JSON: {message}")]
    #[diagnostic(
        code(peerstat::invalid_response),
        help("Run with -vvv to trace the request; the appliance returned an unexpected body.")
    )]
    InvalidResponse { message: String },

    // ── Setup ────────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(peerstat::key_file),
        help(
            "A key file is JSON with the appliance host and API key:\n\
             {{\"hostname\": \"eda.example.com\", \"api_key\": \"...\"}}\n\
             Relative names are also looked up in key_dir from the config."
        )
    )]
    KeyFile { message: String },

    #[error("HTTP client setup failed: {message}")]
    #[diagnostic(code(peerstat::client_setup))]
    ClientSetup { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(peerstat::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(peerstat::config),
        help("Check the config file printed by: peerstat config path")
    )]
    Config(#[from] ConfigError),

    // ── Output ───────────────────────────────────────────────────────

    #[error("Failed to write report: {message}")]
    #[diagnostic(code(peerstat::output))]
    Output { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Transport { .. }
            | Self::AuthFailed { .. }
            | Self::HttpStatus { .. }
            | Self::InvalidResponse { .. } => exit_code::REQUEST_FAILED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { reason } => CliError::Transport { reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::HttpStatus { status, body: _ } => CliError::HttpStatus { status },
            CoreError::InvalidResponse { message } => CliError::InvalidResponse { message },

            err @ CoreError::Credentials { .. } => CliError::KeyFile {
                message: err.to_string(),
            },

            CoreError::ClientSetup { message } => CliError::ClientSetup { message },

            CoreError::Validation { field, message } => CliError::Validation {
                field,
                reason: message,
            },

            err @ (CoreError::Write { .. } | CoreError::Csv(_)) => CliError::Output {
                message: err.to_string(),
            },

            CoreError::Io(e) => CliError::Io(e),
        }
    }
}
