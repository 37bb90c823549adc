//! Shared configuration for peerstat.
//!
//! TOML defaults layered with `PEERSTAT_*` environment variables, key-file
//! lookup, and translation to `peerstat_core::TransportConfig`. CLI flags
//! are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use peerstat_core::{MergePolicy, ReportKind, TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Directory searched for key files not found in the working directory.
    pub key_dir: Option<PathBuf>,

    /// Where reports are written (working directory when unset).
    pub output_dir: Option<PathBuf>,

    /// Accept self-signed appliance certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// Path to a custom CA certificate (used when `insecure` is false).
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds; unset keeps the HTTP client default.
    pub timeout: Option<u64>,

    #[serde(default)]
    pub merge: MergePolicy,

    #[serde(default)]
    pub group_by: ReportKind,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            key_dir: None,
            output_dir: None,
            insecure: default_insecure(),
            ca_cert: None,
            timeout: None,
            merge: MergePolicy::default(),
            group_by: ReportKind::default(),
        }
    }
}

// Appliances ship self-signed certificates.
fn default_insecure() -> bool {
    true
}

impl Defaults {
    /// Transport settings implied by these defaults.
    pub fn transport(&self) -> TransportConfig {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };

        TransportConfig {
            tls,
            timeout: self.timeout.map(Duration::from_secs),
        }
    }

    /// Resolve a key file name as typed by the user.
    ///
    /// Absolute paths and paths that exist relative to the working directory
    /// win; otherwise `key_dir` is tried. When nothing matches, the name is
    /// returned unchanged so the load error points at what was typed.
    pub fn resolve_key_file(&self, name: &str) -> PathBuf {
        let path = PathBuf::from(name.trim());
        if path.is_absolute() || path.exists() {
            return path;
        }

        if let Some(ref dir) = self.key_dir {
            let candidate = dir.join(&path);
            if candidate.exists() {
                debug!(path = %candidate.display(), "key file found in key_dir");
                return candidate;
            }
        }

        path
    }
}

impl Config {
    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "peerstat", "peerstat").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("peerstat");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Layered sources: defaults, then the TOML file at `path`, then
/// `PEERSTAT_*` environment variables (`PEERSTAT_KEY_DIR` sets
/// `defaults.key_dir`).
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PEERSTAT_").map(|key| format!("defaults.{key}").into()))
}

/// Load the config from an explicit file path plus environment.
///
/// A missing file is not an error; a malformed one is.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment(path).extract()?;
    Ok(config)
}
