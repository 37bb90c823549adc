// Key-file credentials
//
// The appliance authenticates REST calls with a static API key sent as
// `Authorization: ExtraHop apikey=<key>`. Operators keep the key and the
// appliance hostname together in a small JSON key file.

use std::path::{Path, PathBuf};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// On-disk shape of a key file. Field spellings from older tooling are
/// accepted as aliases.
#[derive(Deserialize)]
struct KeyFileContents {
    #[serde(alias = "Hostname", alias = "host")]
    hostname: String,
    #[serde(alias = "APIKey", alias = "apikey")]
    api_key: String,
}

/// Appliance host plus the API key used to sign every request.
#[derive(Debug, Clone)]
pub struct ApiKeyCredentials {
    host: String,
    api_key: SecretString,
}

impl ApiKeyCredentials {
    pub fn new(host: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            host: host.into(),
            api_key,
        }
    }

    /// Load credentials from a JSON key file.
    pub fn from_key_file(path: &Path) -> Result<Self, Error> {
        let key_file_err = |message: String| Error::KeyFile {
            path: path.to_path_buf(),
            message,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| key_file_err(e.to_string()))?;
        let contents: KeyFileContents =
            serde_json::from_str(&raw).map_err(|e| key_file_err(e.to_string()))?;

        if contents.hostname.trim().is_empty() {
            return Err(key_file_err("hostname is empty".into()));
        }
        if contents.api_key.trim().is_empty() {
            return Err(key_file_err("API key is empty".into()));
        }

        debug!(path = %path.display(), host = %contents.hostname, "loaded key file");
        let api_key = SecretString::from(contents.api_key.trim().to_owned());
        Ok(Self::new(contents.hostname.trim(), api_key))
    }

    /// The appliance host as written in the key file.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Root of the REST API: `https://<host>/api/v1/`.
    ///
    /// A host that already carries an `http://` or `https://` scheme is used
    /// as-is, which lets tests point the client at a local mock server.
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = self.host.trim_end_matches('/');
        let root = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_owned()
        } else {
            format!("https://{host}")
        };
        Ok(Url::parse(&format!("{root}/api/v1/"))?)
    }

    /// Default headers carrying the API key.
    pub fn auth_headers(&self) -> Result<HeaderMap, Error> {
        let mut value =
            HeaderValue::from_str(&format!("ExtraHop apikey={}", self.api_key.expose_secret()))
                .map_err(|_| Error::KeyFile {
                    path: PathBuf::new(),
                    message: "API key contains characters not allowed in a header".into(),
                })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}
