// Metrics API HTTP client
//
// Wraps `reqwest::Client` with the appliance's URL layout, API key auth,
// and strict status handling. One request, no retries.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::ApiKeyCredentials;
use crate::error::Error;
use crate::models::{MetricQuery, MetricResponse};
use crate::transport::TransportConfig;

/// Relative path of the totals endpoint.
pub const METRICS_TOTAL_PATH: &str = "metrics/total";

/// Number of body bytes kept in error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// HTTP client for the appliance REST API (`https://<host>/api/v1/`).
pub struct MetricsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MetricsClient {
    /// Build a client from key-file credentials and transport settings.
    pub fn new(credentials: &ApiKeyCredentials, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(credentials.auth_headers()?)?;
        Ok(Self {
            http,
            base_url: credentials.base_url()?,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// `base_url` must end with `/` so relative paths join beneath it.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Query totals for the objects and metrics named in `query`.
    ///
    /// `POST metrics/total`
    pub async fn metrics_total(&self, query: &MetricQuery) -> Result<MetricResponse, Error> {
        debug!(
            objects = ?query.object_ids,
            category = ?query.metric_category,
            from = query.from,
            "querying metric totals"
        );
        self.post(METRICS_TOTAL_PATH, query).await
    }

    /// Send a POST request with a JSON body and decode the JSON reply.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_response(resp).await
    }

    /// Anything but `200 OK` is an error; the body is only decoded on success.
    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("API key rejected: {}", preview(&body)),
            });
        }

        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status { status, body });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(len = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// First `BODY_PREVIEW_LEN` bytes of `body`, cut on a char boundary.
fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
