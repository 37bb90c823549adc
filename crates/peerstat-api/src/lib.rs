// peerstat-api: client for the appliance metrics REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::ApiKeyCredentials;
pub use client::{METRICS_TOTAL_PATH, MetricsClient};
pub use error::Error;
pub use models::{
    MetricCategory, MetricKey, MetricQuery, MetricResponse, MetricSpec, MetricValue, ObjectType,
    Stat, ValueData,
};
pub use transport::{TlsMode, TransportConfig};
