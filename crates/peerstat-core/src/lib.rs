// peerstat-core: peer traffic aggregation and CSV reporting
//
// Turns a device id and lookback window into a `metrics/total` query, folds
// the answer into per-peer counters, and writes them out as CSV.

pub mod aggregate;
pub mod error;
pub mod lookback;
pub mod metric;
pub mod pipeline;
pub mod report;
pub mod request;

pub use aggregate::{PeerCounters, PeerKey, PeerTable};
pub use error::CoreError;
pub use lookback::Lookback;
pub use metric::Metric;
pub use pipeline::{PeerReport, ReportWindow};
pub use request::{DeviceId, MergePolicy, ReportKind, ReportRequest};

// Re-exported so binaries don't need a direct api dependency.
pub use peerstat_api::{ApiKeyCredentials, MetricsClient, TlsMode, TransportConfig};
