// ── Report pipeline ──
//
// One query, one decode, one fold. The CSV is written only once a table
// exists, so failed requests never leave a file behind.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use peerstat_api::{MetricResponse, MetricsClient};

use crate::aggregate::PeerTable;
use crate::error::CoreError;
use crate::report;
use crate::request::ReportRequest;

/// Time span the appliance actually reported on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWindow {
    pub cycle: String,
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl ReportWindow {
    pub fn from_response(response: &MetricResponse) -> Self {
        Self {
            cycle: response.cycle.clone(),
            from: DateTime::from_timestamp_millis(response.from),
            until: DateTime::from_timestamp_millis(response.until),
        }
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = |t: Option<DateTime<Utc>>| {
            t.map_or_else(|| "?".to_owned(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        };
        write!(f, "{} .. {}", ts(self.from), ts(self.until))?;
        if !self.cycle.is_empty() {
            write!(f, " (cycle {})", self.cycle)?;
        }
        Ok(())
    }
}

/// Aggregated result of one report run.
#[derive(Debug, Clone)]
pub struct PeerReport {
    pub request: ReportRequest,
    pub window: ReportWindow,
    pub table: PeerTable,
}

impl PeerReport {
    /// Query the appliance and aggregate the answer.
    pub async fn collect(client: &MetricsClient, request: ReportRequest) -> Result<Self, CoreError> {
        let response = client.metrics_total(&request.to_query()).await?;
        let window = ReportWindow::from_response(&response);
        info!(
            device = %request.device,
            stats = response.stats.len(),
            window = %window,
            "metrics received"
        );

        let table = PeerTable::from_response(&response, request.kind, request.merge);
        Ok(Self {
            request,
            window,
            table,
        })
    }

    /// `device_<id>_peer_details.csv`
    pub fn file_name(&self) -> String {
        report::file_name(self.request.device)
    }

    /// Write the CSV into `dir`, returning the file's path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, CoreError> {
        report::write_report_file(dir, self.request.device, &self.table, self.request.kind)
    }
}
