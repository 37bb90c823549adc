//! Terminal rendering of an aggregated report.

use tabled::builder::Builder;
use tabled::settings::Style;

use peerstat_core::{PeerReport, report};

/// Render the report rows as a rounded table, header included.
pub fn render_table(report: &PeerReport) -> String {
    let kind = report.request.kind;

    let mut builder = Builder::default();
    builder.push_record(kind.header());
    for (peer, counters) in report.table.iter() {
        builder.push_record(report::row(peer, counters, kind));
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
