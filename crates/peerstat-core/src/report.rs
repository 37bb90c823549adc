// ── CSV report ──

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::aggregate::{PeerCounters, PeerKey, PeerTable};
use crate::error::CoreError;
use crate::request::{DeviceId, ReportKind};

/// `device_<id>_peer_details.csv`
pub fn file_name(device: DeviceId) -> String {
    format!("device_{device}_peer_details.csv")
}

/// Fields of one report row: identity, then counters in metric order.
pub fn row(peer: &PeerKey, counters: &PeerCounters, kind: ReportKind) -> Vec<String> {
    let mut record = vec![peer.addr.clone()];
    if kind == ReportKind::PeerProtocol {
        record.push(peer.protocol.clone().unwrap_or_default());
    }
    record.extend(counters.values().iter().map(i64::to_string));
    record
}

/// Write the header and one row per peer to `writer`.
pub fn write_csv<W: Write>(writer: W, table: &PeerTable, kind: ReportKind) -> Result<(), CoreError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(kind.header())?;

    for (peer, counters) in table.iter() {
        csv.write_record(row(peer, counters, kind))?;
    }

    csv.flush()?;
    Ok(())
}

/// Create (or truncate) the report file for `device` inside `dir`.
pub fn write_report_file(
    dir: &Path,
    device: DeviceId,
    table: &PeerTable,
    kind: ReportKind,
) -> Result<PathBuf, CoreError> {
    let path = dir.join(file_name(device));
    let file = File::create(&path).map_err(|source| CoreError::Write {
        path: path.clone(),
        source,
    })?;

    write_csv(file, table, kind)?;
    debug!(path = %path.display(), rows = table.len(), "report written");
    Ok(path)
}
