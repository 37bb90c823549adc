// ── Report request ──
//
// Everything needed to build one `metrics/total` query and to shape the
// resulting CSV.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use peerstat_api::{MetricCategory, MetricQuery, ObjectType};

use crate::error::CoreError;
use crate::lookback::Lookback;
use crate::metric::Metric;

/// Numeric object id of the device being reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(u64);

impl DeviceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.parse().map(Self).map_err(|_| CoreError::Validation {
            field: "device id".into(),
            message: format!("'{s}' is not a numeric device id"),
        })
    }
}

/// How peers are keyed in the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// One row per peer address (`net_detail`).
    #[default]
    Peer,
    /// One row per peer address and protocol (`app_detail`).
    PeerProtocol,
}

impl ReportKind {
    pub fn category(self) -> MetricCategory {
        match self {
            Self::Peer => MetricCategory::NetDetail,
            Self::PeerProtocol => MetricCategory::AppDetail,
        }
    }

    /// CSV header row.
    pub fn header(self) -> Vec<&'static str> {
        let mut header = vec!["PeerIP"];
        if self == Self::PeerProtocol {
            header.push("Protocol");
        }
        header.extend(Metric::iter().map(Metric::column));
        header
    }
}

/// What happens when the same peer and metric show up in more than one
/// stat entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// The last value seen wins.
    #[default]
    Overwrite,
    /// Values are added (saturating).
    Sum,
}

impl MergePolicy {
    pub fn merge(self, current: i64, incoming: i64) -> i64 {
        match self {
            Self::Overwrite => incoming,
            Self::Sum => current.saturating_add(incoming),
        }
    }
}

/// One peer report to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub device: DeviceId,
    pub lookback: Lookback,
    pub kind: ReportKind,
    pub merge: MergePolicy,
}

impl ReportRequest {
    pub fn new(device: DeviceId, lookback: Lookback) -> Self {
        Self {
            device,
            lookback,
            kind: ReportKind::default(),
            merge: MergePolicy::default(),
        }
    }

    pub fn with_kind(mut self, kind: ReportKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_merge(mut self, merge: MergePolicy) -> Self {
        self.merge = merge;
        self
    }

    /// Body of the `metrics/total` request.
    pub fn to_query(&self) -> MetricQuery {
        MetricQuery {
            cycle: "auto".into(),
            from: self.lookback.offset_ms(),
            metric_category: self.kind.category(),
            metric_specs: Metric::specs(),
            object_ids: vec![self.device.get()],
            object_type: ObjectType::Device,
            until: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn query_body_matches_wire_format() {
        let request = ReportRequest::new(DeviceId::new(42), Lookback::from_days(3));
        let body = serde_json::to_value(request.to_query()).unwrap();

        assert_eq!(
            body,
            json!({
                "cycle": "auto",
                "from": -259_200_000,
                "metric_category": "net_detail",
                "metric_specs": [
                    {"name": "pkts_in"}, {"name": "pkts_out"},
                    {"name": "bytes_in"}, {"name": "bytes_out"}
                ],
                "object_ids": [42],
                "object_type": "device",
                "until": 0
            })
        );
    }

    #[test]
    fn protocol_report_uses_app_detail() {
        let request = ReportRequest::new(DeviceId::new(7), Lookback::default())
            .with_kind(ReportKind::PeerProtocol);
        let query = request.to_query();

        assert_eq!(query.metric_category, MetricCategory::AppDetail);
        assert_eq!(query.from, 0);
    }

    #[test]
    fn device_id_must_be_numeric() {
        assert_eq!(" 42 ".parse::<DeviceId>().unwrap(), DeviceId::new(42));

        let err = "42], \"x\": [1".parse::<DeviceId>().unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }), "{err:?}");
        assert!("".parse::<DeviceId>().is_err());
    }

    #[test]
    fn headers_per_kind() {
        assert_eq!(
            ReportKind::Peer.header().join(","),
            "PeerIP,Packets In,Packets Out,Bytes In,Bytes Out"
        );
        assert_eq!(
            ReportKind::PeerProtocol.header().join(","),
            "PeerIP,Protocol,Packets In,Packets Out,Bytes In,Bytes Out"
        );
    }

    #[test]
    fn merge_policies() {
        assert_eq!(MergePolicy::Overwrite.merge(5, 3), 3);
        assert_eq!(MergePolicy::Sum.merge(5, 3), 8);
        assert_eq!(MergePolicy::Sum.merge(i64::MAX, 1), i64::MAX);
        assert_eq!(MergePolicy::Sum.merge(5, -2), 3);
    }

    #[test]
    fn kinds_deserialize_kebab_case() {
        let kind: ReportKind = serde_json::from_str("\"peer-protocol\"").unwrap();
        assert_eq!(kind, ReportKind::PeerProtocol);
        let merge: MergePolicy = serde_json::from_str("\"sum\"").unwrap();
        assert_eq!(merge, MergePolicy::Sum);
    }
}
