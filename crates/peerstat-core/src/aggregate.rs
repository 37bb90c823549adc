// ── Peer aggregation ──
//
// Folds the nested stats/value-group/value structure into one counter row
// per peer identity. Rows keep first-seen order.

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;
use strum::EnumCount;
use tracing::{debug, warn};

use peerstat_api::{MetricResponse, MetricValue, ValueData};

use crate::metric::Metric;
use crate::request::{MergePolicy, ReportKind};

/// Identity of one report row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerKey {
    pub addr: String,
    pub protocol: Option<String>,
}

impl PeerKey {
    pub fn peer(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            protocol: None,
        }
    }

    pub fn with_protocol(addr: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            protocol: Some(protocol.into()),
        }
    }
}

impl fmt::Display for PeerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.protocol {
            Some(protocol) => write!(f, "{},{protocol}", self.addr),
            None => f.write_str(&self.addr),
        }
    }
}

/// One counter per requested metric, indexed by [`Metric`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeerCounters([i64; Metric::COUNT]);

impl PeerCounters {
    pub fn get(&self, metric: Metric) -> i64 {
        self[metric]
    }

    fn apply(&mut self, metric: Metric, value: i64, merge: MergePolicy) {
        if let Some(slot) = self.0.get_mut(metric.index()) {
            *slot = merge.merge(*slot, value);
        }
    }

    /// Counters in metric order.
    pub fn values(&self) -> &[i64; Metric::COUNT] {
        &self.0
    }
}

impl Index<Metric> for PeerCounters {
    type Output = i64;

    fn index(&self, metric: Metric) -> &i64 {
        &self.0[metric.index()]
    }
}

/// Aggregated counters keyed by peer identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerTable {
    rows: IndexMap<PeerKey, PeerCounters>,
}

impl PeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every stat entry of `response` into a new table.
    pub fn from_response(response: &MetricResponse, kind: ReportKind, merge: MergePolicy) -> Self {
        let mut table = Self::new();
        for stat in &response.stats {
            for (index, group) in stat.values.iter().enumerate() {
                let Some(metric) = Metric::from_index(index) else {
                    warn!(
                        oid = stat.oid,
                        index,
                        "value group beyond the requested metrics, ignoring"
                    );
                    continue;
                };
                for value in group {
                    table.record_value(value, metric, kind, merge);
                }
            }
        }
        debug!(peers = table.len(), stats = response.stats.len(), "aggregated peers");
        table
    }

    fn record_value(
        &mut self,
        value: &MetricValue,
        metric: Metric,
        kind: ReportKind,
        merge: MergePolicy,
    ) {
        let addr = value.key.addr.as_deref().unwrap_or_default();
        match (kind, &value.value) {
            (ReportKind::Peer, data) => {
                self.record(PeerKey::peer(addr), metric, data.total(), merge);
            }
            (ReportKind::PeerProtocol, ValueData::Count(count)) => {
                self.record(PeerKey::with_protocol(addr, ""), metric, *count, merge);
            }
            (ReportKind::PeerProtocol, ValueData::Nested(items)) => {
                for item in items {
                    let protocol = item.key.label.as_deref().unwrap_or_default();
                    let key = PeerKey::with_protocol(addr, protocol);
                    self.record(key, metric, item.value.total(), merge);
                }
            }
        }
    }

    /// Merge one value into a peer's counter, creating the row zeroed on
    /// first sight.
    pub fn record(&mut self, key: PeerKey, metric: Metric, value: i64, merge: MergePolicy) {
        self.rows.entry(key).or_default().apply(metric, value, merge);
    }

    pub fn get(&self, key: &PeerKey) -> Option<&PeerCounters> {
        self.rows.get(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PeerKey, &PeerCounters)> {
        self.rows.iter()
    }
}
