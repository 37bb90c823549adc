// Wire types for `POST metrics/total`
//
// Field names follow the appliance's JSON exactly. Response fields default
// when absent or `null`; only structural mismatches fail decoding.

use serde::{Deserialize, Deserializer, Serialize};

// ── Request ──────────────────────────────────────────────────────────

/// Metric category queried for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    /// Per-peer network totals (flat values).
    NetDetail,
    /// Per-peer totals broken down by protocol (nested values).
    AppDetail,
}

/// Object type the `object_ids` refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Device,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,
}

impl MetricSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Request body for `metrics/total`.
///
/// `from` and `until` are millisecond offsets; negative values are relative
/// to "now" and `0` means "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricQuery {
    pub cycle: String,
    pub from: i64,
    pub metric_category: MetricCategory,
    pub metric_specs: Vec<MetricSpec>,
    pub object_ids: Vec<u64>,
    pub object_type: ObjectType,
    pub until: i64,
}

// ── Response ─────────────────────────────────────────────────────────

/// Response body of `metrics/total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetricResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: Vec<Stat>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cycle: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub until: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clock: i64,
}

/// Totals for one object. `values[i]` holds the results for the i-th
/// requested metric spec; a `null` group reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Stat {
    #[serde(default, deserialize_with = "null_as_default")]
    pub oid: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: i64,
    #[serde(default, deserialize_with = "null_groups_as_empty")]
    pub values: Vec<Vec<MetricValue>>,
}

/// One keyed value inside a value group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetricValue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: MetricKey,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vtype: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: ValueData,
}

/// A value is either a plain count or, for detail metrics keyed twice
/// (peer, then protocol), a list of sub-values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ValueData {
    Count(i64),
    Nested(Vec<MetricValue>),
}

impl Default for ValueData {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl ValueData {
    /// Total of this value, summing nested sub-values. Counts are signed;
    /// the appliance's negative values pass through unchanged.
    pub fn total(&self) -> i64 {
        match self {
            Self::Count(n) => *n,
            Self::Nested(items) => items
                .iter()
                .fold(0, |acc, item| acc.saturating_add(item.value.total())),
        }
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_groups_as_empty<'de, D>(deserializer: D) -> Result<Vec<Vec<MetricValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    let groups: Option<Vec<Option<Vec<MetricValue>>>> = Option::deserialize(deserializer)?;
    Ok(groups
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Key of a detail value. Peer keys carry `addr` (and usually `host` and
/// `device_oid`); protocol keys carry `str`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetricKey {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_type: String,
    pub addr: Option<String>,
    pub host: Option<String>,
    pub device_oid: Option<u64>,
    #[serde(rename = "str")]
    pub label: Option<String>,
}
