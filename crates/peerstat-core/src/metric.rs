// ── Requested metrics ──
//
// Declaration order is the wire order of `metric_specs` and therefore the
// index of each metric's value group in the response.

use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

use peerstat_api::MetricSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    PktsIn,
    PktsOut,
    BytesIn,
    BytesOut,
}

impl Metric {
    /// Position in the request and in a counter array.
    pub fn index(self) -> usize {
        match self {
            Self::PktsIn => 0,
            Self::PktsOut => 1,
            Self::BytesIn => 2,
            Self::BytesOut => 3,
        }
    }

    /// Metric for the value group at `index`, if one was requested there.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    /// Name sent in `metric_specs`.
    pub fn api_name(self) -> &'static str {
        self.into()
    }

    /// CSV column title.
    pub fn column(self) -> &'static str {
        match self {
            Self::PktsIn => "Packets In",
            Self::PktsOut => "Packets Out",
            Self::BytesIn => "Bytes In",
            Self::BytesOut => "Bytes Out",
        }
    }

    /// The `metric_specs` list, in index order.
    pub fn specs() -> Vec<MetricSpec> {
        Self::iter().map(|m| MetricSpec::named(m.api_name())).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn index_matches_declaration_order() {
        for (i, metric) in Metric::iter().enumerate() {
            assert_eq!(metric.index(), i);
            assert_eq!(Metric::from_index(i), Some(metric));
        }
        assert_eq!(Metric::from_index(Metric::COUNT), None);
    }

    #[test]
    fn specs_use_api_names() {
        let names: Vec<_> = Metric::specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["pkts_in", "pkts_out", "bytes_in", "bytes_out"]);
    }
}
