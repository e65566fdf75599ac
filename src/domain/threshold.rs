// Threshold evaluation - Optimal range checks and the filter advisory
use super::metrics::{MetricKind, MetricSnapshot, OptimalRange};
use serde::Serialize;

/// Filter health must be strictly above this for the gauge to show healthy.
const FILTER_GAUGE_HEALTHY_ABOVE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    InRange,
    OutOfRange,
}

/// How a classification is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayStatus {
    Nominal,
    Alert,
}

impl From<Classification> for DisplayStatus {
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::InRange => DisplayStatus::Nominal,
            Classification::OutOfRange => DisplayStatus::Alert,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Advisory {
    FilterReplacementRecommended,
}

impl Advisory {
    pub fn message(self) -> &'static str {
        match self {
            Advisory::FilterReplacementRecommended => "Filter replacement recommended",
        }
    }
}

/// InRange iff `range.min <= value <= range.max`. NaN is always out of range.
pub fn classify(value: f64, range: OptimalRange) -> Classification {
    if value >= range.min && value <= range.max {
        Classification::InRange
    } else {
        Classification::OutOfRange
    }
}

/// Advisory raised for a filter health reading, if any.
pub fn filter_advisory(filter_health: f64) -> Option<Advisory> {
    let range = MetricKind::FilterHealth.optimal_range();
    match classify(filter_health, range) {
        Classification::OutOfRange if filter_health < range.min => {
            Some(Advisory::FilterReplacementRecommended)
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricStatus {
    pub kind: MetricKind,
    pub value: f64,
    pub classification: Classification,
}

/// Classification of every metric in a snapshot plus derived advisories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub metrics: Vec<MetricStatus>,
    pub advisories: Vec<Advisory>,
    /// Mirrors the filter health bar, which only turns green above 60.
    pub filter_gauge_healthy: bool,
}

impl Assessment {
    #[cfg(test)]
    pub fn classification(&self, kind: MetricKind) -> Option<Classification> {
        self.metrics
            .iter()
            .find(|m| m.kind == kind)
            .map(|m| m.classification)
    }

    pub fn has_alerts(&self) -> bool {
        self.metrics
            .iter()
            .any(|m| m.classification == Classification::OutOfRange)
    }
}

pub fn assess(snapshot: &MetricSnapshot) -> Assessment {
    let metrics = MetricKind::ALL
        .iter()
        .map(|&kind| {
            let value = snapshot.value(kind);
            MetricStatus {
                kind,
                value,
                classification: classify(value, kind.optimal_range()),
            }
        })
        .collect();

    let advisories = filter_advisory(snapshot.filter_health).into_iter().collect();

    Assessment {
        metrics,
        advisories,
        filter_gauge_healthy: snapshot.filter_health > FILTER_GAUGE_HEALTHY_ABOVE,
    }
}
