// Water quality metric domain models
use serde::Serialize;

/// One complete set of the five tracked values at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub ph: f64,
    pub tds: f64,
    pub temperature: f64,
    pub turbidity: f64,
    /// Always within [0, 100].
    pub filter_health: f64,
}

impl MetricSnapshot {
    pub fn new(ph: f64, tds: f64, temperature: f64, turbidity: f64, filter_health: f64) -> Self {
        Self {
            ph,
            tds,
            temperature,
            turbidity,
            filter_health: filter_health.clamp(0.0, 100.0),
        }
    }

    /// Values every session starts from.
    pub fn seed() -> Self {
        Self::new(7.2, 150.0, 25.0, 2.4, 85.0)
    }

    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Ph => self.ph,
            MetricKind::Tds => self.tds,
            MetricKind::Temperature => self.temperature,
            MetricKind::Turbidity => self.turbidity,
            MetricKind::FilterHealth => self.filter_health,
        }
    }
}

impl Default for MetricSnapshot {
    fn default() -> Self {
        Self::seed()
    }
}

/// Inclusive [min, max] band considered healthy for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
}

impl OptimalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    Ph,
    Tds,
    Temperature,
    Turbidity,
    FilterHealth,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Ph,
        MetricKind::Tds,
        MetricKind::Temperature,
        MetricKind::Turbidity,
        MetricKind::FilterHealth,
    ];

    pub fn id(self) -> &'static str {
        match self {
            MetricKind::Ph => "ph",
            MetricKind::Tds => "tds",
            MetricKind::Temperature => "temperature",
            MetricKind::Turbidity => "turbidity",
            MetricKind::FilterHealth => "filterHealth",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MetricKind::Ph => "pH Level",
            MetricKind::Tds => "TDS",
            MetricKind::Temperature => "Temperature",
            MetricKind::Turbidity => "Turbidity",
            MetricKind::FilterHealth => "Filter Health",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::Ph => "",
            MetricKind::Tds => "ppm",
            MetricKind::Temperature => "°C",
            MetricKind::Turbidity => "NTU",
            MetricKind::FilterHealth => "%",
        }
    }

    /// Decimal places used when displaying the value.
    pub fn precision(self) -> i32 {
        match self {
            MetricKind::Ph => 2,
            MetricKind::Tds => 0,
            MetricKind::Temperature => 1,
            MetricKind::Turbidity => 2,
            MetricKind::FilterHealth => 1,
        }
    }

    pub fn optimal_range(self) -> OptimalRange {
        match self {
            MetricKind::Ph => OptimalRange::new(6.5, 8.5),
            MetricKind::Tds => OptimalRange::new(50.0, 250.0),
            MetricKind::Temperature => OptimalRange::new(20.0, 30.0),
            MetricKind::Turbidity => OptimalRange::new(0.0, 5.0),
            MetricKind::FilterHealth => OptimalRange::new(60.0, 100.0),
        }
    }

    /// Human readable range, e.g. "Optimal range: 50-250 ppm".
    pub fn range_label(self) -> String {
        let range = self.optimal_range();
        // Symbol units hug the number, word units get a space
        let suffix = match self.unit() {
            "" => String::new(),
            unit @ ("°C" | "%") => unit.to_string(),
            unit => format!(" {}", unit),
        };
        format!("Optimal range: {}-{}{}", range.min, range.max, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_values() {
        let seed = MetricSnapshot::seed();
        assert_eq!(seed.ph, 7.2);
        assert_eq!(seed.tds, 150.0);
        assert_eq!(seed.temperature, 25.0);
        assert_eq!(seed.turbidity, 2.4);
        assert_eq!(seed.filter_health, 85.0);
    }

    #[test]
    fn test_filter_health_is_clamped() {
        assert_eq!(MetricSnapshot::new(7.0, 100.0, 20.0, 1.0, 120.0).filter_health, 100.0);
        assert_eq!(MetricSnapshot::new(7.0, 100.0, 20.0, 1.0, -3.0).filter_health, 0.0);
    }

    #[test]
    fn test_range_labels() {
        assert_eq!(MetricKind::Ph.range_label(), "Optimal range: 6.5-8.5");
        assert_eq!(MetricKind::Tds.range_label(), "Optimal range: 50-250 ppm");
        assert_eq!(MetricKind::Temperature.range_label(), "Optimal range: 20-30°C");
        assert_eq!(MetricKind::Turbidity.range_label(), "Optimal range: 0-5 NTU");
        assert_eq!(MetricKind::FilterHealth.range_label(), "Optimal range: 60-100%");
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = serde_json::to_value(MetricSnapshot::seed()).unwrap();
        assert_eq!(json["filterHealth"], 85.0);
        assert_eq!(json["ph"], 7.2);
    }
}
