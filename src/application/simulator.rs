// Metrics simulator - Random drift of water quality readings per tick

use crate::domain::filter::FilterState;
use crate::domain::metrics::MetricSnapshot;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Grid filter health is snapped to after decay, fine enough for any sane rate.
const FILTER_HEALTH_PLACES: i32 = 6;

/// Maximum per-tick perturbation of each reading, and the filter wear rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftProfile {
    pub ph_step: f64,
    pub tds_step: f64,
    pub temperature_step: f64,
    pub turbidity_step: f64,
    pub filter_decay_per_tick: f64,
}

impl Default for DriftProfile {
    fn default() -> Self {
        Self {
            ph_step: 0.05,
            tds_step: 2.5,
            temperature_step: 0.1,
            turbidity_step: 0.05,
            filter_decay_per_tick: 0.2,
        }
    }
}

pub struct MetricsSimulator<R = Pcg64> {
    rng: R,
    drift: DriftProfile,
}

impl MetricsSimulator<Pcg64> {
    pub fn seeded(seed: u64, drift: DriftProfile) -> Self {
        Self::with_rng(Pcg64::seed_from_u64(seed), drift)
    }

    pub fn from_entropy(drift: DriftProfile) -> Self {
        Self::seeded(rand::random(), drift)
    }
}

impl<R: Rng> MetricsSimulator<R> {
    pub fn with_rng(rng: R, drift: DriftProfile) -> Self {
        Self { rng, drift }
    }

    /// Produce the snapshot following `current`.
    pub fn tick(&mut self, current: &MetricSnapshot, filter: FilterState) -> MetricSnapshot {
        let drift = self.drift;
        MetricSnapshot {
            ph: round_to(current.ph + self.jitter(drift.ph_step), 2),
            tds: round_to(current.tds + self.jitter(drift.tds_step), 0),
            temperature: round_to(current.temperature + self.jitter(drift.temperature_step), 1),
            turbidity: round_to(current.turbidity + self.jitter(drift.turbidity_step), 2),
            filter_health: decay(current.filter_health, filter, drift.filter_decay_per_tick),
        }
    }

    fn jitter(&mut self, step: f64) -> f64 {
        self.rng.random_range(-step..=step)
    }
}

fn decay(filter_health: f64, filter: FilterState, rate: f64) -> f64 {
    if !filter.is_running() {
        return filter_health;
    }
    // Snap away float drift so boundary values classify exactly
    round_to((filter_health - rate).max(0.0), FILTER_HEALTH_PLACES).min(filter_health)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
