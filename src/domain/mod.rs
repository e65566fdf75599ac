// Domain layer - Metrics, thresholds and filter state
pub mod dashboard;
pub mod filter;
pub mod history;
pub mod metrics;
pub mod telemetry;
pub mod threshold;
