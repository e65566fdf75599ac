use crate::application::simulator::DriftProfile;
use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationSettings {
    pub tick_interval_ms: u64,
    pub history_capacity: usize,
    /// Fixed seed for reproducible runs; drawn from entropy when absent.
    pub seed: Option<u64>,
    pub ph_step: f64,
    pub tds_step: f64,
    pub temperature_step: f64,
    pub turbidity_step: f64,
    pub filter_decay_per_tick: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        let drift = DriftProfile::default();
        Self {
            tick_interval_ms: 5000,
            history_capacity: 10,
            seed: None,
            ph_step: drift.ph_step,
            tds_step: drift.tds_step,
            temperature_step: drift.temperature_step,
            turbidity_step: drift.turbidity_step,
            filter_decay_per_tick: drift.filter_decay_per_tick,
        }
    }
}

impl SimulationSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn drift_profile(&self) -> DriftProfile {
        DriftProfile {
            ph_step: self.ph_step,
            tds_step: self.tds_step,
            temperature_step: self.temperature_step,
            turbidity_step: self.turbidity_step,
            filter_decay_per_tick: self.filter_decay_per_tick,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub title: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "Water Monitoring System".to_string(),
        }
    }
}

/// Every view clones the history, so keep the window small.
pub const MAX_HISTORY_CAPACITY: usize = 10_000;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("simulation.tick_interval_ms must be greater than zero")]
    ZeroTickInterval,
    #[error("simulation.history_capacity must be greater than zero")]
    ZeroHistoryCapacity,
    #[error("simulation.history_capacity must be at most {max}, got {value}")]
    HistoryCapacityTooLarge { value: usize, max: usize },
    #[error("simulation.{field} must be finite and non-negative, got {value}")]
    InvalidStep { field: &'static str, value: f64 },
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if sim.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if sim.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::HistoryCapacityTooLarge {
                value: sim.history_capacity,
                max: MAX_HISTORY_CAPACITY,
            });
        }

        let steps = [
            ("ph_step", sim.ph_step),
            ("tds_step", sim.tds_step),
            ("temperature_step", sim.temperature_step),
            ("turbidity_step", sim.turbidity_step),
            ("filter_decay_per_tick", sim.filter_decay_per_tick),
        ];
        for (field, value) in steps {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidStep { field, value });
            }
        }
        Ok(())
    }
}

/// Reads `config/monitor.toml` (optional) overlaid with `WATER_MONITOR__*`
/// environment variables, e.g. `WATER_MONITOR__SERVER__PORT=9090`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/monitor").required(false))
        .add_source(
            config::Environment::with_prefix("WATER_MONITOR")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    parse_app_config(settings)
}

fn parse_app_config(settings: config::Config) -> anyhow::Result<AppConfig> {
    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}
