// Dashboard domain model
use super::filter::FilterState;
use super::telemetry::{ChartData, TileData};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterControl {
    pub state: FilterState,
    pub status: String,
    pub action: String,
    pub gauge_healthy: bool,
}

impl FilterControl {
    pub fn new(state: FilterState, gauge_healthy: bool) -> Self {
        Self {
            state,
            status: state.status_label().to_string(),
            action: state.control_label().to_string(),
            gauge_healthy,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub tick: u64,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
    /// Shared x axis of every chart, oldest first
    pub history_timestamps: Vec<i64>,
    pub filter: FilterControl,
    pub advisories: Vec<String>,
}

impl Dashboard {
    pub fn new(
        title: String,
        tick: u64,
        tiles: Vec<TileData>,
        charts: Vec<ChartData>,
        history_timestamps: Vec<i64>,
        filter: FilterControl,
        advisories: Vec<String>,
    ) -> Self {
        Self {
            title,
            tick,
            tiles,
            charts,
            history_timestamps,
            filter,
            advisories,
        }
    }
}
