// Telemetry view models handed to the render sink
use super::threshold::DisplayStatus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
    pub range_label: String,
    pub status: DisplayStatus,
}

impl TileData {
    pub fn new(
        id: String,
        title: String,
        unit: String,
        value: f64,
        precision: i32,
        range_label: String,
        status: DisplayStatus,
    ) -> Self {
        Self {
            id,
            title,
            unit,
            value,
            precision,
            range_label,
            status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub points: Vec<TimeSeriesPoint>,
}

impl SeriesData {
    pub fn new(id: String, name: String, points: Vec<TimeSeriesPoint>) -> Self {
        Self { id, name, points }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub fraction_digits: Option<i32>,
    pub series: Vec<SeriesData>,
}

impl ChartData {
    pub fn new(
        id: String,
        title: String,
        unit: Option<String>,
        y_min: Option<f64>,
        y_max: Option<f64>,
        fraction_digits: Option<i32>,
        series: Vec<SeriesData>,
    ) -> Self {
        Self {
            id,
            title,
            unit,
            y_min,
            y_max,
            fraction_digits,
            series,
        }
    }
}
