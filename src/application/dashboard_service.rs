// Dashboard service - Use case for building dashboards from session views
use crate::application::session::SessionView;
use crate::domain::dashboard::{Dashboard, FilterControl};
use crate::domain::metrics::MetricKind;
use crate::domain::telemetry::{ChartData, SeriesData, TileData};
use crate::domain::threshold::DisplayStatus;

#[derive(Clone)]
pub struct DashboardService {
    title: String,
}

impl DashboardService {
    pub fn new(title: String) -> Self {
        Self { title }
    }

    pub fn build(&self, view: &SessionView) -> Dashboard {
        let tiles = self.build_tiles(view);
        let charts = self.build_charts(view);

        let advisories = view
            .assessment
            .advisories
            .iter()
            .map(|a| a.message().to_string())
            .collect();

        Dashboard::new(
            self.title.clone(),
            view.ticks,
            tiles,
            charts,
            view.history.timestamps(),
            FilterControl::new(view.filter, view.assessment.filter_gauge_healthy),
            advisories,
        )
    }

    fn build_tiles(&self, view: &SessionView) -> Vec<TileData> {
        view.assessment
            .metrics
            .iter()
            .map(|status| {
                let kind = status.kind;
                TileData::new(
                    kind.id().to_string(),
                    kind.title().to_string(),
                    kind.unit().to_string(),
                    status.value,
                    kind.precision(),
                    kind.range_label(),
                    DisplayStatus::from(status.classification),
                )
            })
            .collect()
    }

    fn build_charts(&self, view: &SessionView) -> Vec<ChartData> {
        // Only chart once there is history to show
        if view.history.is_empty() {
            return Vec::new();
        }

        MetricKind::ALL
            .iter()
            .map(|&kind| {
                let range = kind.optimal_range();
                let unit = match kind.unit() {
                    "" => None,
                    unit => Some(unit.to_string()),
                };
                let series = SeriesData::new(
                    kind.id().to_string(),
                    kind.title().to_string(),
                    view.history.series(kind),
                );

                ChartData::new(
                    kind.id().to_string(),
                    kind.title().to_string(),
                    unit,
                    Some(range.min),
                    Some(range.max),
                    Some(kind.precision()),
                    vec![series],
                )
            })
            .collect()
    }
}
