// Monitoring session state - the only mutable state of a dashboard session
use crate::domain::filter::FilterState;
use crate::domain::history::HistoryBuffer;
use crate::domain::metrics::MetricSnapshot;
use crate::domain::threshold::{assess, Assessment};

#[derive(Debug, Clone)]
pub struct MonitoringSession {
    snapshot: MetricSnapshot,
    filter: FilterState,
    history: HistoryBuffer,
    ticks: u64,
}

/// Immutable picture of a session handed to the render sink.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub snapshot: MetricSnapshot,
    pub assessment: Assessment,
    pub filter: FilterState,
    pub history: HistoryBuffer,
    pub ticks: u64,
}

impl MonitoringSession {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            snapshot: MetricSnapshot::seed(),
            filter: FilterState::Stopped,
            history: HistoryBuffer::new(history_capacity),
            ticks: 0,
        }
    }

    pub fn snapshot(&self) -> &MetricSnapshot {
        &self.snapshot
    }

    pub fn filter(&self) -> FilterState {
        self.filter
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn apply_tick(&mut self, next: MetricSnapshot, time_ms: i64) {
        self.snapshot = next;
        self.history.push(time_ms, next);
        self.ticks += 1;
    }

    pub fn toggle_filter(&mut self) -> FilterState {
        self.filter = self.filter.toggled();
        self.filter
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            snapshot: self.snapshot,
            assessment: assess(&self.snapshot),
            filter: self.filter,
            history: self.history.clone(),
            ticks: self.ticks,
        }
    }
}
