// Rolling snapshot history for charting
use super::metrics::{MetricKind, MetricSnapshot};
use super::telemetry::TimeSeriesPoint;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub time_ms: i64,
    pub snapshot: MetricSnapshot,
}

/// Fixed-capacity window of the most recent snapshots, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl HistoryBuffer {
    /// A capacity of zero is bumped to one so the latest snapshot is always kept.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Append, then evict from the front until back within capacity.
    pub fn push(&mut self, time_ms: i64, snapshot: MetricSnapshot) {
        self.entries.push_back(HistoryEntry { time_ms, snapshot });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.time_ms).collect()
    }

    pub fn series(&self, kind: MetricKind) -> Vec<TimeSeriesPoint> {
        self.entries
            .iter()
            .map(|e| TimeSeriesPoint::new(e.time_ms, e.snapshot.value(kind)))
            .collect()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
