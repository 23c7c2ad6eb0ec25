use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Analytics Time Windows
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    Last7Days,
    Last30Days,
    AllTime,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Last7Days => "last_7_days",
            TimeWindow::Last30Days => "last_30_days",
            TimeWindow::AllTime => "all_time",
        }
    }

    pub fn length(&self) -> Option<Duration> {
        match self {
            TimeWindow::Last7Days => Some(Duration::days(7)),
            TimeWindow::Last30Days => Some(Duration::days(30)),
            TimeWindow::AllTime => None,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report request. `now` and `offset` are explicit so the same query over
/// the same orders always yields the same report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsQuery {
    pub window: TimeWindow,
    pub now: DateTime<Utc>,
    /// Tenant-local offset used for day and hour buckets.
    pub offset: FixedOffset,
}

impl AnalyticsQuery {
    pub fn new(window: TimeWindow, offset: FixedOffset) -> Self {
        Self {
            window,
            now: Utc::now(),
            offset,
        }
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Inclusive lower bound, `None` for all time.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.window.length().map(|length| self.now - length)
    }

    /// `[now - N days, now]`, both ends inclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at <= self.now && self.start().map_or(true, |start| at >= start)
    }
}
