//! Time-windowed reduction of value series for chart display.
//!
//! Portfolio history comes back from the backend at full resolution; charts
//! only have a few hundred pixels of width. [`window`] cuts the series down
//! to the selected time span and decimates it to the pixel budget.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One sample of a value series, e.g. portfolio value over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: DateTime<Utc>,
    /// Defaults to 0 when the backend omits the field.
    #[serde(default)]
    pub value: f64,
}

/// Selectable chart time spans, shown as toggle buttons in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpan {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeSpan {
    /// Spans in the order they appear as chart toggles.
    pub const ALL_SPANS: [TimeSpan; 5] = [
        TimeSpan::Day,
        TimeSpan::Week,
        TimeSpan::Month,
        TimeSpan::Year,
        TimeSpan::All,
    ];

    /// Toggle label for this span.
    pub fn label(&self) -> &'static str {
        match self {
            TimeSpan::Day => "1D",
            TimeSpan::Week => "1W",
            TimeSpan::Month => "1M",
            TimeSpan::Year => "1Y",
            TimeSpan::All => "ALL",
        }
    }

    /// Lookback duration of this span; `None` keeps the whole series.
    pub fn lookback(&self) -> Option<Duration> {
        match self {
            TimeSpan::Day => Some(Duration::hours(24)),
            TimeSpan::Week => Some(Duration::days(7)),
            TimeSpan::Month => Some(Duration::days(30)),
            TimeSpan::Year => Some(Duration::days(365)),
            TimeSpan::All => None,
        }
    }
}

impl std::fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reduce `series` to the given span and pixel budget, relative to now.
///
/// See [`window_at`] for the algorithm; this wrapper captures the current
/// time, so repeated calls move the window as wall-clock time advances.
pub fn window(series: &[TimePoint], span: TimeSpan, pixel_budget: usize) -> Vec<TimePoint> {
    window_at(series, span, pixel_budget, Utc::now())
}

/// Reduce `series` (ordered by ascending timestamp) to at most roughly
/// `pixel_budget` points within `span` before `now`.
///
/// Points older than the span's lookback are dropped first, preserving
/// order. Two or fewer surviving points are returned as-is. Otherwise every
/// `ceil(len / pixel_budget)`-th point by position is kept, starting at
/// index 0. Position-based decimation can alias peaks between kept samples;
/// that is accepted in exchange for a cheap, deterministic reduction.
///
/// `pixel_budget` must be positive (it is a display width); zero panics on
/// the step division.
pub fn window_at(
    series: &[TimePoint],
    span: TimeSpan,
    pixel_budget: usize,
    now: DateTime<Utc>,
) -> Vec<TimePoint> {
    let filtered: Vec<TimePoint> = match span.lookback() {
        None => series.to_vec(),
        Some(lookback) => {
            let cutoff = now - lookback;
            series.iter().copied().filter(|p| p.timestamp >= cutoff).collect()
        }
    };

    if filtered.len() <= 2 {
        return filtered;
    }

    let step = filtered.len().div_ceil(pixel_budget);
    filtered.into_iter().step_by(step).collect()
}
