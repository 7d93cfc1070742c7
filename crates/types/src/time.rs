use serde::{Deserialize, Serialize};

/// The resolved form of a caller's time specification.
///
/// Every variant expands to an ordered sequence of ephemeris times.
/// Explicit times always win over any range parameters supplied alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeSpec {
    /// Times used verbatim, in caller order.
    ExplicitTimes { values: Vec<f64> },
    /// `count` evenly spaced times, both endpoints included.
    RangeByCount { start: f64, stop: f64, count: usize },
    /// Half-open progression `start, start + duration, ...` below `stop`.
    RangeByDuration { start: f64, stop: f64, duration: f64 },
    /// Parallel arrays of half-open progressions, concatenated in array order.
    SegmentedRangeByDuration {
        starts: Vec<f64>,
        stops: Vec<f64>,
        durations: Vec<f64>,
    },
}

impl TimeSpec {
    pub fn explicit(values: Vec<f64>) -> Self {
        TimeSpec::ExplicitTimes { values }
    }

    pub fn by_count(start: f64, stop: f64, count: usize) -> Self {
        TimeSpec::RangeByCount { start, stop, count }
    }

    pub fn by_duration(start: f64, stop: f64, duration: f64) -> Self {
        TimeSpec::RangeByDuration {
            start,
            stop,
            duration,
        }
    }

    pub fn segmented(starts: Vec<f64>, stops: Vec<f64>, durations: Vec<f64>) -> Self {
        TimeSpec::SegmentedRangeByDuration {
            starts,
            stops,
            durations,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, TimeSpec::ExplicitTimes { .. })
    }
}
