//! Time segmentation.
//!
//! A dataset's time axis is split into windows that are plotted separately:
//! the whole record, the whole record plus its two halves, or one window per
//! distinct calendar field value.

use crate::error::{OoiPlotError, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Calendar field used to group timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    /// Calendar year.
    Year,
    /// Month number, 1 to 12.
    Month,
    /// Day of the month.
    Day,
    /// Hour of the day.
    Hour,
    /// Ordinal day of the year.
    DayOfYear,
}

impl CalendarUnit {
    /// Grouping key of `t` for this unit.
    pub fn key(self, t: &NaiveDateTime) -> i64 {
        match self {
            Self::Year => i64::from(t.year()),
            Self::Month => i64::from(t.month()),
            Self::Day => i64::from(t.day()),
            Self::Hour => i64::from(t.hour()),
            Self::DayOfYear => i64::from(t.ordinal()),
        }
    }

    /// Get unit name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::DayOfYear => "dayofyear",
        }
    }
}

/// How the time axis is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentMode {
    /// One window over all data.
    Whole,
    /// The full range followed by its first and second halves.
    #[default]
    Bisect,
    /// One window per distinct calendar key, in ascending key order.
    CalendarUnit(CalendarUnit),
}

impl FromStr for SegmentMode {
    type Err = OoiPlotError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let unit = lower.strip_prefix("time.").unwrap_or(&lower);
        let mode = match unit {
            "whole" | "full" => Self::Whole,
            "bisect" => Self::Bisect,
            "year" => Self::CalendarUnit(CalendarUnit::Year),
            "month" => Self::CalendarUnit(CalendarUnit::Month),
            "day" => Self::CalendarUnit(CalendarUnit::Day),
            "hour" => Self::CalendarUnit(CalendarUnit::Hour),
            "dayofyear" => Self::CalendarUnit(CalendarUnit::DayOfYear),
            _ => return Err(OoiPlotError::SegmentMode(s.to_string())),
        };
        Ok(mode)
    }
}

impl fmt::Display for SegmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole => write!(f, "whole"),
            Self::Bisect => write!(f, "bisect"),
            Self::CalendarUnit(unit) => write!(f, "time.{}", unit.name()),
        }
    }
}

/// Inclusive time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSegment {
    /// First instant.
    pub start: NaiveDateTime,
    /// Last instant.
    pub end: NaiveDateTime,
}

impl TimeSegment {
    /// Create a new segment.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whether `t` lies within the segment, bounds included.
    pub fn contains(&self, t: &NaiveDateTime) -> bool {
        self.start <= *t && *t <= self.end
    }
}

/// A segment together with the indices of the samples it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    /// Bounds of the window.
    pub segment: TimeSegment,
    /// Indices into the time axis, ascending.
    pub indices: Vec<usize>,
}

/// Split `time_values` into segments according to `mode`.
pub fn segment_time(time_values: &[NaiveDateTime], mode: SegmentMode) -> Result<Vec<TimeSegment>> {
    Ok(time_windows(time_values, mode)?
        .into_iter()
        .map(|w| w.segment)
        .collect())
}

/// Like [`segment_time`], also returning which samples each segment selects.
///
/// Range modes select every sample inside the segment bounds. Calendar modes
/// select exactly the samples sharing the key, so January of two different
/// years forms one window whose selection skips the months in between.
pub fn time_windows(time_values: &[NaiveDateTime], mode: SegmentMode) -> Result<Vec<TimeWindow>> {
    let t0 = *time_values.iter().min().ok_or(OoiPlotError::EmptyInput)?;
    let t1 = *time_values.iter().max().ok_or(OoiPlotError::EmptyInput)?;

    let windows = match mode {
        SegmentMode::Whole => vec![range_window(time_values, TimeSegment::new(t0, t1))],
        SegmentMode::Bisect => {
            let mid = t0 + (t1 - t0) / 2;
            [
                TimeSegment::new(t0, t1),
                TimeSegment::new(t0, mid),
                TimeSegment::new(mid, t1),
            ]
            .into_iter()
            .map(|segment| range_window(time_values, segment))
            .collect()
        }
        SegmentMode::CalendarUnit(unit) => {
            let mut groups: BTreeMap<i64, TimeWindow> = BTreeMap::new();
            for (i, t) in time_values.iter().enumerate() {
                groups
                    .entry(unit.key(t))
                    .and_modify(|w| {
                        w.segment.start = w.segment.start.min(*t);
                        w.segment.end = w.segment.end.max(*t);
                        w.indices.push(i);
                    })
                    .or_insert_with(|| TimeWindow {
                        segment: TimeSegment::new(*t, *t),
                        indices: vec![i],
                    });
            }
            groups.into_values().collect()
        }
    };

    Ok(windows)
}

fn range_window(time_values: &[NaiveDateTime], segment: TimeSegment) -> TimeWindow {
    let indices = time_values
        .iter()
        .enumerate()
        .filter(|(_, t)| segment.contains(t))
        .map(|(i, _)| i)
        .collect();
    TimeWindow { segment, indices }
}
