//! CF time coordinate decoding.
//!
//! OOI files store time as a number of units since a reference instant,
//! e.g. `seconds since 1900-01-01 0:00:00`. Only the standard (proleptic
//! Gregorian) calendar is supported.

use crate::error::{OoiPlotError, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Parsed `<unit> since <reference>` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    /// Microseconds per unit.
    micros_per_unit: i64,
    /// Instant the offsets count from.
    reference: NaiveDateTime,
}

impl TimeUnits {
    /// Parse a CF `units` attribute.
    pub fn parse(units: &str) -> Result<Self> {
        let (unit, reference) = units
            .split_once(" since ")
            .ok_or_else(|| OoiPlotError::TimeUnits(units.to_string()))?;

        let micros_per_unit = match unit.trim().to_lowercase().as_str() {
            "microseconds" | "microsecond" | "microsecs" | "microsec" => 1,
            "milliseconds" | "millisecond" | "millisecs" | "millisec" | "msecs" | "msec" | "ms" => {
                1_000
            }
            "seconds" | "second" | "secs" | "sec" | "s" => 1_000_000,
            "minutes" | "minute" | "mins" | "min" => 60_000_000,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600_000_000,
            "days" | "day" | "d" => 86_400_000_000,
            _ => return Err(OoiPlotError::TimeUnits(units.to_string())),
        };

        let reference = parse_reference(reference)
            .ok_or_else(|| OoiPlotError::TimeUnits(units.to_string()))?;

        Ok(Self {
            micros_per_unit,
            reference,
        })
    }

    /// Instant `value` units after the reference.
    pub fn decode(&self, value: f64) -> Result<NaiveDateTime> {
        let micros = value * self.micros_per_unit as f64;
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return Err(OoiPlotError::TimeUnits(format!("value {} out of range", value)));
        }
        self.reference
            .checked_add_signed(TimeDelta::microseconds(micros.round() as i64))
            .ok_or_else(|| OoiPlotError::TimeUnits(format!("value {} out of range", value)))
    }

    /// Decode every value.
    pub fn decode_all(&self, values: &[f64]) -> Result<Vec<NaiveDateTime>> {
        values.iter().map(|&v| self.decode(v)).collect()
    }
}

/// Check a CF `calendar` attribute. Only calendars that agree with the
/// proleptic Gregorian calendar for OOI-era dates are decoded.
pub fn check_calendar(calendar: &str) -> Result<()> {
    match calendar.trim().to_lowercase().as_str() {
        "standard" | "gregorian" | "proleptic_gregorian" => Ok(()),
        other => Err(OoiPlotError::TimeUnits(format!("unsupported calendar '{}'", other))),
    }
}

fn parse_reference(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    let text = text
        .strip_suffix(" UTC")
        .or_else(|| text.strip_suffix('Z'))
        .unwrap_or(text)
        .replace('T', " ");

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(&text, format) {
            return Some(t);
        }
    }

    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
