//! Range and rate-of-change rules shared by the outlier scan
//!
//! ## Rate Calculation Details
//!
//! Rates are absolute and expressed in value units per minute:
//!
//! ```text
//! rate = |current - previous| / elapsed_minutes
//! ```
//!
//! `previous` is the nearest *present* sample before `current`, which may be
//! several expected slots back when values are missing. A zero elapsed time
//! cannot occur inside one series (keys are unique) but is still treated as
//! a zero rate rather than a division by zero.

use crate::series::Measurement;
use crate::time::minutes_between;

/// Sensor-specific outlier thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OutlierThresholds {
    /// Smallest acceptable value
    pub lower_limit: f32,
    /// Largest acceptable value
    pub upper_limit: f32,
    /// Largest acceptable absolute change per minute
    pub max_rate_of_change: f32,
}

impl OutlierThresholds {
    /// Create thresholds, swapping reversed limits and taking the rate's magnitude
    pub fn new(lower_limit: f32, upper_limit: f32, max_rate_of_change: f32) -> Self {
        let (lower_limit, upper_limit) = if lower_limit > upper_limit {
            (upper_limit, lower_limit)
        } else {
            (lower_limit, upper_limit)
        };
        Self {
            lower_limit,
            upper_limit,
            max_rate_of_change: max_rate_of_change.abs(),
        }
    }

    /// Range-only thresholds; the rate check never fires
    pub fn range_only(lower_limit: f32, upper_limit: f32) -> Self {
        Self::new(lower_limit, upper_limit, f32::INFINITY)
    }

    /// Range check for one value
    pub fn check_range(&self, value: f32) -> Option<Violation> {
        check_range(value, self.lower_limit, self.upper_limit)
    }

    /// Rate check of `current` against its nearest present predecessor
    pub fn check_rate(&self, current: Measurement, previous: Measurement) -> Option<Violation> {
        let rate = rate_per_minute(current, previous);
        if rate > self.max_rate_of_change {
            Some(Violation::RateExceeded {
                rate,
                max_rate: self.max_rate_of_change,
            })
        } else {
            None
        }
    }
}

/// A broken rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Violation {
    /// Value outside `[min, max]`
    OutOfRange {
        /// The offending value
        value: f32,
        /// Lower limit
        min: f32,
        /// Upper limit
        max: f32,
    },
    /// Value is NaN or infinite
    NotFinite,
    /// Change from the previous present value is too steep
    RateExceeded {
        /// Observed rate per minute
        rate: f32,
        /// Configured maximum per minute
        max_rate: f32,
    },
}

/// Check if a value is within the specified range
pub fn check_range(value: f32, min: f32, max: f32) -> Option<Violation> {
    if !value.is_finite() {
        Some(Violation::NotFinite)
    } else if value < min || value > max {
        Some(Violation::OutOfRange { value, min, max })
    } else {
        None
    }
}

/// Absolute rate of change per minute between two samples
pub fn rate_per_minute(current: Measurement, previous: Measurement) -> f32 {
    let minutes = minutes_between(previous.timestamp, current.timestamp).abs();
    if minutes == 0.0 {
        return 0.0;
    }
    ((current.value - previous.value).abs() as f64 / minutes) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn m(minute: i64, value: f32) -> Measurement {
        let t = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
            + TimeDelta::try_minutes(minute).unwrap();
        Measurement::new(t, value)
    }

    #[test]
    fn range_check() {
        assert!(check_range(5.0, 0.0, 10.0).is_none());
        assert!(check_range(0.0, 0.0, 10.0).is_none());
        assert!(check_range(-1.0, 0.0, 10.0).is_some());
        assert!(check_range(11.0, 0.0, 10.0).is_some());
        assert_eq!(check_range(f32::NAN, 0.0, 10.0), Some(Violation::NotFinite));
    }

    #[test]
    fn rate_calculation() {
        // 15 units over 15 minutes
        assert_eq!(rate_per_minute(m(15, 20.0), m(0, 5.0)), 1.0);
        // Order of arguments does not change the magnitude
        assert_eq!(rate_per_minute(m(0, 5.0), m(15, 20.0)), 1.0);
        // Zero elapsed time
        assert_eq!(rate_per_minute(m(0, 30.0), m(0, 20.0)), 0.0);
    }

    #[test]
    fn thresholds_normalize() {
        let t = OutlierThresholds::new(10.0, 0.0, -2.0);
        assert_eq!(t.lower_limit, 0.0);
        assert_eq!(t.upper_limit, 10.0);
        assert_eq!(t.max_rate_of_change, 2.0);
    }

    #[test]
    fn rate_at_limit_is_accepted() {
        let t = OutlierThresholds::new(0.0, 100.0, 1.0);
        assert!(t.check_rate(m(15, 20.0), m(0, 5.0)).is_none());
        assert!(t.check_rate(m(15, 20.5), m(0, 5.0)).is_some());
    }
}
