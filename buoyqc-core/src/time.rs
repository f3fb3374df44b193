//! Time handling for buoy datasets
//!
//! Provides:
//! - The `Timestamp` type used as the series key
//! - `DatasetContext`: start/end bounds plus sampling interval, read-only to the engine
//! - A clock abstraction that stamps new states with their edit time

use std::sync::Mutex;

use chrono::{NaiveDateTime, TimeDelta};

use crate::errors::{QcError, QcResult};

/// Wall-clock timestamp as recorded by the buoy logger (no zone)
pub type Timestamp = NaiveDateTime;

/// Milliseconds per minute
pub const MS_PER_MINUTE: i64 = 60_000;

/// Elapsed minutes from `earlier` to `later` (negative if reversed)
pub fn minutes_between(earlier: Timestamp, later: Timestamp) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MS_PER_MINUTE as f64
}

/// Bounds and sampling interval of the dataset a sensor belongs to
///
/// Supplied by the caller on every detection or correction call; the engine
/// never owns or mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DatasetContext {
    /// First expected sample
    pub start: Timestamp,
    /// Last expected sample (inclusive)
    pub end: Timestamp,
    /// Minutes between expected samples
    pub interval_minutes: i64,
}

impl DatasetContext {
    /// Create a context without validating it
    pub fn new(start: Timestamp, end: Timestamp, interval_minutes: i64) -> Self {
        Self {
            start,
            end,
            interval_minutes,
        }
    }

    /// Reject non-positive intervals, intervals too large to represent as a
    /// duration, and reversed bounds
    pub fn validate(&self) -> QcResult<()> {
        if self.interval_minutes <= 0 || self.end < self.start || self.interval().is_none() {
            return Err(QcError::InvalidRange {
                interval_minutes: self.interval_minutes,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Whether the context describes a scannable range
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Sampling interval as a duration, if representable and positive
    pub fn interval(&self) -> Option<TimeDelta> {
        if self.interval_minutes <= 0 {
            return None;
        }
        TimeDelta::try_minutes(self.interval_minutes)
    }

    /// Whether `t` lies inside `[start, end]`
    pub fn contains(&self, t: Timestamp) -> bool {
        t >= self.start && t <= self.end
    }

    /// Every expected sample time, ascending, `end` inclusive
    ///
    /// Yields nothing for a context that fails [`validate`](Self::validate),
    /// including an interval too large for [`TimeDelta`] even when
    /// `start == end`.
    pub fn expected_timestamps(&self) -> ExpectedTimestamps {
        ExpectedTimestamps::new(self.start, self.end, self.interval_minutes)
    }
}

/// Lazy iterator over `start, start + interval, ...` up to `end`
#[derive(Debug, Clone)]
pub struct ExpectedTimestamps {
    next: Option<Timestamp>,
    end: Timestamp,
    step: Option<TimeDelta>,
}

impl ExpectedTimestamps {
    /// Iterate the expected slots of an arbitrary span
    pub fn new(start: Timestamp, end: Timestamp, interval_minutes: i64) -> Self {
        let step = if interval_minutes > 0 {
            TimeDelta::try_minutes(interval_minutes)
        } else {
            None
        };
        let next = if step.is_some() && start <= end {
            Some(start)
        } else {
            None
        };
        Self { next, end, step }
    }
}

impl Iterator for ExpectedTimestamps {
    type Item = Timestamp;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let step = self.step?;
        self.next = current
            .checked_add_signed(step)
            .filter(|candidate| *candidate <= self.end);
        Some(current)
    }
}

/// Source of edit timestamps
pub trait Clock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> Timestamp;
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Local::now().naive_local()
    }
}

/// Fixed time source for testing and replay
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<Timestamp>,
}

impl FixedClock {
    /// Clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            now: Mutex::new(timestamp),
        }
    }

    /// Move the clock to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = timestamp;
    }

    /// Move the clock forward
    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(later) = TimeDelta::try_minutes(minutes).and_then(|d| now.checked_add_signed(d)) {
            *now = later;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(minute: i64) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + TimeDelta::try_minutes(minute).unwrap()
    }

    #[test]
    fn expected_timestamps_include_end() {
        let ctx = DatasetContext::new(at(0), at(60), 15);
        let slots: Vec<_> = ctx.expected_timestamps().collect();
        assert_eq!(slots, vec![at(0), at(15), at(30), at(45), at(60)]);
    }

    #[test]
    fn expected_timestamps_stop_before_overshoot() {
        let ctx = DatasetContext::new(at(0), at(50), 15);
        assert_eq!(ctx.expected_timestamps().last(), Some(at(45)));
    }

    #[test]
    fn degenerate_contexts_yield_nothing() {
        assert_eq!(DatasetContext::new(at(0), at(60), 0).expected_timestamps().count(), 0);
        assert_eq!(DatasetContext::new(at(0), at(60), -5).expected_timestamps().count(), 0);
        assert_eq!(DatasetContext::new(at(60), at(0), 15).expected_timestamps().count(), 0);
    }

    #[test]
    fn validate_reports_invalid_range() {
        let ctx = DatasetContext::new(at(60), at(0), 15);
        assert!(matches!(ctx.validate(), Err(QcError::InvalidRange { .. })));
        assert!(DatasetContext::new(at(0), at(0), 15).validate().is_ok());
    }

    #[test]
    fn unrepresentable_interval_is_degenerate() {
        let ctx = DatasetContext::new(at(0), at(0), i64::MAX);
        assert!(ctx.interval().is_none());
        assert!(matches!(ctx.validate(), Err(QcError::InvalidRange { .. })));
        assert_eq!(ctx.expected_timestamps().count(), 0);
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(at(0));
        assert_eq!(clock.now(), at(0));

        clock.advance_minutes(30);
        assert_eq!(clock.now(), at(30));
    }

    #[test]
    fn minutes_between_is_signed() {
        assert_eq!(minutes_between(at(0), at(90)), 90.0);
        assert_eq!(minutes_between(at(90), at(0)), -90.0);
    }
}
