//! Ordered timestamp → value storage for one sensor snapshot
//!
//! ## Overview
//!
//! A `ValueSeries` is the raw unit of a snapshot: a sparse mapping from sample
//! time to measured value. Keys are unique and always iterate in ascending
//! order, so "the previous present sample" is a range query rather than a
//! slot lookup. That matters for rate-of-change detection, which must skip
//! over missing samples to find the nearest present neighbour.
//!
//! Inserting at an existing timestamp overwrites. Correction operations rely
//! on this to replace outliers and fill gaps with the same `set` call.
//!
//! ## Ownership
//!
//! The series is a plain value. `clone()` is a deep copy with no aliasing
//! between the original and the copy, so every committed snapshot owns its
//! data outright.
//!
//! ```rust
//! use buoyqc_core::series::ValueSeries;
//! use chrono::NaiveDate;
//!
//! let t0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let mut series = ValueSeries::new();
//! series.set(t0, 12.5);
//!
//! let mut edited = series.clone();
//! edited.set(t0, 0.0);
//!
//! assert_eq!(series.get(t0), Some(12.5));
//! assert_eq!(edited.get(t0), Some(0.0));
//! ```

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::time::Timestamp;

/// Single sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Sample time
    pub timestamp: Timestamp,
    /// Measured value
    pub value: f32,
}

impl Measurement {
    /// Create a measurement
    pub fn new(timestamp: Timestamp, value: f32) -> Self {
        Self { timestamp, value }
    }
}

/// Ordered mapping from timestamp to value
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ValueSeries {
    points: BTreeMap<Timestamp, f32>,
}

impl ValueSeries {
    /// Empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `timestamp`, `None` when missing
    pub fn get(&self, timestamp: Timestamp) -> Option<f32> {
        self.points.get(&timestamp).copied()
    }

    /// Whether a value is present at `timestamp`
    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.points.contains_key(&timestamp)
    }

    /// Insert or overwrite; returns the previous value if any
    pub fn set(&mut self, timestamp: Timestamp, value: f32) -> Option<f32> {
        self.points.insert(timestamp, value)
    }

    /// Delete the value at `timestamp`; absent keys are a no-op
    pub fn remove(&mut self, timestamp: Timestamp) -> Option<f32> {
        self.points.remove(&timestamp)
    }

    /// Number of present values
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// No present values
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All measurements, ascending by time
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Measurement> + '_ {
        self.points
            .iter()
            .map(|(&timestamp, &value)| Measurement { timestamp, value })
    }

    /// Present measurements in `[start, end]`, ascending
    ///
    /// Empty when `end < start`.
    pub fn range(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> Box<dyn DoubleEndedIterator<Item = Measurement> + '_> {
        if end < start {
            return Box::new(core::iter::empty());
        }
        Box::new(
            self.points
                .range(start..=end)
                .map(|(&timestamp, &value)| Measurement { timestamp, value }),
        )
    }

    /// Present timestamps in `[start, end]`, ascending
    pub fn keys_in_range(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> impl DoubleEndedIterator<Item = Timestamp> + '_ {
        self.range(start, end).map(|m| m.timestamp)
    }

    /// Nearest present measurement at or before `timestamp`
    pub fn at_or_before(&self, timestamp: Timestamp) -> Option<Measurement> {
        self.points
            .range(..=timestamp)
            .next_back()
            .map(|(&timestamp, &value)| Measurement { timestamp, value })
    }

    /// Nearest present measurement strictly before `timestamp`
    pub fn before(&self, timestamp: Timestamp) -> Option<Measurement> {
        self.points
            .range((Bound::Unbounded, Bound::Excluded(timestamp)))
            .next_back()
            .map(|(&timestamp, &value)| Measurement { timestamp, value })
    }

    /// Nearest present measurement at or after `timestamp`
    pub fn at_or_after(&self, timestamp: Timestamp) -> Option<Measurement> {
        self.points
            .range(timestamp..)
            .next()
            .map(|(&timestamp, &value)| Measurement { timestamp, value })
    }

    /// Earliest measurement
    pub fn first(&self) -> Option<Measurement> {
        self.iter().next()
    }

    /// Latest measurement
    pub fn last(&self) -> Option<Measurement> {
        self.iter().next_back()
    }

    /// Apply `f` to every value, keeping timestamps
    pub fn map_values<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Timestamp, f32) -> f32,
    {
        self.points
            .iter()
            .map(|(&t, &v)| (t, f(t, v)))
            .collect()
    }
}

impl FromIterator<(Timestamp, f32)> for ValueSeries {
    fn from_iter<I: IntoIterator<Item = (Timestamp, f32)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Measurement> for ValueSeries {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        iter.into_iter().map(|m| (m.timestamp, m.value)).collect()
    }
}

impl Extend<(Timestamp, f32)> for ValueSeries {
    fn extend<I: IntoIterator<Item = (Timestamp, f32)>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn at(minute: i64) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + TimeDelta::try_minutes(minute).unwrap()
    }

    fn sample() -> ValueSeries {
        [(at(30), 2.0), (at(0), 1.0), (at(60), 3.0)].into_iter().collect()
    }

    #[test]
    fn keys_iterate_ascending() {
        let keys: Vec<_> = sample().iter().map(|m| m.timestamp).collect();
        assert_eq!(keys, vec![at(0), at(30), at(60)]);
    }

    #[test]
    fn set_overwrites_existing_timestamp() {
        let mut series = sample();
        assert_eq!(series.set(at(30), 9.0), Some(2.0));
        assert_eq!(series.get(at(30)), Some(9.0));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut series = sample();
        assert_eq!(series.remove(at(15)), None);
        assert_eq!(series, sample());
    }

    #[test]
    fn range_is_inclusive() {
        let series = sample();
        let keys: Vec<_> = series.keys_in_range(at(0), at(30)).collect();
        assert_eq!(keys, vec![at(0), at(30)]);
        assert_eq!(series.keys_in_range(at(60), at(0)).count(), 0);
    }

    #[test]
    fn neighbour_lookups_skip_gaps() {
        let series = sample();
        assert_eq!(series.at_or_before(at(45)).map(|m| m.timestamp), Some(at(30)));
        assert_eq!(series.at_or_before(at(30)).map(|m| m.timestamp), Some(at(30)));
        assert_eq!(series.before(at(30)).map(|m| m.timestamp), Some(at(0)));
        assert_eq!(series.at_or_after(at(31)).map(|m| m.timestamp), Some(at(60)));
        assert!(series.at_or_after(at(61)).is_none());
    }

    #[test]
    fn clone_does_not_alias() {
        let original = sample();
        let mut copy = original.clone();
        copy.set(at(0), -1.0);
        assert_eq!(original.get(at(0)), Some(1.0));
    }
}
