//! Read-time calibration of sensor values
//!
//! Calibrations are timestamped `multiplier`/`offset` pairs attached to a
//! sensor. They are applied when values are read, layered over the current
//! state, and never written into the history:
//!
//! ```text
//! calibrated(t) = raw(t) * multiplier + offset
//! ```
//!
//! using the most recent calibration whose `effective_from` is at or before
//! `t`. Values recorded before the first calibration pass through unchanged.

use crate::series::ValueSeries;
use crate::time::Timestamp;

/// Linear correction effective from a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Calibration {
    /// First sample time this calibration applies to
    pub effective_from: Timestamp,
    /// Gain
    pub multiplier: f32,
    /// Offset added after the gain
    pub offset: f32,
}

impl Calibration {
    /// Create a calibration
    pub fn new(effective_from: Timestamp, multiplier: f32, offset: f32) -> Self {
        Self {
            effective_from,
            multiplier,
            offset,
        }
    }

    /// Apply to one value
    pub fn apply(&self, value: f32) -> f32 {
        value * self.multiplier + self.offset
    }
}

/// Calibrations ordered by `effective_from`
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CalibrationSet {
    entries: Vec<Calibration>,
}

impl CalibrationSet {
    /// No calibrations
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a calibration, replacing one with the same start time
    pub fn insert(&mut self, calibration: Calibration) {
        match self
            .entries
            .binary_search_by(|c| c.effective_from.cmp(&calibration.effective_from))
        {
            Ok(idx) => self.entries[idx] = calibration,
            Err(idx) => self.entries.insert(idx, calibration),
        }
    }

    /// Drop the calibration starting at `effective_from`
    pub fn remove(&mut self, effective_from: Timestamp) -> Option<Calibration> {
        let idx = self
            .entries
            .binary_search_by(|c| c.effective_from.cmp(&effective_from))
            .ok()?;
        Some(self.entries.remove(idx))
    }

    /// Calibration in force at `t`
    pub fn effective_at(&self, t: Timestamp) -> Option<&Calibration> {
        let idx = self.entries.partition_point(|c| c.effective_from <= t);
        idx.checked_sub(1).map(|i| &self.entries[i])
    }

    /// Calibrated copy of `series`
    pub fn apply(&self, series: &ValueSeries) -> ValueSeries {
        if self.entries.is_empty() {
            return series.clone();
        }
        series.map_values(|t, v| match self.effective_at(t) {
            Some(calibration) => calibration.apply(v),
            None => v,
        })
    }

    /// Number of calibrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No calibrations
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calibrations in time order
    pub fn iter(&self) -> impl Iterator<Item = &Calibration> {
        self.entries.iter()
    }
}

impl FromIterator<Calibration> for CalibrationSet {
    fn from_iter<I: IntoIterator<Item = Calibration>>(iter: I) -> Self {
        let mut set = Self::new();
        for calibration in iter {
            set.insert(calibration);
        }
        set
    }
}
