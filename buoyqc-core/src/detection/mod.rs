//! Missing-Value and Outlier Detection
//!
//! ## Overview
//!
//! Two read-only linear scans over a sensor's current values:
//!
//! ### 1. Missing-value scan
//! Generates every expected sample time from the dataset context
//! (`start`, `start + interval`, ... `end` inclusive) and reports the ones
//! with no value.
//!
//! ### 2. Outlier scan
//! Flags present values inside the dataset bounds that either
//! - fall outside `[lower_limit, upper_limit]`, or
//! - change faster than `max_rate_of_change` per minute relative to the
//!   nearest *present* earlier sample.
//!
//! ```text
//! slot:    0     15    30    45    60
//! value:   1.0   --    5.0   9.0   --
//!                 ↑           ↑
//!              missing     rate vs 5.0 over 15 min
//!              (skipped    (not vs the gap at 15)
//!               for rate)
//! ```
//!
//! ## Caching
//!
//! Results are not cached. Callers rescan after every correction; both scans
//! are linear in the number of values in range.
//!
//! ## Degenerate Configuration
//!
//! A non-positive interval, an interval too large to represent as a
//! duration, or `end < start` makes both scans return nothing (with a logged
//! warning) instead of failing.

mod missing;
mod outliers;
pub mod rules;

use crate::series::ValueSeries;
use crate::time::{DatasetContext, Timestamp};

pub use missing::missing_value_scan;
pub use outliers::{classify_outliers, outlier_scan, Outlier, OutlierKind};
pub use rules::{OutlierThresholds, Violation};

/// Combined result of both scans
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionReport {
    /// Expected sample times with no value, ascending
    pub missing: Vec<Timestamp>,
    /// Flagged samples, ascending
    pub outliers: Vec<Outlier>,
}

impl DetectionReport {
    /// Timestamps of the flagged samples
    pub fn outlier_timestamps(&self) -> Vec<Timestamp> {
        self.outliers.iter().map(Outlier::timestamp).collect()
    }

    /// Nothing missing and nothing flagged
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.outliers.is_empty()
    }
}

/// Run both scans over one series
pub fn scan(
    series: &ValueSeries,
    context: &DatasetContext,
    thresholds: &OutlierThresholds,
) -> DetectionReport {
    DetectionReport {
        missing: missing_value_scan(series, context),
        outliers: classify_outliers(series, context, thresholds),
    }
}
