//! Versioned sensor history and quality-detection engine for buoy data
//!
//! Scientists import raw buoy readings (one timestamp → value series per
//! physical sensor) and clean them iteratively. This crate is the engine
//! underneath that workflow:
//!
//! - [`series`]: the ordered timestamp → value mapping of one snapshot
//! - [`state`] / [`history`]: immutable snapshots on a linear undo/redo stack
//! - [`detection`]: missing-value and outlier (range + rate-of-change) scans
//! - [`corrections`]: zero, set value, remove and extrapolate, each producing
//!   a new snapshot without touching the old one
//! - [`sensor`] / [`dataset`]: ownership of histories, one lock per sensor
//!
//! Rendering, file formats and UI orchestration live elsewhere. The engine
//! receives series and configuration and returns new snapshots or detection
//! results.
//!
//! ```no_run
//! use buoyqc_core::{Correction, DatasetContext, Selection, Sensor, SensorIdentity, ValueSeries};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let context = DatasetContext::new(start, end, 15);
//!
//! let raw = ValueSeries::new(); // filled by the importer
//! let mut sensor = Sensor::new(SensorIdentity::new("Water Temp", "°C", -2.0, 35.0, 0.5), raw);
//!
//! let report = sensor.detect(&context);
//! let gaps: Selection = report.missing.iter().copied().collect();
//! if sensor.correct(Correction::Extrapolate, &gaps).is_ok() {
//!     sensor.log_reason("filled short logger dropouts").ok();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod calibration;
pub mod constants;
pub mod corrections;
pub mod dataset;
pub mod detection;
pub mod errors;
pub mod history;
pub mod sensor;
pub mod series;
pub mod state;
pub mod time;

// Public API
pub use calibration::{Calibration, CalibrationSet};
pub use corrections::{Correction, Selection};
pub use dataset::{Dataset, SensorHandle};
pub use detection::{missing_value_scan, outlier_scan, DetectionReport, OutlierThresholds};
pub use errors::{QcError, QcResult};
pub use history::HistoryStack;
pub use sensor::{Sensor, SensorIdentity};
pub use series::{Measurement, ValueSeries};
pub use state::SensorState;
pub use time::{Clock, DatasetContext, FixedClock, SystemClock, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
