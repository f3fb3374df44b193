//! Shared fixtures for integration tests
//!
//! Provides:
//! - Minute-offset timestamps on a fixed deployment day
//! - Series and sensor builders
//! - A deterministic clock

#![allow(dead_code)]

use std::sync::Arc;

use buoyqc_core::{DatasetContext, FixedClock, Sensor, SensorIdentity, Timestamp, ValueSeries};
use chrono::{NaiveDate, TimeDelta};

/// Deployment start used by every fixture
pub fn origin() -> Timestamp {
    NaiveDate::from_ymd_opt(2023, 11, 14)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// `origin() + minute`
pub fn at(minute: i64) -> Timestamp {
    origin() + TimeDelta::try_minutes(minute).unwrap()
}

/// Series from `(minute, value)` pairs
pub fn series(points: &[(i64, f32)]) -> ValueSeries {
    points.iter().map(|&(m, v)| (at(m), v)).collect()
}

/// Context from minute offsets
pub fn context(start: i64, end: i64, interval: i64) -> DatasetContext {
    DatasetContext::new(at(start), at(end), interval)
}

/// Regular series sampled every `interval` minutes for `count` samples
pub fn regular(count: usize, interval: i64, f: impl Fn(usize) -> f32) -> ValueSeries {
    (0..count).map(|i| (at(i as i64 * interval), f(i))).collect()
}

/// Water temperature sensor with typical coastal limits
pub fn water_temp(raw: ValueSeries) -> Sensor {
    let identity = SensorIdentity::new("Water Temp (1m)", "°C", -2.0, 32.0, 0.2)
        .with_instrument("Sea-Bird", "SBE56-0421");
    Sensor::with_clock(identity, raw, Arc::new(FixedClock::new(at(10_000))))
}
