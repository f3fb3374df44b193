//! Per-sensor configuration

use std::sync::Arc;

use buoyqc_core::constants::UNLIMITED_RATE_OF_CHANGE;
use buoyqc_core::{Calibration, CalibrationSet, Clock, Sensor, SensorIdentity, ValueSeries};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Description, limits and calibrations of one sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorConfig {
    /// Display name, unique within a dataset
    pub name: String,

    /// Measurement unit
    pub unit: String,

    /// Smallest plausible value
    pub lower_limit: f32,

    /// Largest plausible value
    pub upper_limit: f32,

    /// Largest plausible change per minute; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rate_of_change: Option<f32>,

    /// Instrument manufacturer
    #[serde(default)]
    pub manufacturer: String,

    /// Instrument serial number
    #[serde(default)]
    pub serial_number: String,

    /// Value written into gaps by a default fill
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f32>,

    /// Read-time calibrations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calibrations: Vec<Calibration>,
}

impl SensorConfig {
    /// Minimal configuration with limits only
    pub fn new(name: impl Into<String>, unit: impl Into<String>, lower_limit: f32, upper_limit: f32) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            lower_limit,
            upper_limit,
            max_rate_of_change: None,
            manufacturer: String::new(),
            serial_number: String::new(),
            default_value: None,
            calibrations: Vec::new(),
        }
    }

    /// Set the rate-of-change limit
    pub fn with_max_rate(mut self, max_rate_of_change: f32) -> Self {
        self.max_rate_of_change = Some(max_rate_of_change);
        self
    }

    /// Set the default fill value
    pub fn with_default_value(mut self, value: f32) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Check names, limits, default value and calibrations
    pub fn validate(&self) -> ConfigResult<()> {
        let field = |name: &str| format!("sensor '{}' {name}", self.name);

        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("sensor name", "must not be empty"));
        }
        if !self.lower_limit.is_finite() || !self.upper_limit.is_finite() {
            return Err(ConfigError::invalid(field("limits"), "must be finite"));
        }
        if self.lower_limit > self.upper_limit {
            return Err(ConfigError::invalid(
                field("limits"),
                format!("lower limit {} exceeds upper limit {}", self.lower_limit, self.upper_limit),
            ));
        }
        if let Some(rate) = self.max_rate_of_change {
            if rate.is_nan() || rate < 0.0 {
                return Err(ConfigError::invalid(field("maxRateOfChange"), "must be non-negative"));
            }
        }
        if let Some(value) = self.default_value {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field("defaultValue"), "must be finite"));
            }
        }
        for calibration in &self.calibrations {
            if !calibration.multiplier.is_finite() || !calibration.offset.is_finite() {
                return Err(ConfigError::invalid(
                    field("calibration"),
                    format!("non-finite coefficients from {}", calibration.effective_from),
                ));
            }
        }
        Ok(())
    }

    /// Identity carried by the built sensor
    pub fn identity(&self) -> SensorIdentity {
        SensorIdentity::new(
            self.name.clone(),
            self.unit.clone(),
            self.lower_limit,
            self.upper_limit,
            self.max_rate_of_change.unwrap_or(UNLIMITED_RATE_OF_CHANGE),
        )
        .with_instrument(self.manufacturer.clone(), self.serial_number.clone())
    }

    /// Calibrations ordered by start time
    pub fn calibration_set(&self) -> CalibrationSet {
        self.calibrations.iter().copied().collect()
    }

    /// Validate and build a sensor whose raw state is `raw`
    pub fn into_sensor(self, raw: ValueSeries, clock: Arc<dyn Clock>) -> ConfigResult<Sensor> {
        self.validate()?;
        let mut sensor = Sensor::with_clock(self.identity(), raw, clock);
        sensor.set_calibrations(self.calibration_set());
        Ok(sensor)
    }
}
