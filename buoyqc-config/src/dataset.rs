//! Deployment-level configuration

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use buoyqc_core::constants::{DEFAULT_SAMPLING_INTERVAL_MINUTES, MAX_SAMPLING_INTERVAL_MINUTES};
use buoyqc_core::{Clock, Dataset, DatasetContext, SystemClock, Timestamp, ValueSeries};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::sensor::SensorConfig;
use crate::{ConfigError, ConfigResult};

fn default_interval() -> i64 {
    DEFAULT_SAMPLING_INTERVAL_MINUTES
}

/// A buoy deployment: time range, sampling interval and sensors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetConfig {
    /// Site or buoy name
    #[serde(default)]
    pub site: String,

    /// First expected sample
    pub start: Timestamp,

    /// Last expected sample (inclusive)
    pub end: Timestamp,

    /// Minutes between expected samples
    #[serde(default = "default_interval")]
    pub interval_minutes: i64,

    /// Sensors deployed on the buoy
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

impl DatasetConfig {
    /// Parse from JSON text
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        crate::from_json_str(json)
    }

    /// Read and parse a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        crate::from_json_file(path)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_string(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Detection context for this deployment
    pub fn context(&self) -> DatasetContext {
        DatasetContext::new(self.start, self.end, self.interval_minutes)
    }

    /// Sensor configuration by name
    pub fn sensor(&self, name: &str) -> ConfigResult<&SensorConfig> {
        self.sensors
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ConfigError::NotFound(name.to_owned()))
    }

    /// Check the time range, interval and every sensor
    pub fn validate(&self) -> ConfigResult<()> {
        if self.interval_minutes > MAX_SAMPLING_INTERVAL_MINUTES {
            return Err(ConfigError::invalid(
                "intervalMinutes",
                format!("must not exceed {MAX_SAMPLING_INTERVAL_MINUTES}"),
            ));
        }
        self.context()
            .validate()
            .map_err(|e| ConfigError::invalid("time range", e.to_string()))?;

        let mut names = BTreeSet::new();
        for sensor in &self.sensors {
            sensor.validate()?;
            if !names.insert(sensor.name.as_str()) {
                return Err(ConfigError::invalid(
                    "sensors",
                    format!("duplicate sensor name '{}'", sensor.name),
                ));
            }
        }
        Ok(())
    }

    /// Build a dataset stamped with local system time
    pub fn build(self, series: BTreeMap<String, ValueSeries>) -> ConfigResult<Dataset> {
        self.build_with_clock(series, Arc::new(SystemClock))
    }

    /// Validate and build a dataset, pairing sensors with their raw series by name
    ///
    /// Sensors without a series start empty; series with no configured sensor
    /// are dropped with a warning.
    pub fn build_with_clock(
        self,
        mut series: BTreeMap<String, ValueSeries>,
        clock: Arc<dyn Clock>,
    ) -> ConfigResult<Dataset> {
        self.validate()?;
        let mut dataset = Dataset::new(self.context());

        for sensor in self.sensors {
            let raw = series.remove(&sensor.name).unwrap_or_default();
            if raw.is_empty() {
                debug!("config: sensor '{}' has no raw values", sensor.name);
            }
            dataset.add_sensor(sensor.into_sensor(raw, Arc::clone(&clock))?);
        }
        for orphan in series.keys() {
            warn!("config: no sensor configured for series '{orphan}'");
        }

        debug!("config: built dataset '{}' with {} sensor(s)", self.site, dataset.len());
        Ok(dataset)
    }
}
