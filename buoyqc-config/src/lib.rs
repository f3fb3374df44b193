//! Configuration Documents for Buoy Sensors and Datasets
//!
//! ## Overview
//!
//! The engine in `buoyqc-core` never reads files. It is handed thresholds,
//! dataset bounds and series by its callers. This crate is where those
//! values come from: JSON documents describing a deployment and its
//! sensors, validated before they reach the engine.
//!
//! ## Document Shape
//!
//! ```json
//! {
//!   "site": "Lake Rotorua",
//!   "start": "2024-03-01T00:00:00",
//!   "end": "2024-03-31T23:45:00",
//!   "intervalMinutes": 15,
//!   "sensors": [
//!     {
//!       "name": "Water Temp (1m)",
//!       "unit": "°C",
//!       "lowerLimit": -2.0,
//!       "upperLimit": 32.0,
//!       "maxRateOfChange": 0.2,
//!       "manufacturer": "Sea-Bird",
//!       "serialNumber": "SBE56-0421",
//!       "calibrations": [
//!         { "effectiveFrom": "2024-03-15T00:00:00", "multiplier": 1.0, "offset": -0.12 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `intervalMinutes` defaults to 15; `maxRateOfChange` defaults to
//! unlimited; instrument details and calibrations are optional.
//!
//! ## Usage Example
//!
//! ```rust
//! use buoyqc_config::{DatasetConfig, SensorPresets};
//!
//! let json = r#"{
//!     "site": "Test Buoy",
//!     "start": "2024-03-01T00:00:00",
//!     "end": "2024-03-01T01:00:00",
//!     "sensors": []
//! }"#;
//! let mut config = DatasetConfig::from_json_str(json)?;
//! config.sensors.push(SensorPresets::dissolved_oxygen());
//! config.validate()?;
//!
//! let context = config.context();
//! assert_eq!(context.interval_minutes, 15);
//! # Ok::<(), buoyqc_config::ConfigError>(())
//! ```

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

pub mod dataset;
pub mod presets;
pub mod registry;
pub mod sensor;

pub use dataset::DatasetConfig;
pub use presets::SensorPresets;
pub use registry::ConfigRegistry;
pub use sensor::SensorConfig;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Failed to read configuration: {0}")]
    Io(String),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Sensor configuration not found: {0}")]
    NotFound(String),

    #[error("Configuration registry lock poisoned")]
    LockPoisoned,
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Parse any configuration document from JSON text
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> ConfigResult<T> {
    serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Read and parse a configuration document from a JSON file
pub fn from_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> ConfigResult<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
    log::debug!("loaded configuration from {}", path.display());
    from_json_str(&text)
}
