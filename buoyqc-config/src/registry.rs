//! Shared registry of sensor configurations
//!
//! Holds validated sensor configurations by name so that several datasets
//! can draw from one catalogue of instruments. Readers never block each
//! other.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::RwLock;

use log::{debug, warn};

use crate::dataset::DatasetConfig;
use crate::sensor::SensorConfig;
use crate::{ConfigError, ConfigResult};

/// Thread-safe catalogue of sensor configurations
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    sensors: RwLock<BTreeMap<String, SensorConfig>>,
}

impl ConfigRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every preset
    pub fn with_presets() -> ConfigResult<Self> {
        let registry = Self::new();
        for preset in crate::presets::SensorPresets::all() {
            registry.register(preset)?;
        }
        Ok(registry)
    }

    /// Validate and register, returning the configuration it replaced
    pub fn register(&self, config: SensorConfig) -> ConfigResult<Option<SensorConfig>> {
        config.validate()?;
        let mut sensors = self.sensors.write().map_err(|_| ConfigError::LockPoisoned)?;
        let name = config.name.clone();
        let previous = sensors.insert(name.clone(), config);
        if previous.is_some() {
            warn!("registry: replaced configuration for '{name}'");
        } else {
            debug!("registry: registered '{name}'");
        }
        Ok(previous)
    }

    /// Configuration by name
    pub fn get(&self, name: &str) -> ConfigResult<SensorConfig> {
        let sensors = self.sensors.read().map_err(|_| ConfigError::LockPoisoned)?;
        sensors
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(name.to_owned()))
    }

    /// Drop a configuration
    pub fn remove(&self, name: &str) -> ConfigResult<SensorConfig> {
        let mut sensors = self.sensors.write().map_err(|_| ConfigError::LockPoisoned)?;
        sensors
            .remove(name)
            .ok_or_else(|| ConfigError::NotFound(name.to_owned()))
    }

    /// Registered names in order
    pub fn names(&self) -> ConfigResult<Vec<String>> {
        let sensors = self.sensors.read().map_err(|_| ConfigError::LockPoisoned)?;
        Ok(sensors.keys().cloned().collect())
    }

    /// Number of registered configurations
    pub fn len(&self) -> usize {
        self.sensors.read().map(|s| s.len()).unwrap_or(0)
    }

    /// No registered configurations
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load a dataset document and register its sensors
    pub fn load_dataset(&self, path: impl AsRef<Path>) -> ConfigResult<DatasetConfig> {
        let config = DatasetConfig::from_json_file(path)?;
        config.validate()?;
        for sensor in &config.sensors {
            self.register(sensor.clone())?;
        }
        Ok(config)
    }
}
