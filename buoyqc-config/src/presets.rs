//! Starting configurations for common buoy sensors
//!
//! Limits describe what a healthy instrument in a temperate lake or coastal
//! deployment can plausibly report. Rates are per minute.

use crate::sensor::SensorConfig;

/// Preset sensor configurations
pub struct SensorPresets;

impl SensorPresets {
    /// Water temperature (°C)
    pub fn water_temperature() -> SensorConfig {
        SensorConfig::new("Water Temperature", "°C", -2.0, 35.0) // Sea ice to tropical shallows
            .with_max_rate(0.5)
    }

    /// Practical salinity (PSU)
    pub fn salinity() -> SensorConfig {
        SensorConfig::new("Salinity", "PSU", 0.0, 42.0).with_max_rate(1.0)
    }

    /// Dissolved oxygen concentration (mg/L)
    pub fn dissolved_oxygen() -> SensorConfig {
        SensorConfig::new("Dissolved Oxygen", "mg/L", 0.0, 20.0) // Supersaturation ceiling
            .with_max_rate(0.5)
    }

    /// Chlorophyll fluorescence (µg/L)
    pub fn chlorophyll() -> SensorConfig {
        SensorConfig::new("Chlorophyll", "µg/L", 0.0, 500.0) // Bloom conditions
            .with_max_rate(20.0)
    }

    /// Turbidity (NTU)
    pub fn turbidity() -> SensorConfig {
        SensorConfig::new("Turbidity", "NTU", 0.0, 1000.0).with_max_rate(50.0)
    }

    /// Every preset
    pub fn all() -> Vec<SensorConfig> {
        vec![
            Self::water_temperature(),
            Self::salinity(),
            Self::dissolved_oxygen(),
            Self::chlorophyll(),
            Self::turbidity(),
        ]
    }
}
