//! Sensors of one buoy deployment sharing a time range
//!
//! Each sensor sits behind its own lock. No mutable state is shared across
//! sensors, so a batch scan can run one worker per sensor while an edit on
//! any single sensor only ever holds that sensor's lock.

use std::collections::BTreeMap;
use std::panic;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use log::{debug, warn};

use crate::detection::DetectionReport;
use crate::errors::{QcError, QcResult};
use crate::sensor::Sensor;
use crate::time::DatasetContext;

/// Shared handle to one independently lockable sensor
pub type SensorHandle = Arc<Mutex<Sensor>>;

/// Lock a sensor, mapping poisoning to [`QcError::LockPoisoned`]
pub fn lock(handle: &SensorHandle) -> QcResult<MutexGuard<'_, Sensor>> {
    handle.lock().map_err(|_| QcError::LockPoisoned)
}

/// A deployment: time range, sampling interval and its sensors
#[derive(Debug, Clone)]
pub struct Dataset {
    context: DatasetContext,
    sensors: BTreeMap<String, SensorHandle>,
}

impl Dataset {
    /// Empty dataset over `context`
    pub fn new(context: DatasetContext) -> Self {
        Self {
            context,
            sensors: BTreeMap::new(),
        }
    }

    /// Bounds and interval
    pub fn context(&self) -> &DatasetContext {
        &self.context
    }

    /// Change bounds or interval; callers rescan afterwards
    pub fn set_context(&mut self, context: DatasetContext) {
        self.context = context;
    }

    /// Add a sensor keyed by its current name, replacing any namesake
    pub fn add_sensor(&mut self, sensor: Sensor) -> SensorHandle {
        let name = sensor.name().to_owned();
        let handle = Arc::new(Mutex::new(sensor));
        if self.sensors.insert(name.clone(), Arc::clone(&handle)).is_some() {
            warn!("dataset: replaced existing sensor '{name}'");
        }
        handle
    }

    /// Detach a sensor
    pub fn remove_sensor(&mut self, name: &str) -> QcResult<SensorHandle> {
        self.sensors.remove(name).ok_or_else(|| QcError::SensorNotFound {
            name: name.to_owned(),
        })
    }

    /// Handle to a sensor by name
    pub fn sensor(&self, name: &str) -> QcResult<SensorHandle> {
        self.sensors
            .get(name)
            .cloned()
            .ok_or_else(|| QcError::SensorNotFound {
                name: name.to_owned(),
            })
    }

    /// Sensor names in order
    pub fn sensor_names(&self) -> impl Iterator<Item = &str> {
        self.sensors.keys().map(String::as_str)
    }

    /// Number of sensors
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    /// No sensors
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Scan one sensor against the dataset context
    pub fn detect(&self, name: &str) -> QcResult<DetectionReport> {
        let handle = self.sensor(name)?;
        let sensor = lock(&handle)?;
        Ok(sensor.detect(&self.context))
    }

    /// Scan every sensor, one worker thread per sensor
    ///
    /// Fails with [`QcError::LockPoisoned`] if any sensor lock is poisoned.
    /// A panicking worker re-raises its panic on the calling thread.
    pub fn detect_all(&self) -> QcResult<BTreeMap<String, DetectionReport>> {
        let context = self.context;
        debug!("dataset: scanning {} sensor(s)", self.sensors.len());

        thread::scope(|scope| {
            let workers: Vec<_> = self
                .sensors
                .iter()
                .map(|(name, handle)| {
                    let worker = scope.spawn(move || -> QcResult<DetectionReport> {
                        let sensor = lock(handle)?;
                        Ok(sensor.detect(&context))
                    });
                    (name, worker)
                })
                .collect();

            let mut reports = BTreeMap::new();
            for (name, worker) in workers {
                let report = match worker.join() {
                    Ok(report) => report?,
                    Err(payload) => panic::resume_unwind(payload),
                };
                reports.insert(name.clone(), report);
            }
            Ok(reports)
        })
    }
}
