//! A physical sensor: identity, edit history and calibrations
//!
//! The sensor owns its [`HistoryStack`] exclusively. Its current state is
//! always the top of that stack. Edits follow a compute-then-commit shape:
//!
//! 1. a correction reads [`Sensor::current_state`] and returns a new state
//! 2. the new state is committed with [`Sensor::commit`]
//! 3. the caller rescans for missing values and outliers
//! 4. the caller later records why with [`Sensor::log_reason`]
//!
//! [`Sensor::apply`] bundles steps 1 and 2 so that a failed correction
//! commits nothing.
//!
//! ```rust
//! use buoyqc_core::corrections::{self, Selection};
//! use buoyqc_core::{Sensor, SensorIdentity, ValueSeries};
//! use chrono::NaiveDate;
//!
//! let t0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let raw: ValueSeries = [(t0, 42.0)].into_iter().collect();
//! let mut sensor = Sensor::new(SensorIdentity::new("Water Temp", "°C", 0.0, 30.0, 0.5), raw);
//!
//! let selection: Selection = [t0].into_iter().collect();
//! sensor.apply(|state, clock| corrections::set_to_zero(state, &selection, clock))?;
//! sensor.log_reason("logger fault")?;
//!
//! assert_eq!(sensor.current_state().values().get(t0), Some(0.0));
//! sensor.undo()?;
//! assert_eq!(sensor.current_state().values().get(t0), Some(42.0));
//! # Ok::<(), buoyqc_core::QcError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::audit::AuditTrail;
use crate::calibration::{Calibration, CalibrationSet};
use crate::corrections::{Correction, Selection};
use crate::detection::{self, DetectionReport, OutlierThresholds};
use crate::errors::QcResult;
use crate::history::HistoryStack;
use crate::series::ValueSeries;
use crate::state::SensorState;
use crate::time::{Clock, DatasetContext, SystemClock};

/// Descriptive and threshold configuration of a sensor
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SensorIdentity {
    /// Display name, unique within a dataset
    pub name: String,
    /// Measurement unit
    pub unit: String,
    /// Smallest plausible value
    pub lower_limit: f32,
    /// Largest plausible value
    pub upper_limit: f32,
    /// Largest plausible change per minute
    pub max_rate_of_change: f32,
    /// Instrument manufacturer
    #[cfg_attr(feature = "serde", serde(default))]
    pub manufacturer: String,
    /// Instrument serial number
    #[cfg_attr(feature = "serde", serde(default))]
    pub serial_number: String,
}

impl SensorIdentity {
    /// Identity with limits; manufacturer and serial number left blank
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        lower_limit: f32,
        upper_limit: f32,
        max_rate_of_change: f32,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            lower_limit,
            upper_limit,
            max_rate_of_change,
            manufacturer: String::new(),
            serial_number: String::new(),
        }
    }

    /// Set the instrument details
    pub fn with_instrument(mut self, manufacturer: impl Into<String>, serial_number: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self.serial_number = serial_number.into();
        self
    }

    /// Thresholds for the outlier scan
    pub fn thresholds(&self) -> OutlierThresholds {
        OutlierThresholds::new(self.lower_limit, self.upper_limit, self.max_rate_of_change)
    }
}

/// Sensor with its versioned values
#[derive(Clone)]
pub struct Sensor {
    identity: SensorIdentity,
    history: HistoryStack,
    calibrations: CalibrationSet,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("identity", &self.identity)
            .field("depth", &self.history.depth())
            .field("redo_depth", &self.history.redo_depth())
            .field("calibrations", &self.calibrations.len())
            .finish()
    }
}

impl Sensor {
    /// Sensor whose raw state is `raw`, stamped with local system time
    pub fn new(identity: SensorIdentity, raw: ValueSeries) -> Self {
        Self::with_clock(identity, raw, Arc::new(SystemClock))
    }

    /// Sensor using `clock` for every edit timestamp
    pub fn with_clock(identity: SensorIdentity, raw: ValueSeries, clock: Arc<dyn Clock>) -> Self {
        let raw_state = SensorState::new(raw, clock.now());
        Self::from_raw_state(identity, raw_state, clock)
    }

    /// Sensor from an already-built raw state
    pub fn from_raw_state(identity: SensorIdentity, raw_state: SensorState, clock: Arc<dyn Clock>) -> Self {
        debug!(
            "sensor '{}' created with {} raw value(s)",
            identity.name,
            raw_state.values().len()
        );
        Self {
            identity,
            history: HistoryStack::new(raw_state),
            calibrations: CalibrationSet::new(),
            clock,
        }
    }

    /// Identity and thresholds
    pub fn identity(&self) -> &SensorIdentity {
        &self.identity
    }

    /// Mutable identity, for limit changes between scans
    pub fn identity_mut(&mut self) -> &mut SensorIdentity {
        &mut self.identity
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Outlier thresholds derived from the identity
    pub fn thresholds(&self) -> OutlierThresholds {
        self.identity.thresholds()
    }

    /// Clock used for edit timestamps
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Top of the history
    pub fn current_state(&self) -> &SensorState {
        self.history.current()
    }

    /// The imported state
    pub fn raw_state(&self) -> &SensorState {
        self.history.raw_state()
    }

    /// Read-only view of the history
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Commit a state produced by a correction
    ///
    /// Anything redoable is discarded.
    pub fn commit(&mut self, state: SensorState) {
        if self.pending_reason() {
            warn!(
                "sensor '{}': committing on top of an edit with no recorded reason",
                self.identity.name
            );
        }
        self.history.add_state(state);
        debug!("sensor '{}': committed edit {}", self.identity.name, self.history.depth());
    }

    /// Run a correction against the current state and commit the result
    ///
    /// On failure nothing is committed and the history is unchanged.
    pub fn apply<F>(&mut self, correction: F) -> QcResult<&SensorState>
    where
        F: FnOnce(&SensorState, &dyn Clock) -> QcResult<SensorState>,
    {
        let state = correction(self.history.current(), self.clock.as_ref())?;
        self.commit(state);
        Ok(self.history.current())
    }

    /// [`apply`](Self::apply) for a [`Correction`] value
    pub fn correct(&mut self, correction: Correction, selection: &Selection) -> QcResult<&SensorState> {
        debug!("sensor '{}': {} on {} point(s)", self.identity.name, correction.name(), selection.len());
        self.apply(|state, clock| correction.apply(state, selection, clock))
    }

    /// Commit a fresh copy of the raw values as a new, undoable edit
    pub fn revert_to_raw(&mut self) -> &SensorState {
        let values = self.history.raw_state().clone_values();
        let state = SensorState::new(values, self.clock.now());
        self.commit(state);
        self.history.current()
    }

    /// Step back one edit
    pub fn undo(&mut self) -> QcResult<&SensorState> {
        self.history.undo()
    }

    /// Reapply the most recently undone edit
    pub fn redo(&mut self) -> QcResult<&SensorState> {
        self.history.redo()
    }

    /// Undo button state
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Redo button state
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Record why the current state was created
    pub fn log_reason(&mut self, reason: impl Into<String>) -> QcResult<()> {
        self.history.current_mut().set_reason(reason)
    }

    /// Current state is an edit still waiting for its reason
    pub fn pending_reason(&self) -> bool {
        !self.history.is_initial() && !self.history.current().has_reason()
    }

    /// Attached calibrations
    pub fn calibrations(&self) -> &CalibrationSet {
        &self.calibrations
    }

    /// Attach a calibration
    pub fn add_calibration(&mut self, calibration: Calibration) {
        self.calibrations.insert(calibration);
    }

    /// Replace all calibrations
    pub fn set_calibrations(&mut self, calibrations: CalibrationSet) {
        self.calibrations = calibrations;
    }

    /// Current values with calibrations applied; history is untouched
    pub fn calibrated_values(&self) -> ValueSeries {
        self.calibrations.apply(self.current_state().values())
    }

    /// Missing values and outliers of the current state
    pub fn detect(&self, context: &DatasetContext) -> DetectionReport {
        detection::scan(self.current_state().values(), context, &self.thresholds())
    }

    /// Audit trail of the applied edits
    pub fn audit_trail(&self) -> AuditTrail {
        AuditTrail::from_history(&self.history)
    }
}
