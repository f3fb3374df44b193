//! One immutable snapshot of a sensor's values
//!
//! A state is created by an import or a correction, committed to the
//! sensor's history, and never changed again, with one exception: the edit
//! reason. Reasons are collected by a separate interaction after the state
//! is already visible, so the slot starts empty and may be filled exactly
//! once. A state may also stay without a reason indefinitely if the user
//! cancels the prompt.

use crate::errors::{QcError, QcResult};
use crate::series::ValueSeries;
use crate::time::Timestamp;

/// Snapshot of a sensor's full value series plus edit metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SensorState {
    values: ValueSeries,
    reason: Option<String>,
    edited_at: Timestamp,
}

impl SensorState {
    /// New state awaiting its reason
    pub fn new(values: ValueSeries, edited_at: Timestamp) -> Self {
        Self {
            values,
            reason: None,
            edited_at,
        }
    }

    /// New state with its reason already known
    pub fn with_reason(values: ValueSeries, edited_at: Timestamp, reason: impl Into<String>) -> QcResult<Self> {
        let mut state = Self::new(values, edited_at);
        state.set_reason(reason)?;
        Ok(state)
    }

    /// The snapshot's values
    pub fn values(&self) -> &ValueSeries {
        &self.values
    }

    /// Deep copy of the values, the starting point of every correction
    pub fn clone_values(&self) -> ValueSeries {
        self.values.clone()
    }

    /// Take ownership of the values
    pub fn into_values(self) -> ValueSeries {
        self.values
    }

    /// Why this edit was made, once recorded
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Whether the reason has been recorded
    pub fn has_reason(&self) -> bool {
        self.reason.is_some()
    }

    /// When the state was created
    pub fn edited_at(&self) -> Timestamp {
        self.edited_at
    }

    /// Record the edit reason
    ///
    /// The reason is trimmed. Blank reasons and second attempts are rejected
    /// and leave the state unchanged.
    pub fn set_reason(&mut self, reason: impl Into<String>) -> QcResult<()> {
        if self.reason.is_some() {
            return Err(QcError::ReasonAlreadySet);
        }
        let reason = reason.into();
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(QcError::EmptyReason);
        }
        self.reason = Some(trimmed.to_owned());
        Ok(())
    }
}
