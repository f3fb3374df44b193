//! Error Types for Detection, Correction and History Operations
//!
//! ## Design Philosophy
//!
//! Nothing in the engine is fatal to the process. Every failure is a typed,
//! recoverable result and a failed operation leaves the sensor's history
//! exactly as it was before the call.
//!
//! ## Error Categories
//!
//! ### Configuration
//! - `InvalidRange`: degenerate sampling interval or end-before-start bounds.
//!   Scans themselves never raise this; they log and return nothing. It is
//!   produced by [`DatasetContext::validate`](crate::time::DatasetContext::validate)
//!   for callers that want to reject a bad configuration up front.
//!
//! ### Corrections
//! - `EmptySelection`: a correction was invoked with no timestamps selected
//! - `ExtrapolationBoundaryMissing`: no present anchor on one side of the span
//! - `InvalidValue`: a non-finite replacement value
//!
//! ### History
//! - `HistoryUnderflow`: undo at the raw state or redo with nothing undone
//! - `ReasonAlreadySet` / `EmptyReason`: misuse of the deferred reason slot
//!
//! ### Dataset
//! - `SensorNotFound`, `LockPoisoned`
//!
//! ## Handling Strategy
//!
//! ```rust
//! use buoyqc_core::QcError;
//!
//! fn describe(err: &QcError) -> &'static str {
//!     match err {
//!         QcError::ExtrapolationBoundaryMissing { .. } => "reselect and retry",
//!         QcError::HistoryUnderflow { .. } => "nothing to do",
//!         QcError::EmptySelection => "select some points first",
//!         _ => "see message",
//!     }
//! }
//! # let _ = describe(&QcError::EmptySelection);
//! ```

use thiserror_no_std::Error;

use crate::time::Timestamp;

/// Result type for engine operations
pub type QcResult<T> = Result<T, QcError>;

/// Which side of an extrapolation span lacked a present value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSide {
    /// No present value at or before the span start
    Start,
    /// No present value at or after the span end
    End,
}

impl core::fmt::Display for AnchorSide {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AnchorSide::Start => f.write_str("start"),
            AnchorSide::End => f.write_str("end"),
        }
    }
}

/// History navigation that was attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOp {
    /// Step back one edit
    Undo,
    /// Reapply the most recently undone edit
    Redo,
}

impl core::fmt::Display for HistoryOp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HistoryOp::Undo => f.write_str("undo"),
            HistoryOp::Redo => f.write_str("redo"),
        }
    }
}

/// Engine errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QcError {
    /// Sampling interval is not positive or the bounds are reversed
    #[error("Invalid range: interval {interval_minutes} min, {start} .. {end}")]
    InvalidRange {
        /// Sampling interval in minutes
        interval_minutes: i64,
        /// Dataset start
        start: Timestamp,
        /// Dataset end
        end: Timestamp,
    },

    /// Correction invoked with no timestamps
    #[error("No timestamps selected")]
    EmptySelection,

    /// Extrapolation could not find a present anchor value
    #[error("No present value bounding the selection at its {side}")]
    ExtrapolationBoundaryMissing {
        /// Side of the span that has no anchor
        side: AnchorSide,
    },

    /// Undo at the raw state, or redo with nothing undone
    #[error("Cannot {operation}: history exhausted")]
    HistoryUnderflow {
        /// The navigation that was refused
        operation: HistoryOp,
    },

    /// Replacement value is NaN or infinite
    #[error("Invalid value {value}: not a finite number")]
    InvalidValue {
        /// The rejected value
        value: f32,
    },

    /// The edit reason of a state can only be set once
    #[error("Edit reason already recorded")]
    ReasonAlreadySet,

    /// The edit reason was blank
    #[error("Edit reason must not be empty")]
    EmptyReason,

    /// No sensor with that name in the dataset
    #[error("Sensor not found: {name}")]
    SensorNotFound {
        /// Requested sensor name
        name: String,
    },

    /// A sensor lock was poisoned by a panicking holder
    #[error("Sensor lock poisoned")]
    LockPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = QcError::ExtrapolationBoundaryMissing { side: AnchorSide::End };
        assert_eq!(err.to_string(), "No present value bounding the selection at its end");

        let err = QcError::HistoryUnderflow { operation: HistoryOp::Redo };
        assert_eq!(err.to_string(), "Cannot redo: history exhausted");
    }
}
