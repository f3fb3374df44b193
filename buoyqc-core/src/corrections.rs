//! Value-correction operations
//!
//! Every operation reads a state, clones its values, edits the clone and
//! returns a brand-new [`SensorState`]. The input state is never touched and
//! nothing here pushes onto a history; committing is the caller's job (see
//! [`Sensor::commit`](crate::sensor::Sensor::commit) and
//! [`Sensor::apply`](crate::sensor::Sensor::apply)).
//!
//! | Operation                   | Effect on each selected timestamp            |
//! |-----------------------------|----------------------------------------------|
//! | [`set_to_zero`]             | write `0.0` (fills gaps)                     |
//! | [`set_to_value`]            | write one finite value (fills gaps)          |
//! | [`remove_values`]           | delete if present                            |
//! | [`extrapolate`]             | linear fill between the bounding anchors     |
//! | [`fill_missing_with_default`] | write a default into every missing slot    |
//!
//! An empty selection is refused with [`QcError::EmptySelection`].

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::detection::missing_value_scan;
use crate::errors::{AnchorSide, QcError, QcResult};
use crate::series::{Measurement, ValueSeries};
use crate::state::SensorState;
use crate::time::{Clock, DatasetContext, ExpectedTimestamps, Timestamp};

/// Timestamps chosen for a correction, ascending and unique
pub type Selection = BTreeSet<Timestamp>;

/// Expected sample slots between `from` and `to` (inclusive) inside the dataset
pub fn selection_between(context: &DatasetContext, from: Timestamp, to: Timestamp) -> Selection {
    let (from, to) = if from <= to { (from, to) } else { (to, from) };
    ExpectedTimestamps::new(context.start, context.end, context.interval_minutes)
        .skip_while(|t| *t < from)
        .take_while(|t| *t <= to)
        .collect()
}

/// A correction described as data, for callers that queue or log edits
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum Correction {
    /// [`set_to_zero`]
    Zero,
    /// [`set_to_value`]
    SetValue {
        /// Value written to every selected timestamp
        value: f32,
    },
    /// [`remove_values`]
    Remove,
    /// [`extrapolate`]
    Extrapolate,
}

impl Correction {
    /// Short label for logs and prompts
    pub const fn name(&self) -> &'static str {
        match self {
            Correction::Zero => "zero",
            Correction::SetValue { .. } => "set value",
            Correction::Remove => "remove",
            Correction::Extrapolate => "extrapolate",
        }
    }

    /// Run the correction against `state`
    pub fn apply(&self, state: &SensorState, selection: &Selection, clock: &dyn Clock) -> QcResult<SensorState> {
        match *self {
            Correction::Zero => set_to_zero(state, selection, clock),
            Correction::SetValue { value } => set_to_value(state, selection, value, clock),
            Correction::Remove => remove_values(state, selection, clock),
            Correction::Extrapolate => extrapolate(state, selection, clock),
        }
    }
}

fn require_selection(selection: &Selection) -> QcResult<()> {
    if selection.is_empty() {
        debug!("correction refused: empty selection");
        return Err(QcError::EmptySelection);
    }
    Ok(())
}

/// Write `0.0` at every selected timestamp
pub fn set_to_zero(state: &SensorState, selection: &Selection, clock: &dyn Clock) -> QcResult<SensorState> {
    set_to_value(state, selection, 0.0, clock)
}

/// Write `value` at every selected timestamp
pub fn set_to_value(
    state: &SensorState,
    selection: &Selection,
    value: f32,
    clock: &dyn Clock,
) -> QcResult<SensorState> {
    require_selection(selection)?;
    if !value.is_finite() {
        return Err(QcError::InvalidValue { value });
    }

    let mut values = state.clone_values();
    for &t in selection {
        values.set(t, value);
    }
    Ok(SensorState::new(values, clock.now()))
}

/// Delete the value at every selected timestamp; absent ones are skipped
pub fn remove_values(state: &SensorState, selection: &Selection, clock: &dyn Clock) -> QcResult<SensorState> {
    require_selection(selection)?;

    let mut values = state.clone_values();
    let removed = selection.iter().filter(|t| values.remove(**t).is_some()).count();
    debug!("removed {removed} of {} selected value(s)", selection.len());
    Ok(SensorState::new(values, clock.now()))
}

/// Linearly fill the selection from the present values bounding it
///
/// The anchors are the nearest present, unselected samples at or before the
/// first selected timestamp and at or after the last one. Each selected
/// timestamp gets
///
/// ```text
/// v(t) = a.v + (b.v - a.v) * (t - a.t) / (b.t - a.t)
/// ```
///
/// Fails with [`QcError::ExtrapolationBoundaryMissing`] when either anchor
/// does not exist.
pub fn extrapolate(state: &SensorState, selection: &Selection, clock: &dyn Clock) -> QcResult<SensorState> {
    let (first, last) = match (selection.first(), selection.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            warn!("extrapolation refused: empty selection");
            return Err(QcError::EmptySelection);
        }
    };

    let values = state.values();
    let start = anchor_before(values, selection, first).ok_or_else(|| {
        warn!("extrapolation refused: no anchor at or before {first}");
        QcError::ExtrapolationBoundaryMissing { side: AnchorSide::Start }
    })?;
    let end = anchor_after(values, selection, last).ok_or_else(|| {
        warn!("extrapolation refused: no anchor at or after {last}");
        QcError::ExtrapolationBoundaryMissing { side: AnchorSide::End }
    })?;

    let span_ms = (end.timestamp - start.timestamp).num_milliseconds() as f64;
    let delta = end.value as f64 - start.value as f64;

    let mut edited = values.clone();
    for &t in selection {
        let elapsed_ms = (t - start.timestamp).num_milliseconds() as f64;
        let value = start.value as f64 + delta * elapsed_ms / span_ms;
        edited.set(t, value as f32);
    }

    debug!(
        "extrapolated {} value(s) between {} and {}",
        selection.len(),
        start.timestamp,
        end.timestamp
    );
    Ok(SensorState::new(edited, clock.now()))
}

fn anchor_before(values: &ValueSeries, selection: &Selection, from: Timestamp) -> Option<Measurement> {
    let mut candidate = values.at_or_before(from)?;
    while selection.contains(&candidate.timestamp) {
        candidate = values.before(candidate.timestamp)?;
    }
    Some(candidate)
}

fn anchor_after(values: &ValueSeries, selection: &Selection, from: Timestamp) -> Option<Measurement> {
    values
        .range(from, Timestamp::MAX)
        .find(|m| !selection.contains(&m.timestamp))
}

/// Write `default_value` into every expected slot that has no value
///
/// Used when a sensor template defines a default for gaps. Fails with
/// [`QcError::EmptySelection`] when nothing is missing.
pub fn fill_missing_with_default(
    state: &SensorState,
    context: &DatasetContext,
    default_value: f32,
    clock: &dyn Clock,
) -> QcResult<SensorState> {
    let missing: Selection = missing_value_scan(state.values(), context).into_iter().collect();
    set_to_value(state, &missing, default_value, clock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use chrono::{NaiveDate, TimeDelta};

    fn at(minute: i64) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
            + TimeDelta::try_minutes(minute).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::new(at(24 * 60))
    }

    fn state(points: &[(i64, f32)]) -> SensorState {
        let values = points.iter().map(|&(m, v)| (at(m), v)).collect();
        SensorState::new(values, at(0))
    }

    fn select(minutes: &[i64]) -> Selection {
        minutes.iter().map(|&m| at(m)).collect()
    }

    #[test]
    fn zero_fills_gaps_and_overwrites() {
        let original = state(&[(0, 5.0), (30, 7.0)]);
        let edited = set_to_zero(&original, &select(&[15, 30]), &clock()).unwrap();

        assert_eq!(edited.values().get(at(15)), Some(0.0));
        assert_eq!(edited.values().get(at(30)), Some(0.0));
        assert_eq!(edited.values().get(at(0)), Some(5.0));
        assert_eq!(original.values().get(at(30)), Some(7.0));
        assert_eq!(edited.edited_at(), at(24 * 60));
        assert!(edited.reason().is_none());
    }

    #[test]
    fn set_value_rejects_non_finite() {
        let original = state(&[(0, 5.0)]);
        let err = set_to_value(&original, &select(&[0]), f32::NAN, &clock()).unwrap_err();
        assert!(matches!(err, QcError::InvalidValue { .. }));
    }

    #[test]
    fn empty_selection_refused() {
        let original = state(&[(0, 5.0), (60, 6.0)]);
        let empty = Selection::new();
        assert_eq!(set_to_zero(&original, &empty, &clock()).unwrap_err(), QcError::EmptySelection);
        assert_eq!(remove_values(&original, &empty, &clock()).unwrap_err(), QcError::EmptySelection);
        assert_eq!(extrapolate(&original, &empty, &clock()).unwrap_err(), QcError::EmptySelection);
    }

    #[test]
    fn remove_absent_is_noop() {
        let original = state(&[(0, 5.0), (30, 7.0)]);
        let edited = remove_values(&original, &select(&[15]), &clock()).unwrap();
        assert_eq!(edited.values(), original.values());

        let edited = remove_values(&original, &select(&[15, 30]), &clock()).unwrap();
        assert_eq!(edited.values().len(), 1);
    }

    #[test]
    fn extrapolation_is_linear() {
        let original = state(&[(0, 0.0), (60, 60.0)]);
        let edited = extrapolate(&original, &select(&[15, 30, 45]), &clock()).unwrap();

        assert_eq!(edited.values().get(at(15)), Some(15.0));
        assert_eq!(edited.values().get(at(30)), Some(30.0));
        assert_eq!(edited.values().get(at(45)), Some(45.0));
    }

    #[test]
    fn extrapolation_replaces_selected_outliers() {
        let original = state(&[(0, 10.0), (15, 900.0), (30, 20.0)]);
        let edited = extrapolate(&original, &select(&[15]), &clock()).unwrap();
        assert_eq!(edited.values().get(at(15)), Some(15.0));
    }

    #[test]
    fn extrapolation_needs_both_anchors() {
        let original = state(&[(0, 1.0), (15, 2.0)]);
        assert_eq!(
            extrapolate(&original, &select(&[30, 45]), &clock()).unwrap_err(),
            QcError::ExtrapolationBoundaryMissing { side: AnchorSide::End }
        );
        let original = state(&[(45, 1.0)]);
        assert_eq!(
            extrapolate(&original, &select(&[0, 15]), &clock()).unwrap_err(),
            QcError::ExtrapolationBoundaryMissing { side: AnchorSide::Start }
        );
    }

    #[test]
    fn default_fill_targets_missing_slots() {
        let ctx = DatasetContext::new(at(0), at(60), 15);
        let original = state(&[(0, 1.0), (30, 2.0)]);
        let edited = fill_missing_with_default(&original, &ctx, -99.0, &clock()).unwrap();

        for m in [15, 45, 60] {
            assert_eq!(edited.values().get(at(m)), Some(-99.0));
        }
        assert_eq!(edited.values().get(at(30)), Some(2.0));

        let err = fill_missing_with_default(&edited, &ctx, -99.0, &clock()).unwrap_err();
        assert_eq!(err, QcError::EmptySelection);
    }

    #[test]
    fn selection_between_uses_expected_slots() {
        let ctx = DatasetContext::new(at(0), at(60), 15);
        assert_eq!(selection_between(&ctx, at(20), at(50)), select(&[30, 45]));
        assert_eq!(selection_between(&ctx, at(50), at(20)), select(&[30, 45]));
    }

    #[test]
    fn correction_enum_dispatches() {
        let original = state(&[(0, 0.0), (60, 60.0)]);
        let edited = Correction::SetValue { value: 3.5 }
            .apply(&original, &select(&[30]), &clock())
            .unwrap();
        assert_eq!(edited.values().get(at(30)), Some(3.5));
        assert_eq!(Correction::Extrapolate.name(), "extrapolate");
    }
}
