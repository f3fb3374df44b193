//! Integration tests for edit history semantics
//!
//! Covers the linear-history rule (new edits discard redo), navigation
//! refusals at either end, and preservation of the raw import.

mod common;

use buoyqc_core::{
    corrections::{Correction, Selection},
    errors::{HistoryOp, QcError},
    HistoryStack, SensorState,
};

use common::{at, series, water_temp};

fn selection(minutes: &[i64]) -> Selection {
    minutes.iter().map(|&m| at(m)).collect()
}

#[test]
fn add_after_undo_discards_branch() {
    let a = SensorState::new(series(&[(0, 1.0)]), at(0));
    let b = SensorState::new(series(&[(0, 2.0)]), at(1));
    let c = SensorState::new(series(&[(0, 3.0)]), at(2));

    let mut history = HistoryStack::new(a.clone());
    history.add_state(b.clone());
    assert_eq!(history.iter().cloned().collect::<Vec<_>>(), vec![a.clone(), b.clone()]);

    assert_eq!(history.undo().unwrap(), &a);
    assert_eq!(history.redo_iter().cloned().collect::<Vec<_>>(), vec![b]);

    history.add_state(c.clone());
    assert_eq!(history.iter().cloned().collect::<Vec<_>>(), vec![a, c]);
    assert_eq!(history.redo_depth(), 0);
    assert_eq!(
        history.redo().unwrap_err(),
        QcError::HistoryUnderflow { operation: HistoryOp::Redo }
    );
}

#[test]
fn redo_restores_exact_state_after_undos() {
    let mut sensor = water_temp(series(&[(0, 10.0), (15, 40.0), (30, 11.0), (60, 12.0)]));

    sensor.correct(Correction::Remove, &selection(&[15])).unwrap();
    sensor.log_reason("spike").unwrap();
    sensor.correct(Correction::Extrapolate, &selection(&[15, 45])).unwrap();
    sensor.log_reason("gap fill").unwrap();
    sensor.correct(Correction::SetValue { value: 11.5 }, &selection(&[30])).unwrap();

    let before = sensor.current_state().clone();
    for _ in 0..3 {
        sensor.undo().unwrap();
    }
    assert!(sensor.undo().is_err());
    for _ in 0..3 {
        sensor.redo().unwrap();
    }
    assert_eq!(sensor.current_state(), &before);
    assert!(!sensor.can_redo());
}

#[test]
fn raw_state_is_never_lost() {
    let raw = series(&[(0, 10.0), (15, 11.0)]);
    let mut sensor = water_temp(raw.clone());

    for i in 0..5 {
        sensor
            .correct(Correction::SetValue { value: i as f32 }, &selection(&[0]))
            .unwrap();
        sensor.log_reason(format!("pass {i}")).unwrap();
    }
    while sensor.can_undo() {
        sensor.undo().unwrap();
        assert_eq!(sensor.raw_state().values(), &raw);
    }
    assert_eq!(sensor.current_state().values(), &raw);
    assert_eq!(sensor.history().redo_depth(), 5);
}

#[test]
fn reason_can_stay_empty_indefinitely() {
    let mut sensor = water_temp(series(&[(0, 10.0), (15, 11.0)]));
    sensor.correct(Correction::Zero, &selection(&[0])).unwrap();
    // Prompt cancelled; the next edit still commits
    sensor.correct(Correction::Zero, &selection(&[15])).unwrap();

    let trail = sensor.audit_trail();
    assert_eq!(trail.unreasoned().count(), 2);

    sensor.undo().unwrap();
    sensor.log_reason("late reason for first edit").unwrap();
    assert_eq!(sensor.audit_trail().unreasoned().count(), 0);
}
