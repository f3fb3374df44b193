//! Linear undo/redo history of sensor snapshots
//!
//! ## Model
//!
//! Two stacks owned exclusively by one sensor:
//!
//! ```text
//! undo: [raw, e1, e2, e3]   ← top is the current state
//! redo: [e5, e4]            ← top is the most recently undone edit
//! ```
//!
//! - `undo` is never empty and its bottom is the imported raw state.
//! - `add_state` pushes onto `undo` and clears `redo`. Undoing and then
//!   editing permanently discards the undone branch; there is no tree.
//! - `undo` is refused at the raw state, `redo` when nothing was undone.
//!   Refusals are typed errors and never modify either stack.

use log::{debug, warn};

use crate::errors::{HistoryOp, QcError, QcResult};
use crate::state::SensorState;

/// Undo/redo stacks of sensor states
#[derive(Debug, Clone)]
pub struct HistoryStack {
    undo: Vec<SensorState>,
    redo: Vec<SensorState>,
}

impl HistoryStack {
    /// History holding only the raw imported state
    pub fn new(raw: SensorState) -> Self {
        Self {
            undo: vec![raw],
            redo: Vec::new(),
        }
    }

    /// Top of the undo stack
    pub fn current(&self) -> &SensorState {
        // `undo` always holds at least the raw state
        &self.undo[self.undo.len() - 1]
    }

    /// Mutable access to the current state, used only to attach its reason
    pub(crate) fn current_mut(&mut self) -> &mut SensorState {
        let top = self.undo.len() - 1;
        &mut self.undo[top]
    }

    /// The originally imported state
    pub fn raw_state(&self) -> &SensorState {
        &self.undo[0]
    }

    /// Commit a new state, discarding anything redoable
    pub fn add_state(&mut self, state: SensorState) {
        if !self.redo.is_empty() {
            debug!("discarding {} redoable state(s)", self.redo.len());
            self.redo.clear();
        }
        self.undo.push(state);
        debug!("history depth now {}", self.depth());
    }

    /// Step back one edit
    pub fn undo(&mut self) -> QcResult<&SensorState> {
        if self.undo.len() <= 1 {
            warn!("undo requested at raw state");
            return Err(QcError::HistoryUnderflow {
                operation: HistoryOp::Undo,
            });
        }
        if let Some(state) = self.undo.pop() {
            self.redo.push(state);
        }
        Ok(self.current())
    }

    /// Reapply the most recently undone edit
    pub fn redo(&mut self) -> QcResult<&SensorState> {
        match self.redo.pop() {
            Some(state) => {
                self.undo.push(state);
                Ok(self.current())
            }
            None => {
                warn!("redo requested with nothing undone");
                Err(QcError::HistoryUnderflow {
                    operation: HistoryOp::Redo,
                })
            }
        }
    }

    /// Undo is legal
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    /// Redo is legal
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of edits applied on top of the raw state
    pub fn depth(&self) -> usize {
        self.undo.len() - 1
    }

    /// Number of edits available to redo
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Whether the current state is the raw import
    pub fn is_initial(&self) -> bool {
        self.undo.len() == 1
    }

    /// Applied states from raw to current
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SensorState> + ExactSizeIterator {
        self.undo.iter()
    }

    /// Undone states, most recently undone first
    pub fn redo_iter(&self) -> impl Iterator<Item = &SensorState> {
        self.redo.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::ValueSeries;
    use chrono::{NaiveDate, TimeDelta};

    fn state(tag: f32) -> SensorState {
        let t = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let values: ValueSeries = [(t, tag)].into_iter().collect();
        SensorState::new(values, t + TimeDelta::try_minutes(tag as i64).unwrap())
    }

    fn tag(state: &SensorState) -> f32 {
        state.values().first().map(|m| m.value).unwrap()
    }

    #[test]
    fn initial_history_refuses_navigation() {
        let mut history = HistoryStack::new(state(0.0));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(
            history.undo().unwrap_err(),
            QcError::HistoryUnderflow { operation: HistoryOp::Undo }
        );
        assert_eq!(
            history.redo().unwrap_err(),
            QcError::HistoryUnderflow { operation: HistoryOp::Redo }
        );
        assert_eq!(tag(history.current()), 0.0);
    }

    #[test]
    fn undo_then_redo_restores() {
        let mut history = HistoryStack::new(state(0.0));
        history.add_state(state(1.0));
        history.add_state(state(2.0));

        assert_eq!(tag(history.undo().unwrap()), 1.0);
        assert_eq!(tag(history.undo().unwrap()), 0.0);
        assert!(history.undo().is_err());

        assert_eq!(tag(history.redo().unwrap()), 1.0);
        assert_eq!(tag(history.redo().unwrap()), 2.0);
        assert!(!history.can_redo());
    }

    #[test]
    fn add_state_clears_redo() {
        let mut history = HistoryStack::new(state(0.0));
        history.add_state(state(1.0));
        history.undo().unwrap();
        assert_eq!(history.redo_depth(), 1);

        history.add_state(state(3.0));
        assert_eq!(history.redo_depth(), 0);
        assert!(history.redo().is_err());

        let tags: Vec<f32> = history.iter().map(tag).collect();
        assert_eq!(tags, vec![0.0, 3.0]);
    }

    #[test]
    fn raw_state_survives_undos() {
        let raw = state(0.0);
        let mut history = HistoryStack::new(raw.clone());
        history.add_state(state(1.0));
        history.add_state(state(2.0));
        while history.can_undo() {
            history.undo().unwrap();
        }
        assert_eq!(history.raw_state(), &raw);
        assert!(history.is_initial());
    }
}
