//! Audit trail of a sensor's applied edits
//!
//! Built on demand from the history, bottom to top. Each record carries the
//! edit time, the recorded reason (if any) and a diff summary against the
//! state it replaced. Undone edits are not part of the trail.
//!
//! ```text
//! #0  2024-03-01 09:00  raw import  1440 pts
//! #1  2024-03-01 09:05  "biofouling"  +0 -0 ~12
//! #2  2024-03-01 09:07  <no reason>  +4 -0 ~0
//! ```

use core::fmt;

use crate::history::HistoryStack;
use crate::series::ValueSeries;
use crate::time::Timestamp;

/// Point-level differences between two consecutive states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Timestamps present only in the newer state
    pub added: usize,
    /// Timestamps present only in the older state
    pub removed: usize,
    /// Timestamps present in both with different values
    pub modified: usize,
}

impl ChangeSummary {
    /// Diff `newer` against `older`
    pub fn between(older: &ValueSeries, newer: &ValueSeries) -> Self {
        let mut summary = Self::default();
        let mut old_iter = older.iter().peekable();
        let mut new_iter = newer.iter().peekable();

        // Merge walk over two ascending key sequences
        loop {
            match (old_iter.peek().copied(), new_iter.peek().copied()) {
                (Some(o), Some(n)) if o.timestamp == n.timestamp => {
                    if o.value.to_bits() != n.value.to_bits() {
                        summary.modified += 1;
                    }
                    old_iter.next();
                    new_iter.next();
                }
                (Some(o), Some(n)) if o.timestamp < n.timestamp => {
                    summary.removed += 1;
                    old_iter.next();
                }
                (Some(_), Some(_)) | (None, Some(_)) => {
                    summary.added += 1;
                    new_iter.next();
                }
                (Some(_), None) => {
                    summary.removed += 1;
                    old_iter.next();
                }
                (None, None) => break,
            }
        }
        summary
    }

    /// No differences
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.modified == 0
    }

    /// Total number of touched timestamps
    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

/// One applied state in the trail
#[derive(Debug, Clone, PartialEq)]
pub struct EditRecord {
    /// Position in the history, 0 being the raw import
    pub index: usize,
    /// When the state was created
    pub edited_at: Timestamp,
    /// Recorded reason
    pub reason: Option<String>,
    /// Values present after the edit
    pub point_count: usize,
    /// Differences from the previous state; empty for the raw import
    pub changes: ChangeSummary,
}

impl EditRecord {
    /// The raw import rather than an edit
    pub fn is_raw(&self) -> bool {
        self.index == 0
    }
}

impl fmt::Display for EditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = self.edited_at.format("%Y-%m-%d %H:%M");
        if self.is_raw() {
            return write!(f, "#0  {when}  raw import  {} pts", self.point_count);
        }
        match &self.reason {
            Some(reason) => write!(f, "#{}  {when}  {reason:?}", self.index)?,
            None => write!(f, "#{}  {when}  <no reason>", self.index)?,
        }
        write!(
            f,
            "  +{} -{} ~{}",
            self.changes.added, self.changes.removed, self.changes.modified
        )
    }
}

/// Applied edits of one sensor, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditTrail {
    records: Vec<EditRecord>,
}

impl AuditTrail {
    /// Build the trail from a history
    pub fn from_history(history: &HistoryStack) -> Self {
        let mut records = Vec::with_capacity(history.depth() + 1);
        let mut previous: Option<&ValueSeries> = None;

        for (index, state) in history.iter().enumerate() {
            let changes = previous
                .map(|older| ChangeSummary::between(older, state.values()))
                .unwrap_or_default();
            records.push(EditRecord {
                index,
                edited_at: state.edited_at(),
                reason: state.reason().map(str::to_owned),
                point_count: state.values().len(),
                changes,
            });
            previous = Some(state.values());
        }

        Self { records }
    }

    /// Records oldest first
    pub fn iter(&self) -> impl Iterator<Item = &EditRecord> {
        self.records.iter()
    }

    /// Edits (not the raw import) still missing a reason
    pub fn unreasoned(&self) -> impl Iterator<Item = &EditRecord> {
        self.records
            .iter()
            .filter(|record| !record.is_raw() && record.reason.is_none())
    }

    /// Number of records including the raw import
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Never true for a trail built from a history
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
