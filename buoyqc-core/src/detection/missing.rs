//! Missing-value scan

use log::{debug, warn};

use crate::series::ValueSeries;
use crate::time::{DatasetContext, Timestamp};

/// Expected sample times with no value in `series`
///
/// Walks `start, start + interval, ...` up to `end` inclusive. The result is
/// ascending and duplicate-free. A non-positive interval, an interval too
/// large to represent as a duration, or reversed bounds produce an empty
/// result.
pub fn missing_value_scan(series: &ValueSeries, context: &DatasetContext) -> Vec<Timestamp> {
    if !context.is_valid() {
        warn!(
            "missing-value scan skipped: interval {} min, {} .. {}",
            context.interval_minutes, context.start, context.end
        );
        return Vec::new();
    }

    let missing: Vec<Timestamp> = context
        .expected_timestamps()
        .filter(|t| !series.contains(*t))
        .collect();

    debug!("missing-value scan found {} gap(s)", missing.len());
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn at(minute: i64) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
            + TimeDelta::try_minutes(minute).unwrap()
    }

    #[test]
    fn finds_every_gap_including_end() {
        let series: ValueSeries = [(at(0), 1.0), (at(30), 2.0)].into_iter().collect();
        let ctx = DatasetContext::new(at(0), at(60), 15);
        assert_eq!(missing_value_scan(&series, &ctx), vec![at(15), at(45), at(60)]);
    }

    #[test]
    fn off_grid_values_do_not_fill_slots() {
        let series: ValueSeries = [(at(7), 1.0)].into_iter().collect();
        let ctx = DatasetContext::new(at(0), at(15), 15);
        assert_eq!(missing_value_scan(&series, &ctx), vec![at(0), at(15)]);
    }

    #[test]
    fn degenerate_context_is_empty() {
        let series = ValueSeries::new();
        assert!(missing_value_scan(&series, &DatasetContext::new(at(0), at(60), 0)).is_empty());
        assert!(missing_value_scan(&series, &DatasetContext::new(at(60), at(0), 15)).is_empty());
        assert!(missing_value_scan(&series, &DatasetContext::new(at(0), at(0), i64::MAX)).is_empty());
    }

    #[test]
    fn complete_series_has_no_gaps() {
        let ctx = DatasetContext::new(at(0), at(60), 15);
        let series: ValueSeries = ctx.expected_timestamps().map(|t| (t, 4.2)).collect();
        assert!(missing_value_scan(&series, &ctx).is_empty());
    }
}
