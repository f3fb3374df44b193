//! Outlier scan: range and rate-of-change violations

use log::{debug, warn};

use super::rules::{rate_per_minute, OutlierThresholds};
use crate::series::{Measurement, ValueSeries};
use crate::time::{DatasetContext, Timestamp};

/// Which rule flagged a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutlierKind {
    /// Outside the static limits (or not a finite number)
    Range,
    /// Too steep a change from the nearest present predecessor
    RateOfChange,
    /// Both rules fired
    Both,
}

/// A flagged sample with the reason it was flagged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outlier {
    /// The flagged measurement
    pub measurement: Measurement,
    /// Which rules fired
    pub kind: OutlierKind,
    /// Rate observed against the predecessor, when one existed
    pub rate: Option<f32>,
}

impl Outlier {
    /// Sample time of the flagged value
    pub fn timestamp(&self) -> Timestamp {
        self.measurement.timestamp
    }
}

/// Present values in `[start, end]` that break a range or rate rule
///
/// The first present value has no predecessor and can only be flagged by the
/// range check. Missing samples are skipped when finding the predecessor.
/// A timestamp failing both checks appears once.
pub fn outlier_scan(
    series: &ValueSeries,
    context: &DatasetContext,
    thresholds: &OutlierThresholds,
) -> Vec<Timestamp> {
    classify_outliers(series, context, thresholds)
        .into_iter()
        .map(|outlier| outlier.timestamp())
        .collect()
}

/// Like [`outlier_scan`] but keeps the kind of each violation
pub fn classify_outliers(
    series: &ValueSeries,
    context: &DatasetContext,
    thresholds: &OutlierThresholds,
) -> Vec<Outlier> {
    if !context.is_valid() {
        warn!(
            "outlier scan skipped: interval {} min, {} .. {}",
            context.interval_minutes, context.start, context.end
        );
        return Vec::new();
    }

    let mut outliers = Vec::new();
    let mut previous: Option<Measurement> = None;

    for current in series.range(context.start, context.end) {
        let range_hit = thresholds.check_range(current.value).is_some();

        let rate = previous.map(|prev| rate_per_minute(current, prev));
        let rate_hit = previous
            .and_then(|prev| thresholds.check_rate(current, prev))
            .is_some();

        let kind = match (range_hit, rate_hit) {
            (true, true) => Some(OutlierKind::Both),
            (true, false) => Some(OutlierKind::Range),
            (false, true) => Some(OutlierKind::RateOfChange),
            (false, false) => None,
        };
        if let Some(kind) = kind {
            outliers.push(Outlier {
                measurement: current,
                kind,
                rate,
            });
        }

        previous = Some(current);
    }

    debug!("outlier scan flagged {} value(s)", outliers.len());
    outliers
}
