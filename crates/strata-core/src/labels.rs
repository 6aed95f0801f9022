//! Human-readable row labels.

use chrono::{DateTime, Utc};

use crate::{InvalidParameterError, calendar::Period, model::BurndownParameters};

/// Labels for unresampled age bands: `"<band start> - <band end>"`.
///
/// # Examples
///
/// ```
/// # use chrono::DateTime;
/// # use strata_core::{labels::raw_band_labels, model::BurndownParameters};
/// let params = BurndownParameters { sampling: 30, granularity: 30, tick_size: 86_400 };
/// let start = DateTime::from_timestamp(0, 0).unwrap();
/// let labels = raw_band_labels(start, &params, 2).unwrap();
/// assert_eq!(labels, ["1970-01-01 - 1970-01-31", "1970-01-31 - 1970-03-02"]);
/// ```
pub fn raw_band_labels(
    start: DateTime<Utc>,
    params: &BurndownParameters,
    bands: usize,
) -> Result<Vec<String>, InvalidParameterError> {
    let granularity = u64::from(params.granularity);
    (0..bands as u64)
        .map(|band| -> Result<String, InvalidParameterError> {
            let from = params.advance(start, band * granularity)?;
            let to = params.advance(start, (band + 1) * granularity)?;
            Ok(format!(
                "{} - {}",
                from.format("%Y-%m-%d"),
                to.format("%Y-%m-%d")
            ))
        })
        .collect()
}

/// Labels for resampled buckets.
///
/// Each bucket is named after the calendar period its lines were written in,
/// which is the period ending at its boundary: `"2024"` for years,
/// `"2024 January"` for months, the ISO date of the first day otherwise.
///
/// When the data starts exactly on a period boundary the first bucket holds
/// no lines, but it is still labelled (with the period before the start).
#[must_use]
pub fn bucket_labels(bucket_starts: &[DateTime<Utc>], period: Period) -> Vec<String> {
    let format = match period {
        Period::Year => "%Y",
        Period::Month => "%Y %B",
        Period::Week | Period::Day => "%Y-%m-%d",
    };
    bucket_starts
        .iter()
        .map(|boundary| {
            let date = boundary.date_naive();
            period
                .period_before(date)
                .unwrap_or(date)
                .format(format)
                .to_string()
        })
        .collect()
}
