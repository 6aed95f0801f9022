//! Aggregation of the dense daily matrix into calendar buckets.
//!
//! Bucket `i` collects the lines born between boundary `i - 1` (or the start
//! of the data for `i == 0`) and boundary `i`. Its row in the output follows
//! those lines over a day axis running from the first boundary to `finish`;
//! days before the bucket's first birth day stay zero.
//!
//! ```text
//!            day axis ─────────────────────►
//! bucket 0   ███████████████████████████████   born before boundary 0
//! bucket 1        ██████████████████████████   born in [b0, b1)
//! bucket 2                 █████████████████   born in [b1, b2)
//! ```

use std::iter;

use chrono::{DateTime, Days, Utc};

use crate::{TooLooseError, calendar::Period, dense::DenseDailyMatrix};

/// Result of resampling one dense matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Resampled {
    /// Bucket boundaries; bucket `i` ends at `bucket_starts[i]`.
    pub bucket_starts: Vec<DateTime<Utc>>,
    /// One entry per output column, daily from the first boundary.
    pub days: Vec<DateTime<Utc>>,
    /// `bucket_starts.len()` rows of `days.len()` columns.
    pub matrix: Vec<Vec<f64>>,
}

/// Whole days from `from` to `to`, zero if `to` precedes `from`.
fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> usize {
    usize::try_from((to - from).num_days()).unwrap_or(0)
}

/// Resamples `daily` into calendar buckets of size `period`.
///
/// Row and column `d` of `daily` stand for day `start + d`. If `start` lies
/// on a boundary of `period`, bucket 0 collects nothing and stays all zero.
///
/// # Errors
///
/// Returns [`TooLooseError`] when the first bucket boundary is not before
/// `finish` (no day would be covered), or the calendar overflows.
///
/// # Examples
///
/// ```
/// # use chrono::{TimeZone as _, Utc};
/// # use strata_core::{calendar::Period, dense::DenseDailyMatrix, resample::resample};
/// let start = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
/// let finish = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
/// let daily = DenseDailyMatrix::zeros(10, 10);
///
/// assert!(resample(&daily, start, finish, Period::Year).is_err());
/// let by_day = resample(&daily, start, finish, Period::Day).unwrap();
/// assert_eq!(by_day.days.len(), 10);
/// assert_eq!(by_day.matrix.len(), by_day.bucket_starts.len());
/// ```
pub fn resample(
    daily: &DenseDailyMatrix,
    start: DateTime<Utc>,
    finish: DateTime<Utc>,
    period: Period,
) -> Result<Resampled, TooLooseError> {
    let too_loose = TooLooseError {
        mode: period.into(),
    };
    let bucket_starts = period.bucket_starts(start, finish).ok_or(too_loose)?;
    let first = *bucket_starts.first().ok_or(too_loose)?;
    if first >= finish {
        return Err(too_loose);
    }
    let num_days = days_between(first, finish);
    if num_days == 0 {
        return Err(too_loose);
    }

    let days = iter::successors(Some(first), |day| day.checked_add_days(Days::new(1)))
        .take(num_days)
        .collect::<Vec<_>>();
    if days.len() < num_days {
        return Err(too_loose);
    }

    let first_offset = days_between(start, first);
    let mut matrix = vec![vec![0.0; num_days]; bucket_starts.len()];
    let mut born_from = 0;
    for (row, &boundary) in matrix.iter_mut().zip(&bucket_starts) {
        let born_until = days_between(start, boundary);
        let born = born_from..born_until;
        born_from = born_until;

        let first_col = born.start.saturating_sub(first_offset);
        if first_col >= num_days || born.is_empty() {
            continue;
        }
        let sums = daily.column_sums(born);
        for (col, cell) in row.iter_mut().enumerate().skip(first_col) {
            match sums.get(first_offset + col) {
                Some(&sum) => *cell = sum,
                None => break,
            }
        }
    }

    Ok(Resampled {
        bucket_starts,
        days,
        matrix,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::calendar::ResampleMode;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    /// Every line born on day `i` stays alive forever, one line per day.
    fn staircase(days: usize) -> DenseDailyMatrix {
        let mut daily = DenseDailyMatrix::zeros(days, days);
        for i in 0..days {
            for j in i..days {
                daily[(i, j)] = 1.0;
            }
        }
        daily
    }

    #[test]
    fn test_year_too_loose_for_two_weeks() {
        let err = resample(&staircase(14), at(2024, 3, 10), at(2024, 3, 24), Period::Year)
            .unwrap_err();
        assert_eq!(err.mode, ResampleMode::Year);
    }

    #[test]
    fn test_daily_buckets() {
        // Start on a boundary: bucket 0 is empty, bucket i holds day i - 1.
        let daily = staircase(4);
        let r = resample(&daily, at(2024, 3, 4), at(2024, 3, 8), Period::Day).unwrap();
        assert_eq!(r.bucket_starts.len(), 5);
        assert_eq!(r.days, vec![at(2024, 3, 4), at(2024, 3, 5), at(2024, 3, 6), at(2024, 3, 7)]);
        assert_eq!(r.matrix[0], vec![0.0; 4]);
        assert_eq!(r.matrix[1], vec![1.0, 1.0, 1.0, 1.0]);
        assert_eq!(r.matrix[2], vec![0.0, 1.0, 1.0, 1.0]);
        assert_eq!(r.matrix[4], vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_weekly_buckets_sum_band_rows() {
        // 2024-03-06 is a Wednesday; boundaries are Mondays 03-11 and 03-18.
        let daily = staircase(10);
        let r = resample(&daily, at(2024, 3, 6), at(2024, 3, 16), Period::Week).unwrap();
        assert_eq!(r.bucket_starts, vec![at(2024, 3, 11), at(2024, 3, 18)]);
        // Day axis runs from the first boundary to finish.
        assert_eq!(r.days.len(), 5);
        // Bucket 0: the five lines born 03-06..03-10, all alive on the axis.
        assert_eq!(r.matrix[0], vec![5.0; 5]);
        // Bucket 1: lines born 03-11..03-15, one more each day.
        assert_eq!(r.matrix[1], vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_row_count_matches_buckets() {
        let daily = staircase(90);
        let r = resample(&daily, at(2024, 1, 15), at(2024, 4, 14), Period::Month).unwrap();
        assert_eq!(r.matrix.len(), r.bucket_starts.len());
        assert!(r.matrix.iter().all(|row| row.len() == r.days.len()));
        // Every line born is counted in exactly one bucket on the last day.
        let last: f64 = r.matrix.iter().map(|row| row[r.days.len() - 1]).sum();
        assert_eq!(last, 90.0);
    }
}
