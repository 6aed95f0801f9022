//! Survival ratio of a dense daily matrix.

use strata_stats::survival::SurvivalRatioCurve;

use crate::dense::DenseDailyMatrix;

/// Computes the running alive ratio of every column of `daily`.
///
/// `alive(c)` is the column sum; `total(c)` sums, over rows, the largest
/// value the row reached up to column `c` (the lines ever written).
#[must_use]
pub fn survival_ratio(daily: &DenseDailyMatrix) -> SurvivalRatioCurve {
    let alive = daily.column_sums(0..daily.rows());
    let mut total = vec![0.0; daily.cols()];
    for row in daily.iter_rows() {
        let mut peak = 0.0_f64;
        for (t, &value) in total.iter_mut().zip(row) {
            peak = peak.max(value);
            *t += peak;
        }
    }
    SurvivalRatioCurve::from_daily(&alive, &total)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{interpolation::interpolate, model::SparseAgeBandMatrix, observer::NoopObserver};

    #[test]
    fn test_first_column_is_one() {
        let m = SparseAgeBandMatrix::from_rows(vec![vec![100, 90, 80], vec![0, 20, 30]]).unwrap();
        let curve = survival_ratio(&interpolate(&m, 1, 1, &mut NoopObserver).unwrap());
        assert_eq!(curve.days[0], 0);
        assert_eq!(curve.ratios[0], 1.0);
    }

    #[test]
    fn test_decay_lowers_ratio() {
        let m = SparseAgeBandMatrix::from_rows(vec![vec![100, 90, 80], vec![0, 20, 30]]).unwrap();
        let curve = survival_ratio(&interpolate(&m, 1, 1, &mut NoopObserver).unwrap());
        // alive: 100, 110, 100; total: 100, 120, 120
        assert_abs_diff_eq!(curve.ratios[1], 210.0 / 220.0, epsilon = 1e-9);
        assert_abs_diff_eq!(curve.ratios[2], 310.0 / 340.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_columns_skipped() {
        let daily = DenseDailyMatrix::zeros(2, 3);
        assert!(survival_ratio(&daily).is_empty());
    }
}
