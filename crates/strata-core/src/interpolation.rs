//! Expansion of a sparse `band × sample` matrix into a dense `day × day` one.
//!
//! Each cell `(y, x)` of the sparse matrix covers the rows
//! `[y * granularity, (y + 1) * granularity)` (days the lines were written) and
//! the columns `[x * sampling, (x + 1) * sampling)` (days they were observed)
//! of the dense matrix. Comparing the two day ranges puts the cell in one of
//! three regimes:
//!
//! ```text
//!  growth            peak                decay
//!  band still open   band closes inside  band closed before
//!  at sample end     the sample          the sample started
//!
//!       /              /\
//!      /              /  \               ────\
//!     /              /    \                   \────
//! ```
//!
//! Only rows of the cell's own band and columns of its own sample are written.
//! Cells with `y * granularity > (x + 1) * sampling` describe a band that did
//! not exist yet and stay zero.

use crate::{
    BurndownError, InvalidParameterError, dense::DenseDailyMatrix, model::SparseAgeBandMatrix,
    observer::BurndownObserver,
};

/// Dense-matrix day ranges covered by one sparse cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellWindow {
    /// Index of the sample (sparse column).
    pub sample: usize,
    /// First day of the band, `y * granularity`.
    pub band_start: usize,
    /// One past the last day of the band, `(y + 1) * granularity`.
    pub band_end: usize,
    /// First day of the sample, `x * sampling`.
    pub sample_start: usize,
    /// One past the last day of the sample, `(x + 1) * sampling`.
    pub sample_end: usize,
}

/// How a band relates to a sample window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Regime {
    /// The band opens after the sample ends.
    Unreachable,
    /// The band is still being written when the sample ends.
    Growth,
    /// The band stops being written inside the sample.
    Peak,
    /// The band was closed before the sample started.
    Decay,
}

impl CellWindow {
    #[must_use]
    pub fn new(band: usize, sample: usize, granularity: usize, sampling: usize) -> Self {
        Self {
            sample,
            band_start: band * granularity,
            band_end: (band + 1) * granularity,
            sample_start: sample * sampling,
            sample_end: (sample + 1) * sampling,
        }
    }

    #[must_use]
    pub fn regime(&self) -> Regime {
        if self.band_start > self.sample_end {
            Regime::Unreachable
        } else if self.band_end >= self.sample_end {
            Regime::Growth
        } else if self.band_end >= self.sample_start {
            Regime::Peak
        } else {
            Regime::Decay
        }
    }
}

/// Interpolates a sparse burndown matrix into a dense daily one.
///
/// The result has exactly `rows * granularity` rows and `cols * sampling`
/// columns. `observer` is told about each band before it is expanded.
///
/// # Errors
///
/// - [`MatrixError::Empty`](crate::MatrixError::Empty) if the matrix has no rows or no columns
/// - [`InvalidParameterError`] if `granularity` or `sampling` is zero
///
/// # Examples
///
/// ```
/// # use strata_core::{
/// #     interpolation::interpolate, model::SparseAgeBandMatrix, observer::NoopObserver,
/// # };
/// let matrix = SparseAgeBandMatrix::from_rows(vec![vec![100, 90, 80]]).unwrap();
/// let daily = interpolate(&matrix, 1, 1, &mut NoopObserver).unwrap();
/// assert_eq!(daily.row(0), &[100.0, 90.0, 80.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn interpolate<O>(
    matrix: &SparseAgeBandMatrix,
    granularity: usize,
    sampling: usize,
    observer: &mut O,
) -> Result<DenseDailyMatrix, BurndownError>
where
    O: BurndownObserver + ?Sized,
{
    matrix.ensure_not_empty()?;
    if sampling == 0 {
        return Err(InvalidParameterError::ZeroSampling.into());
    }
    if granularity == 0 {
        return Err(InvalidParameterError::ZeroGranularity.into());
    }

    let mut daily =
        DenseDailyMatrix::zeros(matrix.rows() * granularity, matrix.cols() * sampling);

    for (band, counts) in matrix.iter_rows().enumerate() {
        observer.interpolating(band, matrix.rows());
        let counts = counts.iter().map(|&v| v as f64).collect::<Vec<_>>();
        for sample in 0..counts.len() {
            let window = CellWindow::new(band, sample, granularity, sampling);
            interpolate_cell(&mut daily, &counts, window, sampling);
        }
    }

    Ok(daily)
}

/// Fills the dense cells of one sparse cell. `counts` is the band's sparse row.
fn interpolate_cell(
    daily: &mut DenseDailyMatrix,
    counts: &[f64],
    window: CellWindow,
    sampling: usize,
) {
    let x = window.sample;
    let value = counts[x];
    let previous = if x > 0 { counts[x - 1] } else { 0.0 };

    match window.regime() {
        Regime::Unreachable => {}
        Regime::Growth => {
            // A band opening inside this sample had no lines at its start.
            let initial = if window.band_start > window.sample_start {
                0.0
            } else {
                previous
            };
            grow(daily, window, initial, window.sample_end, value);
        }
        Regime::Peak => {
            let peak = estimate_peak(counts, window, sampling);
            grow(daily, window, previous, window.band_end, peak);
            decay(daily, window, window.band_end, peak, value);
        }
        Regime::Decay => {
            decay(daily, window, window.sample_start, previous, value);
        }
    }
}

/// Linear growth of a band's population from `initial` to `finish_value`.
///
/// Every day born in `[max(sample_start, band_start), finish_index)` receives
/// an equal share of the increase from its birth day on. Days of the band born
/// before the window carry their previous value forward.
#[expect(clippy::cast_precision_loss)]
pub fn grow(
    daily: &mut DenseDailyMatrix,
    window: CellWindow,
    initial: f64,
    finish_index: usize,
    finish_value: f64,
) {
    let start_index = window.sample_start.max(window.band_start);
    if finish_index <= start_index {
        return;
    }
    let avg = (finish_value - initial) / (finish_index - start_index) as f64;

    for j in window.sample_start..finish_index {
        for i in start_index..=j {
            daily[(i, j)] = avg;
        }
    }
    for j in window.sample_start..finish_index {
        for i in window.band_start..window.sample_start {
            daily[(i, j)] = daily[(i, j - 1)];
        }
    }
}

/// Linear decay of every day of the band from `start_index` to the end of the sample.
///
/// Each row shrinks from its value on day `start_index - 1` by the band-level
/// ratio `end_value / start_value`. Nothing happens when `start_value` is zero.
#[expect(clippy::cast_precision_loss)]
pub fn decay(
    daily: &mut DenseDailyMatrix,
    window: CellWindow,
    start_index: usize,
    start_value: f64,
    end_value: f64,
) {
    if start_value == 0.0 || start_index == 0 || start_index >= window.sample_end {
        return;
    }
    let k = end_value / start_value;
    let scale = (window.sample_end - start_index) as f64;

    for i in window.band_start..window.band_end {
        let initial = daily[(i, start_index - 1)];
        for j in start_index..window.sample_end {
            let progress = (j - start_index + 1) as f64 / scale;
            daily[(i, j)] = initial * (1.0 + (k - 1.0) * progress);
        }
    }
}

/// Estimated band population on the day it stops growing.
///
/// Extrapolates the growth rate between the two previous samples to
/// `band_end`. If the recorded value exceeds that estimate, the peak is
/// instead projected backwards from the slope towards the next sample; at the
/// last sample the recorded value itself is used.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn estimate_peak(counts: &[f64], window: CellWindow, sampling: usize) -> f64 {
    let x = window.sample;
    let v1 = if x > 0 { counts[x - 1] } else { 0.0 };
    let v2 = counts[x];
    let delta = window.band_end.saturating_sub(window.sample_start) as f64;

    let (before, scale) = if x > 0 && (x - 1) * sampling >= window.band_start {
        (if x > 1 { counts[x - 2] } else { 0.0 }, sampling)
    } else if x == 0 {
        (0.0, sampling)
    } else {
        (0.0, window.sample_start.saturating_sub(window.band_start))
    };
    let rate = if scale == 0 {
        0.0
    } else {
        (v1 - before) / scale as f64
    };
    let peak = v1 + rate * delta;
    if v2 <= peak {
        return peak;
    }

    match counts.get(x + 1) {
        Some(&next) => {
            let k = (v2 - next) / sampling as f64;
            v2 + k * window.sample_end.saturating_sub(window.band_end) as f64
        }
        None => v2,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{MatrixError, observer::NoopObserver};

    fn matrix(rows: Vec<Vec<u64>>) -> SparseAgeBandMatrix {
        SparseAgeBandMatrix::from_rows(rows).unwrap()
    }

    fn assert_row(daily: &DenseDailyMatrix, row: usize, expected: &[f64]) {
        assert_eq!(daily.cols(), expected.len());
        for (col, &value) in expected.iter().enumerate() {
            assert_abs_diff_eq!(daily.get(row, col), value, epsilon = 1e-9);
        }
    }

    /// Random causal matrix: bands decay after creation, zero before.
    fn random_matrix(rng: &mut Pcg64Mcg, granularity: usize, sampling: usize) -> SparseAgeBandMatrix {
        let rows = rng.random_range(1..6);
        let cols = rng.random_range(1..8);
        let data = (0..rows)
            .map(|y| {
                let mut value = rng.random_range(0..500_u64);
                (0..cols)
                    .map(|x| {
                        if y * granularity > (x + 1) * sampling {
                            0
                        } else {
                            value = value.saturating_sub(rng.random_range(0..50));
                            value
                        }
                    })
                    .collect()
            })
            .collect();
        matrix(data)
    }

    #[test]
    fn test_single_cell() {
        let daily = interpolate(&matrix(vec![vec![10]]), 1, 1, &mut NoopObserver).unwrap();
        assert_eq!((daily.rows(), daily.cols()), (1, 1));
        assert_row(&daily, 0, &[10.0]);
    }

    #[test]
    fn test_decay_and_growth_daily() {
        let m = matrix(vec![vec![100, 90, 80], vec![0, 20, 30]]);
        let daily = interpolate(&m, 1, 1, &mut NoopObserver).unwrap();
        assert_eq!((daily.rows(), daily.cols()), (2, 3));
        // Band 0 decays sample by sample.
        assert_row(&daily, 0, &[100.0, 90.0, 80.0]);
        // Band 1 appears at day 1; with no later sample the day-2 peak keeps
        // the day-1 population.
        assert_row(&daily, 1, &[0.0, 20.0, 20.0]);
    }

    #[test]
    fn test_growth_spreads_over_window() {
        let daily = interpolate(&matrix(vec![vec![6, 6]]), 2, 2, &mut NoopObserver).unwrap();
        assert_eq!((daily.rows(), daily.cols()), (2, 4));
        assert_row(&daily, 0, &[3.0, 3.0, 3.0, 3.0]);
        assert_row(&daily, 1, &[0.0, 3.0, 3.0, 3.0]);
        assert_eq!(daily.column_sums(0..2), vec![3.0, 6.0, 6.0, 6.0]);
    }

    #[test]
    fn test_peak_inside_first_sample() {
        // Band of one day inside a two-day sample: the peak is projected
        // back from the slope towards the next sample.
        let daily = interpolate(&matrix(vec![vec![10, 5]]), 1, 2, &mut NoopObserver).unwrap();
        assert_row(&daily, 0, &[12.5, 10.0, 7.5, 5.0]);
    }

    #[test]
    fn test_growth_carries_older_days_forward() {
        // Four-day band, two-day samples: in the second sample days 0 and 1
        // were born earlier and keep their share while days 2 and 3 grow.
        let daily = interpolate(&matrix(vec![vec![4, 8]]), 4, 2, &mut NoopObserver).unwrap();
        assert_eq!(daily.column_sums(0..4), vec![2.0, 4.0, 6.0, 8.0]);
        assert_row(&daily, 0, &[2.0, 2.0, 2.0, 2.0]);
        assert_row(&daily, 1, &[0.0, 2.0, 2.0, 2.0]);
        assert_row(&daily, 2, &[0.0, 0.0, 2.0, 2.0]);
        assert_row(&daily, 3, &[0.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_peak_after_first_sample_uses_recent_rate() {
        // Band [0, 5), samples of 2 days. The band closes inside sample 2;
        // samples 0 and 1 give a rate of (6 - 2) / 2 = 2 per day, so day 4
        // peaks at 8 before decaying to the recorded 7.
        let daily = interpolate(&matrix(vec![vec![2, 6, 7]]), 5, 2, &mut NoopObserver).unwrap();
        assert_eq!(CellWindow::new(0, 2, 5, 2).regime(), Regime::Peak);

        let sums = daily.column_sums(0..5);
        for (sum, expected) in sums.iter().zip([1.0, 2.0, 4.0, 6.0, 8.0, 7.0]) {
            assert_abs_diff_eq!(*sum, expected, epsilon = 1e-9);
        }
        assert_row(&daily, 4, &[0.0, 0.0, 0.0, 0.0, 2.0, 1.75]);
        // Older days shrink by the same 7/8 ratio.
        assert_row(&daily, 0, &[1.0, 1.0, 1.0, 1.0, 1.0, 0.875]);
    }

    #[test]
    fn test_observer_sees_every_band() {
        #[derive(Default)]
        struct Bands(Vec<(usize, usize)>);

        impl BurndownObserver for Bands {
            fn interpolating(&mut self, band: usize, bands: usize) {
                self.0.push((band, bands));
            }
        }

        let mut bands = Bands::default();
        interpolate(&matrix(vec![vec![5, 4], vec![0, 3], vec![0, 0]]), 1, 1, &mut bands).unwrap();
        assert_eq!(bands.0, vec![(0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_peak_at_last_sample_uses_recorded_value() {
        let counts = [0.0, 8.0];
        let window = CellWindow::new(1, 1, 3, 4);
        assert_eq!(window.regime(), Regime::Peak);
        assert_abs_diff_eq!(estimate_peak(&counts, window, 4), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_peak_extrapolates_recent_rate() {
        // Band [0, 6), samples of 4 days: at x=1 growth stops on day 6.
        let counts = [4.0, 5.0, 3.0];
        let window = CellWindow::new(0, 1, 6, 4);
        assert_eq!(window.regime(), Regime::Peak);
        // rate = (4 - 0) / 4 = 1 per day, two more days of growth -> 6.
        assert_abs_diff_eq!(estimate_peak(&counts, window, 4), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_regimes() {
        assert_eq!(CellWindow::new(3, 0, 1, 1).regime(), Regime::Unreachable);
        assert!(CellWindow::new(1, 0, 1, 1).regime().is_growth());
        assert!(CellWindow::new(0, 0, 1, 1).regime().is_growth());
        assert!(CellWindow::new(0, 1, 1, 1).regime().is_peak());
        assert!(CellWindow::new(0, 2, 1, 1).regime().is_decay());
    }

    #[test]
    fn test_decay_skips_zero_start() {
        let mut daily = DenseDailyMatrix::zeros(1, 2);
        let window = CellWindow::new(0, 1, 1, 1);
        decay(&mut daily, window, 1, 0.0, 5.0);
        assert_row(&daily, 0, &[0.0, 0.0]);
    }

    #[test]
    fn test_empty_matrix() {
        let err = interpolate(&matrix(vec![]), 1, 1, &mut NoopObserver).unwrap_err();
        assert_eq!(err, BurndownError::Matrix(MatrixError::Empty));
        let err = interpolate(&matrix(vec![vec![]]), 1, 1, &mut NoopObserver).unwrap_err();
        assert_eq!(err, BurndownError::Matrix(MatrixError::Empty));
    }

    #[test]
    fn test_zero_parameters() {
        let m = matrix(vec![vec![1]]);
        assert_eq!(
            interpolate(&m, 1, 0, &mut NoopObserver).unwrap_err(),
            BurndownError::InvalidParameter(InvalidParameterError::ZeroSampling)
        );
        assert_eq!(
            interpolate(&m, 0, 1, &mut NoopObserver).unwrap_err(),
            BurndownError::InvalidParameter(InvalidParameterError::ZeroGranularity)
        );
    }

    #[test]
    fn test_random_dimensions_and_causality() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let granularity = rng.random_range(1..5);
            let sampling = rng.random_range(1..5);
            let m = random_matrix(&mut rng, granularity, sampling);
            let daily = interpolate(&m, granularity, sampling, &mut NoopObserver).unwrap();

            assert_eq!(daily.rows(), m.rows() * granularity);
            assert_eq!(daily.cols(), m.cols() * sampling);

            for y in 0..m.rows() {
                for x in 0..m.cols() {
                    let window = CellWindow::new(y, x, granularity, sampling);
                    if window.regime() != Regime::Unreachable {
                        continue;
                    }
                    for i in window.band_start..window.band_end {
                        for j in window.sample_start..window.sample_end {
                            assert_eq!(daily.get(i, j), 0.0, "cell ({i}, {j}) of band {y}, sample {x}");
                        }
                    }
                }
            }
        }
    }
}
