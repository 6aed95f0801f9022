//! End-to-end processing of one burndown matrix.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strata_stats::survival::SurvivalRatioCurve;

use crate::{
    BurndownError, TooLooseError,
    calendar::{Period, ResampleMode},
    dense::DenseDailyMatrix,
    interpolation::interpolate,
    labels,
    model::{BurndownHeader, SparseAgeBandMatrix},
    observer::BurndownObserver,
    resample::resample,
    survival::survival_ratio,
};

/// Above this many raw bands the legend becomes unreadable.
const MAX_READABLE_LABELS: usize = 18;

/// Caller-side configuration of [`load_burndown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BurndownOptions {
    /// Bucket size of the output, or [`ResampleMode::Raw`] to keep the bands.
    pub resample: ResampleMode,
    /// Compute the survival ratio of the interpolated matrix.
    pub report_survival: bool,
}

/// Chart-ready burndown data.
///
/// `matrix` has one row per entry of `labels` and one column per entry of
/// `date_range`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedBurndown {
    pub name: String,
    pub matrix: Vec<Vec<f64>>,
    pub date_range: Vec<DateTime<Utc>>,
    pub labels: Vec<String>,
    pub granularity: u32,
    pub sampling: u32,
    /// The mode actually used, which may be finer than the requested one.
    pub resample_mode: ResampleMode,
    #[serde(skip)]
    pub survival: Option<SurvivalRatioCurve>,
}

/// Processes a decoded burndown matrix into chart-ready data.
///
/// With [`ResampleMode::Raw`] the bands are returned unchanged. Otherwise the
/// matrix is interpolated to daily resolution, cleared after `last`, and
/// aggregated into calendar buckets. A bucket size too coarse for the covered
/// period is retried with the next finer one (`year → month → day`).
///
/// # Errors
///
/// - [`InvalidParameterError`](crate::InvalidParameterError) for a zero parameter or `last < start`
/// - [`MatrixError::Empty`](crate::MatrixError::Empty) for a matrix without rows or columns
/// - [`TooLooseError`](crate::TooLooseError) when even daily buckets do not fit
///
/// # Examples
///
/// ```
/// use strata_core::{
///     burndown::{BurndownOptions, load_burndown},
///     calendar::ResampleMode,
///     model::{BurndownHeader, BurndownParameters, SparseAgeBandMatrix},
///     observer::NoopObserver,
/// };
///
/// // Ten days of data starting 2024-03-10.
/// let start = 1_710_028_800;
/// let header = BurndownHeader {
///     start,
///     last: start + 9 * 86_400,
///     params: BurndownParameters { sampling: 5, granularity: 5, tick_size: 86_400 },
/// };
/// let matrix = SparseAgeBandMatrix::from_rows(vec![vec![50, 40], vec![0, 30]]).unwrap();
/// let options = BurndownOptions { resample: ResampleMode::Year, report_survival: false };
///
/// let result = load_burndown("demo", &header, &matrix, &options, &mut NoopObserver).unwrap();
/// // Neither a year nor a month boundary falls inside ten days.
/// assert_eq!(result.resample_mode, ResampleMode::Day);
/// assert_eq!(result.labels.len(), result.matrix.len());
/// ```
pub fn load_burndown<O>(
    name: &str,
    header: &BurndownHeader,
    matrix: &SparseAgeBandMatrix,
    options: &BurndownOptions,
    observer: &mut O,
) -> Result<ProcessedBurndown, BurndownError>
where
    O: BurndownObserver + ?Sized,
{
    header.validate()?;
    matrix.ensure_not_empty()?;

    let params = header.params;
    let start = header.floored_start()?;
    let last = header.last_time()?;
    let samples = u64::try_from(matrix.cols()).unwrap_or(u64::MAX);
    let finish = params.advance(start, samples.saturating_mul(u64::from(params.sampling)))?;

    let Some(period) = options.resample.period() else {
        let labels = labels::raw_band_labels(start, &params, matrix.rows())?;
        if labels.len() > MAX_READABLE_LABELS {
            observer.too_many_labels(labels.len());
        }
        let date_range = (1..=samples)
            .map(|sample| params.advance(start, sample * u64::from(params.sampling)))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(ProcessedBurndown {
            name: name.to_owned(),
            matrix: matrix.to_f64_rows(),
            date_range,
            labels,
            granularity: params.granularity,
            sampling: params.sampling,
            resample_mode: ResampleMode::Raw,
            survival: None,
        });
    };

    let daily = daily_matrix_from(start, last, header, matrix, observer)?;

    let survival = options.report_survival.then(|| {
        let curve = survival_ratio(&daily);
        observer.survival(&curve);
        curve
    });

    let (period, resampled) = resample_with_fallback(observer, period, |period| {
        resample(&daily, start, finish, period)
    })?;
    let labels = labels::bucket_labels(&resampled.bucket_starts, period);

    Ok(ProcessedBurndown {
        name: name.to_owned(),
        matrix: resampled.matrix,
        date_range: resampled.days,
        labels,
        granularity: params.granularity,
        sampling: params.sampling,
        resample_mode: period.into(),
        survival,
    })
}

/// Interpolates `matrix` to daily resolution and clears every day after `last`.
///
/// # Errors
///
/// Same parameter and matrix errors as [`load_burndown`].
pub fn daily_matrix<O>(
    header: &BurndownHeader,
    matrix: &SparseAgeBandMatrix,
    observer: &mut O,
) -> Result<DenseDailyMatrix, BurndownError>
where
    O: BurndownObserver + ?Sized,
{
    header.validate()?;
    matrix.ensure_not_empty()?;
    daily_matrix_from(
        header.floored_start()?,
        header.last_time()?,
        header,
        matrix,
        observer,
    )
}

fn daily_matrix_from<O>(
    start: DateTime<Utc>,
    last: DateTime<Utc>,
    header: &BurndownHeader,
    matrix: &SparseAgeBandMatrix,
    observer: &mut O,
) -> Result<DenseDailyMatrix, BurndownError>
where
    O: BurndownObserver + ?Sized,
{
    let mut daily = interpolate(
        matrix,
        header.params.granularity as usize,
        header.params.sampling as usize,
        observer,
    )?;
    let last_day = usize::try_from((last - start).num_days()).unwrap_or(0);
    daily.zero_columns_from(last_day + 1);
    Ok(daily)
}

/// Runs `attempt` with `period`, then with each finer period until one fits.
///
/// The chain `period.finer()` is finite, so the loop runs at most four times.
fn resample_with_fallback<O, T, F>(
    observer: &mut O,
    mut period: Period,
    mut attempt: F,
) -> Result<(Period, T), BurndownError>
where
    O: BurndownObserver + ?Sized,
    F: FnMut(Period) -> Result<T, TooLooseError>,
{
    loop {
        observer.resampling(period);
        match attempt(period) {
            Ok(value) => return Ok((period, value)),
            Err(err) => {
                let next = period.finer().ok_or(err)?;
                observer.fallback(&err, next);
                period = next;
            }
        }
    }
}
