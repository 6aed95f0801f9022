//! Reconstruction and calendar resampling of code burndown matrices.
//!
//! A burndown matrix records, for each age band (a group of `granularity`
//! days in which lines were written), how many of those lines survived at
//! each sample (a snapshot taken every `sampling` days). This crate turns that
//! sparse record into data ready for a stacked time-series chart.
//!
//! # Pipeline
//!
//! ```text
//! BurndownHeader + SparseAgeBandMatrix
//!   │
//!   ├─ raw mode ─────────────────────────────► labels::raw_band_labels
//!   │
//!   └─ interpolation::interpolate  (band × sample → day × day)
//!        ├─ zero every column after `last`
//!        ├─ survival::survival_ratio   (optional report)
//!        ├─ resample::resample          (calendar buckets, year → month → day cascade)
//!        └─ labels::bucket_labels
//!                                            ► burndown::ProcessedBurndown
//! ```
//!
//! The entry point is [`burndown::load_burndown`]. Decoding the input and
//! drawing the result are left to the caller.
//!
//! # Examples
//!
//! ```
//! use strata_core::{
//!     burndown::{BurndownOptions, load_burndown},
//!     calendar::ResampleMode,
//!     model::{BurndownHeader, BurndownParameters, SparseAgeBandMatrix},
//!     observer::NoopObserver,
//! };
//!
//! let header = BurndownHeader {
//!     start: 0,
//!     last: 5 * 86_400,
//!     params: BurndownParameters { sampling: 1, granularity: 1, tick_size: 86_400 },
//! };
//! let matrix = SparseAgeBandMatrix::from_rows(vec![vec![10]]).unwrap();
//! let options = BurndownOptions { resample: ResampleMode::Raw, report_survival: false };
//!
//! let result = load_burndown("project", &header, &matrix, &options, &mut NoopObserver).unwrap();
//! assert_eq!(result.labels, vec!["1970-01-01 - 1970-01-02"]);
//! ```

pub mod burndown;
pub mod calendar;
pub mod dense;
pub mod interpolation;
pub mod labels;
pub mod model;
pub mod observer;
pub mod resample;
pub mod survival;

use self::calendar::ResampleMode;

/// The burndown matrix has no usable cells or is not rectangular.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MatrixError {
    #[display("burndown matrix is empty")]
    Empty,
    #[display("burndown matrix row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A header parameter is out of its valid domain.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidParameterError {
    #[display("sampling must be positive")]
    ZeroSampling,
    #[display("granularity must be positive")]
    ZeroGranularity,
    #[display("tick size must be positive")]
    ZeroTickSize,
    #[display("last timestamp {last} precedes start timestamp {start}")]
    LastBeforeStart { start: i64, last: i64 },
    #[display("timestamp {timestamp} is out of the representable range")]
    TimestampOutOfRange { timestamp: i64 },
}

/// The requested bucket size leaves no usable bucket for the covered period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("too loose resampling: {mode}, try a finer one")]
pub struct TooLooseError {
    #[error(not(source))]
    pub mode: ResampleMode,
}

#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum BurndownError {
    #[display("{_0}")]
    Matrix(MatrixError),
    #[display("{_0}")]
    InvalidParameter(InvalidParameterError),
    #[display("{_0}")]
    TooLoose(TooLooseError),
}
