//! Input data model: header parameters and the sparse age-band matrix.
//!
//! ```text
//!            sample x  ──────────►  (every `sampling` days)
//!  band y   ┌─────────────────────┐
//!    │      │ M[0][0] M[0][1] ... │
//!    │      │    0    M[1][1] ... │
//!    ▼      │    0       0    ... │
//! (every    └─────────────────────┘
//!  `granularity` days)
//! ```
//!
//! `M[y][x]` is the number of lines written during band `y` that were still
//! alive at the end of sample `x`.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{InvalidParameterError, MatrixError};

/// Time resolution of a burndown matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurndownParameters {
    /// Ticks per matrix column (sample).
    pub sampling: u32,
    /// Ticks per matrix row (age band).
    pub granularity: u32,
    /// Seconds per tick.
    pub tick_size: u32,
}

impl BurndownParameters {
    /// Checks that every parameter is positive.
    pub fn validate(&self) -> Result<(), InvalidParameterError> {
        if self.sampling == 0 {
            return Err(InvalidParameterError::ZeroSampling);
        }
        if self.granularity == 0 {
            return Err(InvalidParameterError::ZeroGranularity);
        }
        if self.tick_size == 0 {
            return Err(InvalidParameterError::ZeroTickSize);
        }
        Ok(())
    }

    /// The instant `ticks` ticks after `from`.
    pub fn advance(
        &self,
        from: DateTime<Utc>,
        ticks: u64,
    ) -> Result<DateTime<Utc>, InvalidParameterError> {
        let seconds = ticks
            .checked_mul(u64::from(self.tick_size))
            .and_then(|s| i64::try_from(s).ok())
            .unwrap_or(i64::MAX);
        TimeDelta::try_seconds(seconds)
            .and_then(|delta| from.checked_add_signed(delta))
            .ok_or(InvalidParameterError::TimestampOutOfRange {
                timestamp: from.timestamp().saturating_add(seconds),
            })
    }
}

/// Header accompanying a burndown matrix.
///
/// `start` and `last` are unix timestamps (seconds): `start` is the moment the
/// first band opens, `last` the moment of the most recent recorded change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurndownHeader {
    pub start: i64,
    pub last: i64,
    #[serde(flatten)]
    pub params: BurndownParameters,
}

impl BurndownHeader {
    /// Checks the parameters and that `last >= start`.
    pub fn validate(&self) -> Result<(), InvalidParameterError> {
        self.params.validate()?;
        if self.last < self.start {
            return Err(InvalidParameterError::LastBeforeStart {
                start: self.start,
                last: self.last,
            });
        }
        Ok(())
    }

    /// `start` rounded down to a whole number of ticks since the epoch.
    pub fn floored_start(&self) -> Result<DateTime<Utc>, InvalidParameterError> {
        let tick = i64::from(self.params.tick_size);
        if tick == 0 {
            return Err(InvalidParameterError::ZeroTickSize);
        }
        timestamp_to_datetime(self.start - self.start.rem_euclid(tick))
    }

    pub fn last_time(&self) -> Result<DateTime<Utc>, InvalidParameterError> {
        timestamp_to_datetime(self.last)
    }
}

pub(crate) fn timestamp_to_datetime(timestamp: i64) -> Result<DateTime<Utc>, InvalidParameterError> {
    DateTime::from_timestamp(timestamp, 0)
        .ok_or(InvalidParameterError::TimestampOutOfRange { timestamp })
}

/// Rectangular `band × sample` table of surviving line counts.
///
/// Stored row-major. Empty matrices (no rows, or rows without columns) are
/// representable; consumers reject them with [`MatrixError::Empty`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SparseAgeBandMatrix {
    rows: usize,
    cols: usize,
    values: Vec<u64>,
}

impl SparseAgeBandMatrix {
    /// Builds a matrix from decoded rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Ragged`] if any row differs in length from the first.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strata_core::model::SparseAgeBandMatrix;
    /// let matrix = SparseAgeBandMatrix::from_rows(vec![vec![100, 90], vec![0, 20]]).unwrap();
    /// assert_eq!((matrix.rows(), matrix.cols()), (2, 2));
    /// assert_eq!(matrix.get(0, 1), 90);
    ///
    /// assert!(SparseAgeBandMatrix::from_rows(vec![vec![1, 2], vec![3]]).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, MatrixError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (row, data) in rows.iter().enumerate() {
            if data.len() != cols {
                return Err(MatrixError::Ragged {
                    row,
                    expected: cols,
                    found: data.len(),
                });
            }
            values.extend_from_slice(data);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            values,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Returns `Err(MatrixError::Empty)` when there is nothing to process.
    pub fn ensure_not_empty(&self) -> Result<(), MatrixError> {
        if self.is_empty() {
            return Err(MatrixError::Empty);
        }
        Ok(())
    }

    /// Value of band `band` at sample `sample`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    #[must_use]
    pub fn get(&self, band: usize, sample: usize) -> u64 {
        assert!(band < self.rows && sample < self.cols, "matrix index out of bounds");
        self.values[band * self.cols + sample]
    }

    #[must_use]
    pub fn row(&self, band: usize) -> &[u64] {
        &self.values[band * self.cols..(band + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[u64]> {
        (0..self.rows).map(|band| self.row(band))
    }

    /// Returns `true` if no band shows survivors before it was created,
    /// i.e. `M[y][x] == 0` whenever `y * granularity > (x + 1) * sampling`.
    #[must_use]
    pub fn is_causal(&self, granularity: usize, sampling: usize) -> bool {
        (0..self.rows).all(|y| {
            (0..self.cols)
                .filter(|&x| y * granularity > (x + 1) * sampling)
                .all(|x| self.get(y, x) == 0)
        })
    }

    /// The matrix converted to floating point, one `Vec` per band.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn to_f64_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows()
            .map(|row| row.iter().map(|&v| v as f64).collect())
            .collect()
    }
}
