//! Full-resolution `day × day` survivorship matrix.

use std::ops::{Index, IndexMut};

/// `D[born][observed]`: lines written on day `born` still alive on day `observed`.
///
/// Row-major `f64` buffer. Values are fractional because interpolation
/// spreads integer sample counts over individual days.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseDailyMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl DenseDailyMatrix {
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
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
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(|row| self.row(row))
    }

    /// Sum of every column over the row range `rows`, clamped to the matrix.
    #[must_use]
    pub fn column_sums(&self, rows: std::ops::Range<usize>) -> Vec<f64> {
        let end = rows.end.min(self.rows);
        let mut sums = vec![0.0; self.cols];
        for row in rows.start.min(end)..end {
            for (sum, value) in sums.iter_mut().zip(self.row(row)) {
                *sum += value;
            }
        }
        sums
    }

    /// Sets every cell in columns `col..` to zero.
    pub fn zero_columns_from(&mut self, col: usize) {
        if col >= self.cols {
            return;
        }
        for row in self.values.chunks_exact_mut(self.cols) {
            row[col..].fill(0.0);
        }
    }
}

impl Index<(usize, usize)> for DenseDailyMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(row < self.rows && col < self.cols, "dense index out of bounds");
        &self.values[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for DenseDailyMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(row < self.rows && col < self.cols, "dense index out of bounds");
        &mut self.values[row * self.cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DenseDailyMatrix {
        let mut m = DenseDailyMatrix::zeros(3, 4);
        for row in 0..3 {
            for col in 0..4 {
                m[(row, col)] = f64::from(u8::try_from(row * 10 + col).unwrap());
            }
        }
        m
    }

    #[test]
    fn test_zeros_shape() {
        let m = DenseDailyMatrix::zeros(2, 5);
        assert_eq!((m.rows(), m.cols()), (2, 5));
        assert!(m.iter_rows().all(|r| r.iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn test_column_sums_clamps_range() {
        let m = sample();
        assert_eq!(m.column_sums(1..3), vec![30.0, 32.0, 34.0, 36.0]);
        assert_eq!(m.column_sums(2..10), vec![20.0, 21.0, 22.0, 23.0]);
        assert_eq!(m.column_sums(5..10), vec![0.0; 4]);
    }

    #[test]
    fn test_zero_columns_from() {
        let mut m = sample();
        m.zero_columns_from(2);
        assert_eq!(m.row(1), &[10.0, 11.0, 0.0, 0.0]);
        m.zero_columns_from(10);
        assert_eq!(m.row(2), &[20.0, 21.0, 0.0, 0.0]);
    }
}
