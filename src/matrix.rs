//! Validated rectangular matrix with `NaN` as the missing marker.
//!
//! [`Matrix`] wraps a row-major `ndarray::Array2<f64>`. Construction is
//! the only place shape is checked; once built, a matrix is guaranteed to
//! have at least one column (it may have zero rows). The summarizer and
//! reducers borrow it and never mutate it.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::StatsError;
use crate::missing::MISSING;

/// Numeric matrix, rows × columns, with optional missing cells.
///
/// # Examples
/// ```
/// use u_rowstats::Matrix;
///
/// let m = Matrix::from_shape_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
/// assert_eq!(m.nrows(), 2);
/// assert_eq!(m.ncols(), 3);
/// assert_eq!(m.row(1).to_vec(), vec![4.0, 5.0, 6.0]);
/// # Ok::<(), u_rowstats::StatsError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(Array2<f64>);

impl Matrix {
    /// Builds a matrix from nested rows.
    ///
    /// # Errors
    /// - [`StatsError::EmptyColumns`] if there are no rows (the column
    ///   count cannot be inferred) or the rows are empty.
    /// - [`StatsError::RaggedRow`] if any row's length differs from the
    ///   first row's.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, StatsError> {
        let ncols = rows.first().map(Vec::len).ok_or(StatsError::EmptyColumns)?;
        if ncols == 0 {
            return Err(StatsError::EmptyColumns);
        }
        let nrows = rows.len();
        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != ncols {
                return Err(StatsError::RaggedRow {
                    row: i,
                    expected: ncols,
                    got: row.len(),
                });
            }
            data.extend(row);
        }
        Self::from_shape_vec(nrows, ncols, data)
    }

    /// Builds a matrix from rows of `Option<f64>`, mapping `None` to the
    /// missing marker.
    ///
    /// A `Some(NaN)` is also missing: the marker is `NaN` itself.
    pub fn from_optional_rows(rows: Vec<Vec<Option<f64>>>) -> Result<Self, StatsError> {
        Self::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(|v| v.unwrap_or(MISSING)).collect())
                .collect(),
        )
    }

    /// Builds a matrix from a flat row-major vector.
    ///
    /// Zero rows with a positive column count is valid and yields an empty
    /// matrix.
    ///
    /// # Errors
    /// - [`StatsError::EmptyColumns`] if `ncols == 0`.
    /// - [`StatsError::ShapeMismatch`] if `data.len() != nrows * ncols`.
    pub fn from_shape_vec(nrows: usize, ncols: usize, data: Vec<f64>) -> Result<Self, StatsError> {
        if ncols == 0 {
            return Err(StatsError::EmptyColumns);
        }
        let len = data.len();
        let mismatch = StatsError::ShapeMismatch {
            rows: nrows,
            cols: ncols,
            len,
        };
        if nrows.checked_mul(ncols) != Some(len) {
            return Err(mismatch);
        }
        Array2::from_shape_vec((nrows, ncols), data)
            .map(Self)
            .map_err(|_| mismatch)
    }

    /// Wraps an existing array.
    ///
    /// # Errors
    /// [`StatsError::EmptyColumns`] if the array has zero columns.
    pub fn from_array(array: Array2<f64>) -> Result<Self, StatsError> {
        if array.ncols() == 0 {
            return Err(StatsError::EmptyColumns);
        }
        Ok(Self(array))
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.0.nrows()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.0.ncols()
    }

    /// Returns `true` if the matrix has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    /// Borrows row `i`.
    ///
    /// # Panics
    /// If `i >= self.nrows()`.
    #[inline]
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.0.row(i)
    }

    /// Iterates over rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = ArrayView1<'_, f64>> + '_ {
        self.0.axis_iter(Axis(0))
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.0.view()
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.0
    }
}

impl TryFrom<Array2<f64>> for Matrix {
    type Error = StatsError;

    fn try_from(array: Array2<f64>) -> Result<Self, Self::Error> {
        Self::from_array(array)
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = StatsError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl AsRef<Array2<f64>> for Matrix {
    fn as_ref(&self) -> &Array2<f64> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_rows() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 2);
        assert_eq!(m.row(2).to_vec(), vec![5.0, 6.0]);
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            StatsError::RaggedRow {
                row: 1,
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_from_rows_empty() {
        assert_eq!(Matrix::from_rows(vec![]), Err(StatsError::EmptyColumns));
        assert_eq!(
            Matrix::from_rows(vec![vec![], vec![]]),
            Err(StatsError::EmptyColumns)
        );
    }

    #[test]
    fn test_from_optional_rows() {
        let m = Matrix::from_optional_rows(vec![vec![Some(1.0), None]]).unwrap();
        assert_eq!(m.row(0)[0], 1.0);
        assert!(m.row(0)[1].is_nan());
    }

    #[test]
    fn test_from_shape_vec_zero_rows() {
        let m = Matrix::from_shape_vec(0, 4, vec![]).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.ncols(), 4);
        assert_eq!(m.rows().len(), 0);
    }

    #[test]
    fn test_from_shape_vec_errors() {
        assert_eq!(
            Matrix::from_shape_vec(3, 0, vec![]),
            Err(StatsError::EmptyColumns)
        );
        assert_eq!(
            Matrix::from_shape_vec(2, 2, vec![1.0, 2.0, 3.0]),
            Err(StatsError::ShapeMismatch {
                rows: 2,
                cols: 2,
                len: 3
            })
        );
    }

    #[test]
    fn test_from_array() {
        let m = Matrix::try_from(array![[1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(m.view(), array![[1.0, 2.0, 3.0]]);

        let no_cols = Array2::<f64>::zeros((3, 0));
        assert_eq!(Matrix::from_array(no_cols), Err(StatsError::EmptyColumns));
    }

    #[test]
    fn test_rows_in_order() {
        let m = Matrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let firsts: Vec<f64> = m.rows().map(|r| r[0]).collect();
        assert_eq!(firsts, vec![1.0, 2.0, 3.0]);
    }
}
