//! Per-row reductions over a [`Matrix`].
//!
//! [`reduce_rows`] applies any scalar reduction (`&[f64] -> Option<f64>`)
//! to every row. It is the extension point for statistics beyond the
//! fixed summary: pass a closure or any function from [`crate::stats`].
//! [`try_reduce_rows`] is the fallible variant, for reductions that can
//! fail outright rather than report "undefined".
//!
//! [`row_medians`] is the specialized median reducer. It does *not* strip
//! missing values first: a row containing `NaN` has an undefined median.
//! For missing-aware medians use
//! `reduce_rows(m, MissingPolicy::Remove, stats::median)`.

use serde::{Deserialize, Serialize};

use crate::error::RowError;
use crate::matrix::Matrix;
use crate::missing::strip_missing;
use crate::stats;

/// How missing values are treated before a reduction sees a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Pass the raw row, missing markers included. Reductions in
    /// [`crate::stats`] then report `None` for any row with a `NaN`.
    #[default]
    Propagate,
    /// Strip missing markers first and reduce what remains.
    Remove,
}

impl MissingPolicy {
    /// Returns `true` for [`MissingPolicy::Remove`].
    pub fn removes_missing(self) -> bool {
        matches!(self, MissingPolicy::Remove)
    }

    /// Produces the working row for this policy.
    pub(crate) fn working_row<'a, I>(self, row: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a f64>,
    {
        match self {
            MissingPolicy::Propagate => row.into_iter().copied().collect(),
            MissingPolicy::Remove => strip_missing(row),
        }
    }
}

impl From<bool> for MissingPolicy {
    /// `true` means "handle missing values", i.e. [`MissingPolicy::Remove`].
    fn from(handle_missing: bool) -> Self {
        if handle_missing {
            MissingPolicy::Remove
        } else {
            MissingPolicy::Propagate
        }
    }
}

/// Applies `f` to every row of `matrix`, one output per row, in row order.
///
/// # Examples
/// ```
/// use u_rowstats::{reduce_rows, Matrix, MissingPolicy, MISSING};
/// use u_rowstats::stats;
///
/// let m = Matrix::from_rows(vec![vec![1.0, MISSING, 3.0], vec![4.0, 5.0, 6.0]])?;
///
/// let raw = reduce_rows(&m, MissingPolicy::Propagate, stats::mean);
/// assert_eq!(raw, vec![None, Some(5.0)]);
///
/// let cleaned = reduce_rows(&m, MissingPolicy::Remove, stats::mean);
/// assert_eq!(cleaned, vec![Some(2.0), Some(5.0)]);
/// # Ok::<(), u_rowstats::StatsError>(())
/// ```
pub fn reduce_rows<F>(matrix: &Matrix, policy: MissingPolicy, mut f: F) -> Vec<Option<f64>>
where
    F: FnMut(&[f64]) -> Option<f64>,
{
    tracing::debug!(
        rows = matrix.nrows(),
        cols = matrix.ncols(),
        ?policy,
        "reducing rows"
    );
    let mut out = Vec::with_capacity(matrix.nrows());
    for row in matrix.rows() {
        let working = policy.working_row(row);
        out.push(f(&working));
    }
    out
}

/// Fallible variant of [`reduce_rows`].
///
/// Rows are processed in order and the first failure stops processing.
///
/// # Errors
/// [`RowError`] carrying the index of the failing row and the error `f`
/// returned.
///
/// # Examples
/// ```
/// use u_rowstats::{try_reduce_rows, Matrix, MissingPolicy};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("row too short")]
/// struct TooShort;
///
/// let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
/// let err = try_reduce_rows(&m, MissingPolicy::Remove, |row| {
///     if row[0] > 2.0 { Err(TooShort) } else { Ok(Some(row[0])) }
/// })
/// .unwrap_err();
/// assert_eq!(err.row, 1);
/// # Ok::<(), u_rowstats::StatsError>(())
/// ```
pub fn try_reduce_rows<F, E>(
    matrix: &Matrix,
    policy: MissingPolicy,
    mut f: F,
) -> Result<Vec<Option<f64>>, RowError<E>>
where
    F: FnMut(&[f64]) -> Result<Option<f64>, E>,
    E: std::error::Error + 'static,
{
    tracing::debug!(
        rows = matrix.nrows(),
        cols = matrix.ncols(),
        ?policy,
        "reducing rows (fallible)"
    );
    let mut out = Vec::with_capacity(matrix.nrows());
    for (i, row) in matrix.rows().enumerate() {
        let working = policy.working_row(row);
        match f(&working) {
            Ok(value) => out.push(value),
            Err(source) => {
                tracing::warn!(row = i, error = %source, "row reduction failed");
                return Err(RowError::new(i, source));
            }
        }
    }
    Ok(out)
}

/// Median of every row, without filtering missing values.
///
/// Each row is fully sorted ascending; the result is the middle value, or
/// the mean of the two middle values for an even row length.
///
/// # Examples
/// ```
/// use u_rowstats::{row_medians, Matrix, MISSING};
///
/// let m = Matrix::from_rows(vec![vec![3.0, 1.0, 2.0, 10.0], vec![1.0, MISSING, 2.0, 3.0]])?;
/// assert_eq!(row_medians(&m), vec![Some(2.5), None]);
/// # Ok::<(), u_rowstats::StatsError>(())
/// ```
pub fn row_medians(matrix: &Matrix) -> Vec<Option<f64>> {
    reduce_rows(matrix, MissingPolicy::Propagate, stats::median)
}
