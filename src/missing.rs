//! Missing-value detection and filtering.
//!
//! The missing marker is IEEE-754 `NaN`. Any `NaN`, whatever its payload
//! or origin, is treated as missing; every other `f64` (including the
//! infinities) is data.

use std::borrow::Borrow;

/// The canonical missing marker.
pub const MISSING: f64 = f64::NAN;

/// Returns `true` if `x` is the missing marker.
///
/// # Examples
/// ```
/// use u_rowstats::missing::{is_missing, MISSING};
/// assert!(is_missing(MISSING));
/// assert!(!is_missing(f64::INFINITY));
/// ```
#[inline]
pub fn is_missing(x: f64) -> bool {
    x.is_nan()
}

/// Returns the non-missing values of `values`, preserving their order.
///
/// Accepts anything that iterates over `f64` or `&f64`: slices, vectors,
/// and ndarray views alike. The input is never modified.
///
/// # Complexity
/// Time: O(n), Space: O(n)
///
/// # Examples
/// ```
/// use u_rowstats::missing::{strip_missing, MISSING};
/// assert_eq!(strip_missing(&[3.0, MISSING, 1.0]), vec![3.0, 1.0]);
/// assert!(strip_missing(&[] as &[f64]).is_empty());
/// ```
pub fn strip_missing<I>(values: I) -> Vec<f64>
where
    I: IntoIterator,
    I::Item: Borrow<f64>,
{
    values
        .into_iter()
        .map(|x| *x.borrow())
        .filter(|x| !is_missing(*x))
        .collect()
}

/// Counts the missing values in `values`.
///
/// # Examples
/// ```
/// use u_rowstats::missing::{count_missing, MISSING};
/// assert_eq!(count_missing(&[MISSING, 2.0, MISSING]), 2);
/// ```
pub fn count_missing<I>(values: I) -> usize
where
    I: IntoIterator,
    I::Item: Borrow<f64>,
{
    values
        .into_iter()
        .filter(|x| is_missing(*x.borrow()))
        .count()
}
