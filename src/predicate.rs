//! Shape-preserving elementwise predicates.
//!
//! A predicate maps every element of its input to a `bool` and returns a
//! container of the same shape: a scalar gives a `bool`, a slice or vector
//! gives a `Vec<bool>`, and an ndarray of any dimension gives an
//! `Array<bool, D>` with identical shape.
//!
//! # Missing values
//!
//! Comparisons follow IEEE-754: any ordered comparison involving `NaN` is
//! `false`. Missing values therefore never satisfy [`is_negative`] or
//! [`in_open_interval`]. This falls out of the native semantics and is not
//! special-cased.

use ndarray::{Array, ArrayBase, Data, Dimension};
use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Containers whose elements can be mapped through a scalar predicate.
pub trait Elementwise {
    /// Result of mapping every element to `bool`, with the input's shape.
    type Output;

    fn map_predicate<F: Fn(f64) -> bool>(&self, pred: F) -> Self::Output;
}

impl Elementwise for f64 {
    type Output = bool;

    fn map_predicate<F: Fn(f64) -> bool>(&self, pred: F) -> bool {
        pred(*self)
    }
}

impl Elementwise for [f64] {
    type Output = Vec<bool>;

    fn map_predicate<F: Fn(f64) -> bool>(&self, pred: F) -> Vec<bool> {
        self.iter().map(|&x| pred(x)).collect()
    }
}

impl Elementwise for Vec<f64> {
    type Output = Vec<bool>;

    fn map_predicate<F: Fn(f64) -> bool>(&self, pred: F) -> Vec<bool> {
        self.as_slice().map_predicate(pred)
    }
}

impl<const N: usize> Elementwise for [f64; N] {
    type Output = [bool; N];

    fn map_predicate<F: Fn(f64) -> bool>(&self, pred: F) -> [bool; N] {
        (*self).map(pred)
    }
}

impl<S, D> Elementwise for ArrayBase<S, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    type Output = Array<bool, D>;

    fn map_predicate<F: Fn(f64) -> bool>(&self, pred: F) -> Array<bool, D> {
        self.mapv(pred)
    }
}

/// Elementwise `x < 0`.
///
/// # Examples
/// ```
/// use u_rowstats::predicate::is_negative;
/// assert!(is_negative(&-0.5_f64));
/// assert_eq!(
///     is_negative(&[-1.0, 0.0, 1.0, 2.0, 3.0, 4.0][..]),
///     vec![true, false, false, false, false, false]
/// );
/// ```
pub fn is_negative<T: Elementwise + ?Sized>(x: &T) -> T::Output {
    x.map_predicate(|v| v < 0.0)
}

/// Elementwise `a < x < b`. Both endpoints are excluded.
///
/// # Examples
/// ```
/// use u_rowstats::predicate::in_open_interval;
/// assert_eq!(
///     in_open_interval(&[1.0, 9.0, 5.0, 2.0][..], 1.0, 5.0),
///     vec![false, false, false, true]
/// );
/// ```
pub fn in_open_interval<T: Elementwise + ?Sized>(x: &T, a: f64, b: f64) -> T::Output {
    x.map_predicate(|v| a < v && v < b)
}

/// A validated open interval `(lower, upper)`.
///
/// Used as the summarizer's range-count configuration. Construct through
/// [`OpenInterval::new`] to get bound checking; a deserialized value is
/// checked by [`OpenInterval::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenInterval {
    pub lower: f64,
    pub upper: f64,
}

impl OpenInterval {
    pub fn new(lower: f64, upper: f64) -> Result<Self, StatsError> {
        let interval = Self { lower, upper };
        interval.validate()?;
        Ok(interval)
    }

    /// Rejects non-finite bounds and empty intervals (`lower >= upper`).
    pub fn validate(&self) -> Result<(), StatsError> {
        if self.lower.is_finite() && self.upper.is_finite() && self.lower < self.upper {
            Ok(())
        } else {
            Err(StatsError::InvalidInterval {
                lower: self.lower,
                upper: self.upper,
            })
        }
    }

    /// Returns `true` iff `lower < x < upper`. `NaN` is never contained.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lower < x && x < self.upper
    }
}

impl Default for OpenInterval {
    fn default() -> Self {
        Self {
            lower: 1.0,
            upper: 5.0,
        }
    }
}
