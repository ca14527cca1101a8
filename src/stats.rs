//! Scalar reductions over one working row.
//!
//! Each function maps `&[f64]` to `Option<f64>`, and `None` is the only
//! way a statistic reports "undefined". A result is never `Some(NaN)`.
//! Any `NaN` (the crate's missing marker) left in the input makes every
//! statistic undefined, so a row that still carries missing values
//! propagates its missingness instead of producing a wrong number.
//!
//! These are the reductions the summarizer plugs into
//! [`crate::reduce::reduce_rows`], and any of them can be passed there
//! directly.
//!
//! # Infinities and overflow
//!
//! Infinite values are data, not missing markers:
//!
//! - [`mean`] is `±inf` when all infinities share a sign, and undefined
//!   when both signs occur.
//! - [`min`], [`max`] and [`median`] order infinities like any value.
//! - [`variance`] and [`std_dev`] are undefined for rows with an infinity.
//!
//! Finite rows whose intermediate sums overflow are rescaled before
//! reducing. A spread that is genuinely outside `f64` range is reported
//! as undefined.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier-compensated summation, rescaled by `1/n` on overflow.
//! - **Variance/StdDev**: Welford (1962), *Technometrics* 4(3), with
//!   Bessel's correction. Rows with overflowing squared deviations are
//!   divided by their largest magnitude first.
//! - **Median**: full ascending sort, middle element or midpoint of the
//!   two middle elements.

use std::cmp::Ordering;

/// Arithmetic mean of a working row.
///
/// # Returns
/// - `None` if `data` is empty, contains NaN, or holds both `+inf` and `-inf`.
/// - `Some(±inf)` if every infinite value has the same sign.
///
/// # Examples
/// ```
/// use u_rowstats::stats::mean;
/// assert_eq!(mean(&[4.0, 5.0, 6.0]), Some(5.0));
/// assert_eq!(mean(&[f64::MAX, f64::MAX]), Some(f64::MAX));
/// assert_eq!(mean(&[f64::NEG_INFINITY, 2.0]), Some(f64::NEG_INFINITY));
/// assert_eq!(mean(&[f64::NEG_INFINITY, f64::INFINITY]), None);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || data.iter().any(|x| x.is_nan()) {
        return None;
    }

    let has_pos_inf = data.contains(&f64::INFINITY);
    let has_neg_inf = data.contains(&f64::NEG_INFINITY);
    match (has_pos_inf, has_neg_inf) {
        (true, true) => return None,
        (true, false) => return Some(f64::INFINITY),
        (false, true) => return Some(f64::NEG_INFINITY),
        (false, false) => {}
    }

    let n = data.len() as f64;
    let total = kahan_sum(data);
    if total.is_finite() {
        return Some(total / n);
    }
    // Overflowed partial sums: each x/n is finite and so is their sum.
    let scaled = compensated_sum(data.iter().map(|&x| x / n));
    scaled.is_finite().then_some(scaled)
}

/// Sample variance of a working row, denominator `n − 1`.
///
/// # Returns
/// - `None` for fewer than 2 values, any NaN or infinity, or a variance
///   beyond `f64::MAX`.
///
/// # Examples
/// ```
/// use u_rowstats::stats::variance;
/// assert_eq!(variance(&[1.0, 2.0, 3.0]), Some(1.0));
/// assert_eq!(variance(&[7.0]), None);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    let (scale, scaled_var) = scaled_variance(data)?;
    let var = scaled_var * scale * scale;
    var.is_finite().then_some(var)
}

/// Sample standard deviation of a working row.
///
/// Computed on the rescaled row, so a finite deviation is returned even
/// when the variance itself would overflow.
///
/// # Returns
/// - `None` under the same conditions as [`variance`], or when the
///   deviation itself exceeds `f64::MAX`.
///
/// # Examples
/// ```
/// use u_rowstats::stats::std_dev;
/// assert_eq!(std_dev(&[2.0, 4.0]), Some(2.0_f64.sqrt()));
/// assert!(std_dev(&[f64::MAX, 0.0]).is_some());
/// ```
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let (scale, scaled_var) = scaled_variance(data)?;
    let sd = scaled_var.sqrt() * scale;
    sd.is_finite().then_some(sd)
}

/// Returns `(s, var(x / s))`, with `s` the largest magnitude when the
/// unscaled pass overflows and `1.0` otherwise.
fn scaled_variance(data: &[f64]) -> Option<(f64, f64)> {
    if data.len() < 2 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let direct: WelfordAccumulator = data.iter().copied().collect();
    if let Some(var) = direct.sample_variance().filter(|v| v.is_finite()) {
        return Some((1.0, var));
    }
    let scale = data.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    let rescaled: WelfordAccumulator = data.iter().map(|&x| x / scale).collect();
    rescaled
        .sample_variance()
        .filter(|v| v.is_finite())
        .map(|v| (scale, v))
}

/// Smallest value of a working row. Infinities order normally.
///
/// # Returns
/// `None` if `data` is empty or contains NaN.
///
/// # Examples
/// ```
/// use u_rowstats::stats::min;
/// assert_eq!(min(&[0.5, -3.0, f64::INFINITY]), Some(-3.0));
/// ```
pub fn min(data: &[f64]) -> Option<f64> {
    extremum(data, f64::min)
}

/// Largest value of a working row.
///
/// # Returns
/// `None` if `data` is empty or contains NaN.
///
/// # Examples
/// ```
/// use u_rowstats::stats::max;
/// assert_eq!(max(&[0.5, -3.0, 2.25]), Some(2.25));
/// ```
pub fn max(data: &[f64]) -> Option<f64> {
    extremum(data, f64::max)
}

fn extremum(data: &[f64], pick: fn(f64, f64) -> f64) -> Option<f64> {
    let (&first, rest) = data.split_first()?;
    if first.is_nan() {
        return None;
    }
    rest.iter()
        .try_fold(first, |acc, &x| (!x.is_nan()).then(|| pick(acc, x)))
}

/// Median of a working row, leaving `data` untouched.
///
/// Sorts a copy ascending (O(n log n)) and takes the middle element, or
/// the midpoint of the two middle elements for an even length.
///
/// # Returns
/// `None` if `data` is empty or contains NaN.
///
/// # Examples
/// ```
/// use u_rowstats::stats::median;
/// assert_eq!(median(&[9.0, -1.0, 4.0]), Some(4.0));
/// assert_eq!(median(&[9.0, -1.0, 4.0, 0.0]), Some(2.0));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    if data.iter().any(|x| x.is_nan()) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    median_sorted(&sorted)
}

/// Median of data already sorted in non-decreasing order.
///
/// The caller guarantees ordering; no NaN check is made.
pub fn median_sorted(sorted_data: &[f64]) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        return Some(sorted_data[n / 2]);
    }
    let (lo, hi) = (sorted_data[n / 2 - 1], sorted_data[n / 2]);
    if lo == hi {
        return Some(lo);
    }
    // Halve before adding so two huge finite values cannot overflow.
    let mid = lo / 2.0 + hi / 2.0;
    (!mid.is_nan()).then_some(mid)
}

/// Neumaier-compensated sum of a slice.
///
/// Recovers the low-order bits a naive running sum drops, including when
/// an addend dwarfs the running total. Reference: Neumaier (1974),
/// *ZAMM* 54(1), pp. 39–51.
///
/// Overflow is not handled here: [`mean`] checks the result and rescales.
pub fn kahan_sum(data: &[f64]) -> f64 {
    compensated_sum(data.iter().copied())
}

fn compensated_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, compensation) = values.into_iter().fold((0.0_f64, 0.0_f64), |(sum, c), x| {
        let t = sum + x;
        let lost = if sum.abs() >= x.abs() {
            (sum - t) + x
        } else {
            (x - t) + sum
        };
        (t, c + lost)
    });
    sum + compensation
}

/// Streaming mean and variance accumulator (Welford).
///
/// Single pass, O(1) memory. It does not inspect its input: NaN/Inf
/// guarding and overflow rescaling live in [`variance`] and [`std_dev`].
///
/// # Examples
/// ```
/// use u_rowstats::stats::WelfordAccumulator;
/// let acc: WelfordAccumulator = [1.0, 2.0, 3.0, 4.0].into_iter().collect();
/// assert_eq!(acc.count(), 4);
/// assert_eq!(acc.mean(), Some(2.5));
/// assert!((acc.sample_variance().unwrap() - 5.0 / 3.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one sample.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean, `None` before the first sample.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean_acc)
    }

    /// Sample variance (n − 1), `None` before the second sample.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

impl FromIterator<f64> for WelfordAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        for x in iter {
            acc.update(x);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missing::{strip_missing, MISSING};

    const ROW: [f64; 5] = [3.0, -1.0, 4.0, 1.0, 5.0];

    // --- degenerate rows ---

    #[test]
    fn test_empty_row_is_undefined_everywhere() {
        assert_eq!(mean(&[]), None);
        assert_eq!(variance(&[]), None);
        assert_eq!(std_dev(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn test_single_value_row() {
        let row = [-2.5];
        assert_eq!(mean(&row), Some(-2.5));
        assert_eq!(median(&row), Some(-2.5));
        assert_eq!(min(&row), Some(-2.5));
        assert_eq!(max(&row), Some(-2.5));
        assert_eq!(std_dev(&row), None);
    }

    #[test]
    fn test_missing_marker_poisons_row() {
        let row = [3.0, MISSING, 4.0];
        assert_eq!(mean(&row), None);
        assert_eq!(std_dev(&row), None);
        assert_eq!(median(&row), None);
        assert_eq!(min(&row), None);
        assert_eq!(max(&row), None);
    }

    #[test]
    fn test_missing_marker_first_or_last() {
        assert_eq!(min(&[MISSING, 1.0]), None);
        assert_eq!(max(&[1.0, MISSING]), None);
    }

    #[test]
    fn test_stripped_row_is_defined() {
        let working = strip_missing(&[MISSING, 6.0, MISSING, 2.0]);
        assert_eq!(mean(&working), Some(4.0));
        assert_eq!(median(&working), Some(4.0));
        assert_eq!(variance(&working), Some(8.0));
    }

    // --- ordinary rows ---

    #[test]
    fn test_row_statistics() {
        assert_eq!(mean(&ROW), Some(2.4));
        assert_eq!(median(&ROW), Some(3.0));
        assert_eq!(min(&ROW), Some(-1.0));
        assert_eq!(max(&ROW), Some(5.0));
        // deviations from 2.4: 0.6, -3.4, 1.6, -1.4, 2.6 -> squares sum 23.2
        let var = variance(&ROW).unwrap();
        assert!((var - 5.8).abs() < 1e-12, "got {var}");
        assert!((std_dev(&ROW).unwrap() - 5.8_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_even_row_median_with_ties() {
        assert_eq!(median(&[2.0, 1.0, 2.0, 7.0]), Some(2.0));
        assert_eq!(median(&[5.0, 5.0]), Some(5.0));
    }

    #[test]
    fn test_constant_row_has_zero_spread() {
        let row = [0.1; 64];
        assert!(variance(&row).unwrap().abs() < 1e-15);
    }

    #[test]
    fn test_offset_row_keeps_precision() {
        let row: Vec<f64> = (1..=5).map(|i| 1e9 + i as f64).collect();
        let var = variance(&row).unwrap();
        assert!((var - 2.5).abs() < 1e-5, "got {var}");
    }

    #[test]
    fn test_compensated_sum_keeps_small_addend() {
        assert_eq!(kahan_sum(&[1e16, 1.0, -1e16]), 1.0);
        assert_eq!(mean(&[1e16, 1.0, -1e16]), Some(1.0 / 3.0));
    }

    // --- overflow ---

    #[test]
    fn test_mean_of_max_values() {
        assert_eq!(mean(&[f64::MAX, f64::MAX]), Some(f64::MAX));
        assert_eq!(mean(&[f64::MAX, f64::MAX, -f64::MAX]), Some(f64::MAX / 3.0));
        assert_eq!(mean(&[f64::MAX, -f64::MAX]), Some(0.0));
    }

    #[test]
    fn test_spread_of_max_values() {
        assert_eq!(variance(&[f64::MAX, f64::MAX]), Some(0.0));
        // variance 2·MAX² and deviation √2·MAX both leave f64 range
        assert_eq!(variance(&[f64::MAX, -f64::MAX]), None);
        assert_eq!(std_dev(&[f64::MAX, -f64::MAX]), None);
        // variance MAX²/2 overflows, the deviation MAX/√2 does not
        assert_eq!(variance(&[f64::MAX, 0.0]), None);
        let sd = std_dev(&[f64::MAX, 0.0]).unwrap();
        assert!((sd / f64::MAX - 0.5_f64.sqrt()).abs() < 1e-12, "got {sd}");
    }

    #[test]
    fn test_median_of_max_values() {
        assert_eq!(median(&[f64::MAX, f64::MAX]), Some(f64::MAX));
        assert_eq!(median(&[f64::MAX, -f64::MAX]), Some(0.0));
    }

    // --- infinities ---

    #[test]
    fn test_mean_with_one_signed_infinity() {
        assert_eq!(mean(&[f64::NEG_INFINITY, 2.0]), Some(f64::NEG_INFINITY));
        assert_eq!(
            mean(&[f64::INFINITY, f64::INFINITY, -7.0]),
            Some(f64::INFINITY)
        );
    }

    #[test]
    fn test_mean_with_mixed_infinities() {
        assert_eq!(mean(&[f64::INFINITY, 0.0, f64::NEG_INFINITY]), None);
    }

    #[test]
    fn test_infinities_order_normally() {
        let row = [f64::NEG_INFINITY, 2.0, f64::INFINITY];
        assert_eq!(min(&row), Some(f64::NEG_INFINITY));
        assert_eq!(max(&row), Some(f64::INFINITY));
        assert_eq!(median(&row), Some(2.0));
        assert_eq!(median(&[f64::NEG_INFINITY, 2.0]), Some(f64::NEG_INFINITY));
        // midpoint of -inf and +inf has no value
        assert_eq!(median(&[f64::NEG_INFINITY, f64::INFINITY]), None);
        assert_eq!(median(&[f64::INFINITY, f64::INFINITY]), Some(f64::INFINITY));
    }

    #[test]
    fn test_spread_with_infinity_is_undefined() {
        assert_eq!(variance(&[f64::INFINITY, 1.0]), None);
        assert_eq!(std_dev(&[1.0, f64::NEG_INFINITY, 2.0]), None);
    }

    // --- WelfordAccumulator ---

    #[test]
    fn test_welford_empty_and_single() {
        let mut acc = WelfordAccumulator::new();
        assert_eq!(acc.mean(), None);
        acc.update(8.0);
        assert_eq!(acc.mean(), Some(8.0));
        assert_eq!(acc.sample_std_dev(), None);
    }

    #[test]
    fn test_welford_agrees_with_variance() {
        let acc: WelfordAccumulator = ROW.iter().copied().collect();
        assert_eq!(acc.count(), 5);
        assert!((acc.sample_variance().unwrap() - variance(&ROW).unwrap()).abs() < 1e-12);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-1e6_f64..1e6, min_len..=max_len)
    }

    fn any_value() -> impl Strategy<Value = f64> {
        prop_oneof![
            6 => -1e6_f64..1e6,
            1 => Just(f64::MAX),
            1 => Just(-f64::MAX),
            1 => Just(f64::INFINITY),
            1 => Just(f64::NEG_INFINITY),
            1 => Just(f64::NAN),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn variance_non_negative(data in finite_vec(2, 100)) {
            let var = variance(&data).unwrap();
            prop_assert!(var >= 0.0, "variance must be >= 0, got {}", var);
        }

        #[test]
        fn std_dev_is_sqrt_of_variance(data in finite_vec(2, 100)) {
            let var = variance(&data).unwrap();
            let sd = std_dev(&data).unwrap();
            prop_assert!((sd * sd - var).abs() < 1e-8 * var.max(1.0));
        }

        #[test]
        fn median_between_min_and_max(data in finite_vec(1, 100)) {
            let med = median(&data).unwrap();
            prop_assert!(min(&data).unwrap() <= med);
            prop_assert!(med <= max(&data).unwrap());
        }

        #[test]
        fn mean_between_min_and_max(data in finite_vec(1, 100)) {
            let m = mean(&data).unwrap();
            let tol = 1e-9 * m.abs().max(1.0);
            prop_assert!(min(&data).unwrap() - tol <= m);
            prop_assert!(m <= max(&data).unwrap() + tol);
        }

        #[test]
        fn median_ignores_order(mut data in finite_vec(1, 60)) {
            let before = median(&data);
            data.reverse();
            prop_assert_eq!(before, median(&data));
        }

        #[test]
        fn nan_poisons_every_statistic(data in finite_vec(2, 40), at in 0_usize..40) {
            let mut data = data;
            let idx = at % data.len();
            data[idx] = f64::NAN;
            prop_assert_eq!(mean(&data), None);
            prop_assert_eq!(std_dev(&data), None);
            prop_assert_eq!(median(&data), None);
            prop_assert_eq!(min(&data), None);
            prop_assert_eq!(max(&data), None);
        }

        #[test]
        fn defined_results_are_never_nan(data in proptest::collection::vec(any_value(), 0..12)) {
            for value in [
                mean(&data),
                variance(&data),
                std_dev(&data),
                median(&data),
                min(&data),
                max(&data),
            ]
            .into_iter()
            .flatten()
            {
                prop_assert!(!value.is_nan(), "statistic returned NaN for {:?}", data);
            }
        }
    }
}
