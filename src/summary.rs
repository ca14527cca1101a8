//! The eight-column per-row summary table.
//!
//! For every row of a [`Matrix`], [`summarize_matrix`] produces one
//! [`SummaryRow`]:
//!
//! | column | computed over | undefined when |
//! |---|---|---|
//! | `mean` | working row | empty, or any NaN/Inf |
//! | `stdev` | working row (n − 1) | fewer than 2 values, or any NaN/Inf |
//! | `median` | working row | empty, or any NaN |
//! | `min`, `max` | working row | empty, or any NaN |
//! | `num_lt_0` | raw row | never |
//! | `num_btw_1_and_5` | raw row | never |
//! | `num_na` | raw row | never |
//!
//! The *working row* is the raw row with missing values stripped under
//! [`MissingPolicy::Remove`], and the raw row itself under
//! [`MissingPolicy::Propagate`]. The three counts always look at the raw
//! row, so they do not depend on the policy; missing values never count
//! as negative or in range.
//!
//! Rows are independent. The output is pre-sized and filled in input
//! order.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;
use crate::matrix::Matrix;
use crate::missing::{count_missing, strip_missing};
use crate::predicate::{in_open_interval, is_negative, OpenInterval};
use crate::reduce::MissingPolicy;
use crate::stats;

/// Column names of a [`SummaryTable`], in their fixed order.
pub const COLUMNS: [&str; 8] = [
    "mean",
    "stdev",
    "median",
    "min",
    "max",
    "num_lt_0",
    "num_btw_1_and_5",
    "num_na",
];

/// One column of a [`SummaryTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Mean,
    Stdev,
    Median,
    Min,
    Max,
    NumLt0,
    NumBtw1And5,
    NumNa,
}

impl Column {
    /// All columns in table order.
    pub const ALL: [Column; 8] = [
        Column::Mean,
        Column::Stdev,
        Column::Median,
        Column::Min,
        Column::Max,
        Column::NumLt0,
        Column::NumBtw1And5,
        Column::NumNa,
    ];

    /// Zero-based position of this column in the table.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        COLUMNS[self.index()]
    }

    /// `true` for the three integer count columns.
    pub fn is_count(self) -> bool {
        matches!(self, Column::NumLt0 | Column::NumBtw1And5 | Column::NumNa)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Summary of a single matrix row.
///
/// `None` marks an undefined statistic and serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub mean: Option<f64>,
    pub stdev: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub num_lt_0: usize,
    /// Count of raw values inside the configured open interval,
    /// `(1, 5)` by default.
    pub num_btw_1_and_5: usize,
    pub num_na: usize,
}

impl SummaryRow {
    /// Value of `column`, with counts widened to `f64`.
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Mean => self.mean,
            Column::Stdev => self.stdev,
            Column::Median => self.median,
            Column::Min => self.min,
            Column::Max => self.max,
            Column::NumLt0 => Some(self.num_lt_0 as f64),
            Column::NumBtw1And5 => Some(self.num_btw_1_and_5 as f64),
            Column::NumNa => Some(self.num_na as f64),
        }
    }
}

/// Per-row summaries, one per input row, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryTable {
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn get(&self, i: usize) -> Option<&SummaryRow> {
        self.rows.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SummaryRow> {
        self.rows.iter()
    }

    /// Extracts one column across all rows.
    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.get(column)).collect()
    }

    pub fn means(&self) -> Vec<Option<f64>> {
        self.column(Column::Mean)
    }

    pub fn stdevs(&self) -> Vec<Option<f64>> {
        self.column(Column::Stdev)
    }

    pub fn medians(&self) -> Vec<Option<f64>> {
        self.column(Column::Median)
    }

    pub fn mins(&self) -> Vec<Option<f64>> {
        self.column(Column::Min)
    }

    pub fn maxs(&self) -> Vec<Option<f64>> {
        self.column(Column::Max)
    }

    pub fn num_lt_0(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.num_lt_0).collect()
    }

    pub fn num_btw_1_and_5(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.num_btw_1_and_5).collect()
    }

    pub fn num_na(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.num_na).collect()
    }

    pub fn into_rows(self) -> Vec<SummaryRow> {
        self.rows
    }
}

impl Index<usize> for SummaryTable {
    type Output = SummaryRow;

    fn index(&self, i: usize) -> &SummaryRow {
        &self.rows[i]
    }
}

impl IntoIterator for SummaryTable {
    type Item = SummaryRow;
    type IntoIter = std::vec::IntoIter<SummaryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a SummaryTable {
    type Item = &'a SummaryRow;
    type IntoIter = std::slice::Iter<'a, SummaryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 16;

        write!(f, "{:>6}", "row")?;
        for name in COLUMNS {
            write!(f, " {name:>WIDTH$}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(6 + COLUMNS.len() * (WIDTH + 1)))?;

        for (i, row) in self.rows.iter().enumerate() {
            write!(f, "{i:>6}")?;
            for column in Column::ALL {
                match row.get(column) {
                    None => write!(f, " {:>WIDTH$}", "NA")?,
                    Some(v) if column.is_count() => write!(f, " {:>WIDTH$}", v as usize)?,
                    Some(v) if needs_exponent(v) => write!(f, " {v:>WIDTH$.6e}")?,
                    Some(v) => write!(f, " {v:>WIDTH$.6}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fixed notation overflows a 16-wide cell past 1e8 and prints tiny
/// values as zero.
fn needs_exponent(v: f64) -> bool {
    v.is_finite() && (v.abs() >= 1e8 || (v != 0.0 && v.abs() < 1e-4))
}

/// Summarizer configuration.
///
/// # Examples
/// ```
/// use u_rowstats::{MissingPolicy, OpenInterval, SummaryConfig};
///
/// let config = SummaryConfig::new()
///     .missing(MissingPolicy::Remove)
///     .interval(OpenInterval::new(0.0, 10.0)?);
/// assert!(config.validate().is_ok());
/// # Ok::<(), u_rowstats::StatsError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Missing-value handling for the five continuous statistics.
    pub missing: MissingPolicy,
    /// Bounds of the range count column.
    pub interval: OpenInterval,
}

impl SummaryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing(mut self, policy: MissingPolicy) -> Self {
        self.missing = policy;
        self
    }

    /// Shorthand for `missing(MissingPolicy::from(handle_missing))`.
    pub fn handle_missing(self, handle_missing: bool) -> Self {
        self.missing(MissingPolicy::from(handle_missing))
    }

    pub fn interval(mut self, interval: OpenInterval) -> Self {
        self.interval = interval;
        self
    }

    /// Checks invariants a deserialized config may violate.
    pub fn validate(&self) -> Result<(), StatsError> {
        self.interval.validate()
    }
}

/// Summarizes every row of `matrix`.
///
/// `handle_missing = true` strips missing values before the five
/// continuous statistics are computed; `false` lets a single missing value
/// make them undefined. The range count uses the open interval `(1, 5)`.
///
/// # Examples
/// ```
/// use u_rowstats::{summarize_matrix, Matrix};
///
/// let m = Matrix::from_rows(vec![
///     vec![1.0, 2.0, 3.0],
///     vec![4.0, 5.0, 6.0],
///     vec![7.0, 8.0, 9.0],
/// ])?;
/// let table = summarize_matrix(&m, false);
/// assert_eq!(table.means(), vec![Some(2.0), Some(5.0), Some(8.0)]);
/// assert_eq!(table.medians(), vec![Some(2.0), Some(5.0), Some(8.0)]);
/// assert_eq!(table.mins(), vec![Some(1.0), Some(4.0), Some(7.0)]);
/// assert_eq!(table.maxs(), vec![Some(3.0), Some(6.0), Some(9.0)]);
/// # Ok::<(), u_rowstats::StatsError>(())
/// ```
pub fn summarize_matrix(matrix: &Matrix, handle_missing: bool) -> SummaryTable {
    summarize_validated(matrix, &SummaryConfig::new().handle_missing(handle_missing))
}

/// Summarizes every row of `matrix` under an explicit configuration.
///
/// # Errors
/// [`StatsError::InvalidInterval`] if `config` fails validation.
pub fn summarize_matrix_with(
    matrix: &Matrix,
    config: &SummaryConfig,
) -> Result<SummaryTable, StatsError> {
    config.validate()?;
    Ok(summarize_validated(matrix, config))
}

fn summarize_validated(matrix: &Matrix, config: &SummaryConfig) -> SummaryTable {
    tracing::debug!(
        rows = matrix.nrows(),
        cols = matrix.ncols(),
        policy = ?config.missing,
        lower = config.interval.lower,
        upper = config.interval.upper,
        "summarizing matrix"
    );
    let mut rows = Vec::with_capacity(matrix.nrows());
    for (i, row) in matrix.rows().enumerate() {
        let summary = summarize_row(row, config);
        tracing::trace!(row = i, num_na = summary.num_na, "row summarized");
        rows.push(summary);
    }
    SummaryTable { rows }
}

/// Summarizes a single row.
///
/// Accepts a slice, a vector, or an ndarray row view. `config` is assumed
/// valid; see [`SummaryConfig::validate`].
///
/// # Examples
/// ```
/// use u_rowstats::{summarize_row, SummaryConfig, MISSING};
///
/// let config = SummaryConfig::new().handle_missing(true);
/// let row = summarize_row(&[MISSING, 2.0, -1.0], &config);
/// assert_eq!(row.mean, Some(0.5));
/// assert_eq!(row.num_na, 1);
/// assert_eq!(row.num_lt_0, 1);
/// assert_eq!(row.num_btw_1_and_5, 1);
/// ```
pub fn summarize_row<'a, I>(row: I, config: &SummaryConfig) -> SummaryRow
where
    I: IntoIterator<Item = &'a f64>,
{
    let raw: Vec<f64> = row.into_iter().copied().collect();

    let num_na = count_missing(&raw);

    let stripped;
    let working: &[f64] = match config.missing {
        MissingPolicy::Remove if num_na > 0 => {
            stripped = strip_missing(&raw);
            &stripped
        }
        _ => &raw,
    };

    let interval = config.interval;
    SummaryRow {
        mean: stats::mean(working),
        stdev: stats::std_dev(working),
        median: stats::median(working),
        min: stats::min(working),
        max: stats::max(working),
        num_lt_0: count_true(is_negative(raw.as_slice())),
        num_btw_1_and_5: count_true(in_open_interval(
            raw.as_slice(),
            interval.lower,
            interval.upper,
        )),
        num_na,
    }
}

fn count_true(flags: Vec<bool>) -> usize {
    flags.into_iter().filter(|&b| b).count()
}
