//! # u-rowstats
//!
//! Row-wise descriptive statistics for the U-Engine ecosystem.
//!
//! This crate turns a numeric matrix (with `NaN` as the missing marker)
//! into a per-row summary table: mean, standard deviation, median,
//! minimum, maximum, and three counts (negatives, values inside an open
//! interval, missing cells). It knows nothing about where the matrix
//! came from or how the table is rendered.
//!
//! ## Modules
//!
//! - [`stats`]: Scalar descriptive statistics with numerical stability guarantees
//! - [`predicate`]: Shape-preserving elementwise predicates
//! - [`missing`]: Missing-value detection and filtering
//! - [`matrix`]: Validated rectangular matrix type
//! - [`reduce`]: Pluggable per-row reductions and row medians
//! - [`summary`]: The eight-column per-row summary table
//!
//! ## Quick Start
//!
//! ```
//! use u_rowstats::{summarize_matrix, Matrix, MISSING};
//!
//! let m = Matrix::from_rows(vec![
//!     vec![1.0, 2.0, 3.0],
//!     vec![-4.0, MISSING, 6.0],
//! ])?;
//!
//! let table = summarize_matrix(&m, true);
//! assert_eq!(table.len(), 2);
//! assert_eq!(table[0].mean, Some(2.0));
//! assert_eq!(table[1].num_na, 1);
//! assert_eq!(table[1].num_lt_0, 1);
//! # Ok::<(), u_rowstats::StatsError>(())
//! ```
//!
//! ## Design Philosophy
//!
//! - **Pure transformations**: no operation mutates its input or keeps state
//! - **Explicit missingness**: every statistic returns `None` instead of
//!   silently propagating `NaN`
//! - **Numerical stability first**: Welford's algorithm for variance,
//!   Kahan summation for accumulation
//! - **Property-based testing**: invariants verified via proptest

pub mod error;
pub mod matrix;
pub mod missing;
pub mod predicate;
pub mod reduce;
pub mod stats;
pub mod summary;

pub use error::{RowError, StatsError};
pub use matrix::Matrix;
pub use missing::{count_missing, is_missing, strip_missing, MISSING};
pub use predicate::{in_open_interval, is_negative, Elementwise, OpenInterval};
pub use reduce::{reduce_rows, row_medians, try_reduce_rows, MissingPolicy};
pub use summary::{
    summarize_matrix, summarize_matrix_with, summarize_row, Column, SummaryConfig, SummaryRow,
    SummaryTable, COLUMNS,
};
