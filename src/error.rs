//! Error types for matrix construction and row reductions.
//!
//! Undefined statistics (an empty working row, `stdev` on a single value)
//! are never errors: they surface as `None` inside the summary table.
//! Only malformed input and failures of caller-supplied reductions are
//! reported through these types.

/// Malformed input rejected before any statistic is computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("matrix must have at least one column")]
    EmptyColumns,

    #[error("ragged matrix: row {row} has {got} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("data length {len} does not match shape {rows}x{cols}")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },

    #[error("invalid open interval ({lower}, {upper}): bounds must be finite with lower < upper")]
    InvalidInterval { lower: f64, upper: f64 },
}

/// Failure of a caller-supplied reduction, attributed to the row it failed on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("reduction failed on row {row}")]
pub struct RowError<E: std::error::Error + 'static> {
    /// Zero-based index of the offending row.
    pub row: usize,
    #[source]
    pub source: E,
}

impl<E: std::error::Error + 'static> RowError<E> {
    pub fn new(row: usize, source: E) -> Self {
        Self { row, source }
    }

    /// Discards the row attribution and returns the underlying error.
    pub fn into_inner(self) -> E {
        self.source
    }
}
