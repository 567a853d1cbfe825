//! Error types for matrix-mul operations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("matrix dimension mismatch: A is {0}x{1}, B is {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),

    #[error("invalid matrix shape: {0}x{1}")]
    InvalidShape(usize, usize),

    #[error("element ({row}, {col}) of the product overflows")]
    Overflow { row: usize, col: usize },

    #[error("square side {0} exceeds the maximum of {max}", max = crate::MAX_SQUARE_SIDE)]
    SideTooLarge(usize),

    #[error("ragged rows: row {row} has {len} columns, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}
