//! Dense row-major integer matrix.

use std::fmt;

use crate::Error;

/// Element type stored in a [`Matrix`].
pub type Element = i32;

/// A rectangular grid of integers stored row-major.
///
/// Every matrix carries an identity tag. Freshly built matrices are tagged
/// `0`; the producer that publishes a matrix retags it with
/// [`Matrix::with_id`] so that each matrix of a run is distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    id: u64,
    rows: usize,
    cols: usize,
    data: Vec<Element>,
}

impl Matrix {
    /// Builds a matrix from row-major element storage.
    ///
    /// Fails with [`Error::InvalidShape`] when either dimension is zero or
    /// when `data` does not hold exactly `rows * cols` elements.
    pub fn new(rows: usize, cols: usize, data: Vec<Element>) -> Result<Self, Error> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(Error::InvalidShape(rows, cols));
        }
        Ok(Self {
            id: 0,
            rows,
            cols,
            data,
        })
    }

    /// Shape is checked by the caller.
    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<Element>) -> Self {
        debug_assert!(rows > 0 && cols > 0 && data.len() == rows * cols);
        Self {
            id: 0,
            rows,
            cols,
            data,
        }
    }

    /// Builds a matrix from a list of rows, rejecting empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<Element>>) -> Result<Self, Error> {
        let m = rows.len();
        let n = rows.first().map_or(0, |row| row.len());
        if m == 0 || n == 0 {
            return Err(Error::InvalidShape(m, n));
        }

        let mut data = Vec::with_capacity(m * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(Error::Ragged {
                    row: i,
                    len: row.len(),
                    expected: n,
                });
            }
            data.extend(row);
        }

        Self::new(m, n, data)
    }

    /// Returns the matrix retagged with `id`.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns element `(i, j)`, or `None` when out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<Element> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    /// Iterates over the rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Element]> {
        self.data.chunks(self.cols)
    }

    /// Sum of every element, widened so large runs cannot overflow.
    pub fn sum(&self) -> i64 {
        self.data.iter().map(|&v| i64::from(v)).sum()
    }

    /// Returns `true` when `self × rhs` is defined.
    pub fn can_multiply(&self, rhs: &Matrix) -> bool {
        self.cols == rhs.rows
    }

    /// Computes `self × rhs`.
    ///
    /// The product is `self.rows() × rhs.cols()` with
    /// `C[i][j] = Σ_k self[i][k] · rhs[k][j]`. Fails with
    /// [`Error::DimensionMismatch`] when `self.cols() != rhs.rows()`, and with
    /// [`Error::Overflow`] when an element of the product does not fit in
    /// [`Element`].
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix, Error> {
        if !self.can_multiply(rhs) {
            return Err(Error::DimensionMismatch(
                self.rows, self.cols, rhs.rows, rhs.cols,
            ));
        }

        let (m, n, p) = (self.rows, self.cols, rhs.cols);
        let mut data: Vec<Element> = vec![0; m * p];
        for i in 0..m {
            for k in 0..n {
                let a = self.data[i * n + k];
                for j in 0..p {
                    let at = i * p + j;
                    data[at] = a
                        .checked_mul(rhs.data[k * p + j])
                        .and_then(|term| data[at].checked_add(term))
                        .ok_or(Error::Overflow { row: i, col: j })?;
                }
            }
        }

        Ok(Self::from_parts(m, p, data))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            write!(f, "|")?;
            for value in row {
                write!(f, "{:>3} ", value)?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
