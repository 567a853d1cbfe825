//! Hooks for observing consumed and multiplied matrices.

use std::io::{self, Write};

use matrix_mul::Matrix;

/// Receives the results of consumer work.
///
/// [`multiplied`](Self::multiplied) is called after the consumer releases
/// the buffer lock, so it may block on I/O without stalling the pipeline.
/// [`consumed`](Self::consumed) runs while the lock is held and must stay
/// cheap.
pub trait Reporter: Send + Sync {
    /// A successful multiplication `lhs × rhs = product`.
    fn multiplied(&self, lhs: &Matrix, rhs: &Matrix, product: &Matrix);

    /// A matrix removed from the buffer, whether or not it was multiplied.
    fn consumed(&self, _matrix: &Matrix) {}
}

/// Writes every multiplication to stdout as a `x` / `=` block.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    fn write_block(
        out: &mut impl Write,
        lhs: &Matrix,
        rhs: &Matrix,
        product: &Matrix,
    ) -> io::Result<()> {
        write!(out, "{lhs}")?;
        writeln!(out, "    x ")?;
        write!(out, "{rhs}")?;
        writeln!(out, "    = ")?;
        write!(out, "{product}")?;
        writeln!(out)?;
        out.flush()
    }
}

impl Reporter for ConsoleReporter {
    fn multiplied(&self, lhs: &Matrix, rhs: &Matrix, product: &Matrix) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = Self::write_block(&mut out, lhs, rhs, product) {
            tracing::warn!(error = %e, "failed to write multiplication");
        }
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn multiplied(&self, _lhs: &Matrix, _rhs: &Matrix, _product: &Matrix) {}
}
