//! Random matrix generation.

use std::num::NonZeroUsize;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::matrix::Element;
use crate::{Error, Matrix};

/// Largest row/column count drawn in [`Mode::Random`].
pub const MAX_RANDOM_DIM: usize = 4;

/// Largest side accepted by [`Mode::try_from_number`].
pub const MAX_SQUARE_SIDE: usize = 1024;

/// Inclusive range elements are drawn from.
pub const ELEMENT_MIN: Element = 1;
pub const ELEMENT_MAX: Element = 10;

/// Dimension policy for generated matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Rows and columns each drawn from `1..=MAX_RANDOM_DIM`.
    #[default]
    Random,
    /// Always `n × n`.
    Square(NonZeroUsize),
}

impl Mode {
    /// Numeric mode as given on the command line: `0` is random, anything
    /// else is the side of a square.
    pub fn from_number(n: usize) -> Self {
        match NonZeroUsize::new(n) {
            Some(side) => Mode::Square(side),
            None => Mode::Random,
        }
    }

    /// Like [`from_number`](Self::from_number), but rejects squares larger
    /// than [`MAX_SQUARE_SIDE`].
    pub fn try_from_number(n: usize) -> Result<Self, Error> {
        if n > MAX_SQUARE_SIDE {
            return Err(Error::SideTooLarge(n));
        }
        Ok(Self::from_number(n))
    }

    pub fn number(&self) -> usize {
        match self {
            Mode::Random => 0,
            Mode::Square(side) => side.get(),
        }
    }
}

/// Produces random matrices according to a [`Mode`].
///
/// Each generator owns its RNG, so every producer thread gets its own.
pub struct Generator {
    mode: Mode,
    rng: StdRng,
}

impl Generator {
    /// Creates a generator seeded from OS entropy.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a reproducible generator.
    pub fn seeded(mode: Mode, seed: u64) -> Self {
        Self {
            mode,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Generates one matrix. Dimensions are always at least 1×1.
    pub fn generate(&mut self) -> Matrix {
        let (rows, cols) = match self.mode {
            Mode::Random => (
                self.rng.gen_range(1..=MAX_RANDOM_DIM),
                self.rng.gen_range(1..=MAX_RANDOM_DIM),
            ),
            Mode::Square(side) => (side.get(), side.get()),
        };

        let data = (0..rows * cols)
            .map(|_| self.rng.gen_range(ELEMENT_MIN..=ELEMENT_MAX))
            .collect();

        Matrix::from_parts(rows, cols, data)
    }
}
