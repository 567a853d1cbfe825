//! Matrix utilities for the producer/consumer pipeline.
//!
//! `matrix-mul` provides a small dense integer [`Matrix`] with element sums,
//! a row-major text rendering, the dimension check and multiplication used
//! by consumers, and a seedable random [`Generator`] used by producers.
//!
//! # Example
//!
//! ```
//! use matrix_mul::{Generator, Matrix, Mode};
//!
//! let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
//! let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
//! let c = a.multiply(&b).unwrap();
//! assert_eq!(c.sum(), 19 + 22 + 43 + 50);
//!
//! let mut generator = Generator::seeded(Mode::from_number(2), 42);
//! let m = generator.generate();
//! assert_eq!((m.rows(), m.cols()), (2, 2));
//! ```

mod error;
mod generate;
mod matrix;

pub use error::Error;
pub use generate::{ELEMENT_MAX, ELEMENT_MIN, Generator, MAX_RANDOM_DIM, MAX_SQUARE_SIDE, Mode};
pub use matrix::{Element, Matrix};
