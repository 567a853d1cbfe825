//! Bounded-buffer producer/consumer pipeline over random matrices.
//!
//! Producer threads generate matrices and insert them into a shared
//! [`BoundedBuffer`] until a global quota is produced. Consumer threads
//! drain the buffer one matrix at a time, holding a left operand until a
//! right operand with a matching row count turns up, then multiply and
//! report the pair.
//!
//! # Synchronization
//!
//! - One mutex per buffer guards the slots, the progress counters and the
//!   per-role [`ProdConsStats`]
//! - Producers block on "non-full", consumers on "non-empty"; both wait in a
//!   loop that re-checks occupancy and the quota after every wake-up
//! - The worker that reaches a quota wakes every blocked thread so none of
//!   them waits on a condition that can no longer change
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//! use matrix_mul::{Generator, Mode};
//! use prodcons::{Pipeline, SilentReporter, Workers};
//!
//! let pipeline = Pipeline::new(NonZeroUsize::new(1).unwrap(), 4);
//! let summary = pipeline
//!     .run(
//!         Workers::pairs(NonZeroUsize::new(1).unwrap()),
//!         |_| {
//!             let mut generator = Generator::seeded(Mode::from_number(2), 3);
//!             move || generator.generate()
//!         },
//!         Arc::new(SilentReporter),
//!     )
//!     .unwrap();
//!
//! assert_eq!(summary.consumer.multtotal, 2);
//! ```

mod buffer;
mod consumer;
mod counter;
mod error;
mod pipeline;
mod producer;
mod report;
mod stats;

pub use buffer::{BoundedBuffer, BufferGuard};
pub use counter::Counter;
pub use error::Error;
pub use pipeline::{Pipeline, RunSummary, Workers};
pub use report::{ConsoleReporter, Reporter, SilentReporter};
pub use stats::{Ledger, ProdConsStats};
