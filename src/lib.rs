//! Producer/consumer matrix multiplication driver.
//!
//! Parses the run configuration, starts equal numbers of producer and
//! consumer threads over one bounded buffer, prints every multiplied pair,
//! and reports the produced and consumed totals once all threads have
//! been joined.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod report;

pub use error::Error;
