use std::fmt;
use std::num::NonZeroUsize;

use clap::Parser;
use matrix_mul::Mode;

use crate::Error;

pub const DEFAULT_WORKERS: usize = 1;
pub const DEFAULT_BUFFER_SIZE: usize = 200;
pub const DEFAULT_MATRICES: usize = 1200;
pub const DEFAULT_MODE: usize = 0;

/// Command line. Positional arguments only take effect when every earlier
/// position is also given.
#[derive(Debug, Parser)]
#[command(name = "pcmatrix")]
#[command(about = "Produce random matrices on worker threads and multiply compatible pairs", long_about = None)]
pub struct Cli {
    /// Number of producer/consumer thread pairs
    #[arg(default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Bounded buffer capacity
    #[arg(default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Total matrices to produce and consume
    #[arg(default_value_t = DEFAULT_MATRICES)]
    pub matrices: usize,

    /// Matrix mode: 0 for random shapes up to 4x4, n for n x n squares (n <= 1024)
    #[arg(default_value_t = DEFAULT_MODE)]
    pub mode: usize,

    /// Seed for reproducible matrices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only print the banner and the final totals
    #[arg(short, long)]
    pub quiet: bool,
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub workers: NonZeroUsize,
    pub buffer_size: NonZeroUsize,
    pub matrices: NonZeroUsize,
    pub mode: Mode,
    pub seed: Option<u64>,
    pub quiet: bool,
}

impl Settings {
    /// `true` when none of the positional values differ from the defaults.
    pub fn is_default(&self) -> bool {
        self.workers.get() == DEFAULT_WORKERS
            && self.buffer_size.get() == DEFAULT_BUFFER_SIZE
            && self.matrices.get() == DEFAULT_MATRICES
            && self.mode.number() == DEFAULT_MODE
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workers: NonZeroUsize::MIN,
            buffer_size: NonZeroUsize::new(DEFAULT_BUFFER_SIZE).unwrap_or(NonZeroUsize::MIN),
            matrices: NonZeroUsize::new(DEFAULT_MATRICES).unwrap_or(NonZeroUsize::MIN),
            mode: Mode::Random,
            seed: None,
            quiet: false,
        }
    }
}

impl TryFrom<Cli> for Settings {
    type Error = Error;

    fn try_from(cli: Cli) -> Result<Self, Error> {
        let positive = |value: usize, name| NonZeroUsize::new(value).ok_or(Error::NonPositive(name));

        Ok(Self {
            workers: positive(cli.workers, "worker thread count")?,
            buffer_size: positive(cli.buffer_size, "bounded buffer size")?,
            matrices: positive(cli.matrices, "number of matrices")?,
            mode: Mode::try_from_number(cli.mode)?,
            seed: cli.seed,
            quiet: cli.quiet,
        })
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "worker_threads={} bounded_buffer_size={} matrices={} matrix_mode={}",
            self.workers,
            self.buffer_size,
            self.matrices,
            self.mode.number()
        )
    }
}
