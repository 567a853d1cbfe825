//! Spawning and joining the producer and consumer threads.

use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use matrix_mul::Matrix;
use tracing::{error, info};

use crate::buffer::BoundedBuffer;
use crate::consumer::Consumer;
use crate::error::Error;
use crate::producer::Producer;
use crate::report::Reporter;
use crate::stats::{Ledger, ProdConsStats};

pub(crate) type SharedBuffer = BoundedBuffer<Matrix, Ledger>;

/// Number of worker threads per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workers {
    pub producers: NonZeroUsize,
    pub consumers: NonZeroUsize,
}

impl Workers {
    /// `n` producers and `n` consumers.
    pub fn pairs(n: NonZeroUsize) -> Self {
        Self {
            producers: n,
            consumers: n,
        }
    }
}

/// Final totals of a run, read after every worker has been joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub producer: ProdConsStats,
    pub consumer: ProdConsStats,
    /// Peak buffer occupancy.
    pub high_water: usize,
    /// Matrices still queued after the join. Zero for a correct run.
    pub leftover: usize,
}

impl RunSummary {
    /// Everything produced was consumed, element for element.
    pub fn is_conserved(&self) -> bool {
        self.producer.matrixtotal == self.consumer.matrixtotal
            && self.producer.sumtotal == self.consumer.sumtotal
    }
}

/// One buffer, one quota, and the threads that share them.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use std::sync::Arc;
/// use matrix_mul::{Generator, Mode};
/// use prodcons::{Pipeline, SilentReporter, Workers};
///
/// let pipeline = Pipeline::new(NonZeroUsize::new(4).unwrap(), 20);
/// let workers = Workers::pairs(NonZeroUsize::new(2).unwrap());
/// let summary = pipeline
///     .run(
///         workers,
///         |i| {
///             let mut generator = Generator::seeded(Mode::Random, i as u64);
///             move || generator.generate()
///         },
///         Arc::new(SilentReporter),
///     )
///     .unwrap();
///
/// assert_eq!(summary.producer.matrixtotal, 20);
/// assert!(summary.is_conserved());
/// ```
pub struct Pipeline {
    buffer: Arc<SharedBuffer>,
}

impl Pipeline {
    /// Creates a pipeline that will produce and consume `quota` matrices
    /// through a buffer of `capacity` slots.
    pub fn new(capacity: NonZeroUsize, quota: usize) -> Self {
        Self {
            buffer: Arc::new(BoundedBuffer::with_ledger(capacity, Ledger::new(quota))),
        }
    }

    /// Spawns the workers, waits for all of them, and returns the totals.
    ///
    /// `source` is called once per producer with the producer index and
    /// returns that producer's matrix source. A spawn failure is returned
    /// immediately; threads already started are left running. If any worker
    /// panics, the others stop at their next quota check and the earliest
    /// spawned worker that panicked is reported as [`Error::WorkerPanicked`].
    pub fn run<F, S>(
        self,
        workers: Workers,
        mut source: F,
        reporter: Arc<dyn Reporter>,
    ) -> Result<RunSummary, Error>
    where
        F: FnMut(usize) -> S,
        S: FnMut() -> Matrix + Send + 'static,
    {
        let quota = self.buffer.lock().ledger().quota();
        info!(
            producers = workers.producers.get(),
            consumers = workers.consumers.get(),
            capacity = self.buffer.capacity(),
            quota,
            "starting pipeline"
        );

        let mut handles = Vec::with_capacity(workers.producers.get() + workers.consumers.get());
        for i in 0..workers.producers.get().max(workers.consumers.get()) {
            if i < workers.producers.get() {
                let producer = Producer::new(i, Arc::clone(&self.buffer), source(i));
                handles.push(spawn(
                    format!("producer-{i}"),
                    Arc::clone(&self.buffer),
                    move || producer.run(),
                )?);
            }
            if i < workers.consumers.get() {
                let consumer = Consumer::new(i, Arc::clone(&self.buffer), Arc::clone(&reporter));
                handles.push(spawn(
                    format!("consumer-{i}"),
                    Arc::clone(&self.buffer),
                    move || consumer.run(),
                )?);
            }
        }

        // Join every handle before reporting, so no worker outlives the run.
        let mut panicked = None;
        for (name, handle) in handles {
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(name);
            }
        }
        if let Some(name) = panicked {
            return Err(Error::WorkerPanicked(name));
        }

        let guard = self.buffer.lock();
        let summary = RunSummary {
            producer: guard.ledger().producer_stats(),
            consumer: guard.ledger().consumer_stats(),
            high_water: guard.high_water(),
            leftover: guard.len(),
        };
        drop(guard);

        info!(
            produced = summary.producer.matrixtotal,
            consumed = summary.consumer.matrixtotal,
            multiplied = summary.consumer.multtotal,
            high_water = summary.high_water,
            "pipeline finished"
        );
        Ok(summary)
    }
}

/// Spawns a named worker. A panic in `work` marks the ledger as failed and
/// wakes every blocked worker before the panic continues to the join.
fn spawn(
    name: String,
    buffer: Arc<SharedBuffer>,
    work: impl FnOnce() -> usize + Send + 'static,
) -> Result<(String, JoinHandle<usize>), Error> {
    let worker = move || match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(done) => done,
        Err(payload) => {
            let mut guard = buffer.lock();
            guard.ledger_mut().mark_failed();
            guard.wake_all();
            drop(guard);
            error!(
                worker = thread::current().name().unwrap_or("worker"),
                "worker panicked, stopping pipeline"
            );
            panic::resume_unwind(payload)
        }
    };

    match thread::Builder::new().name(name.clone()).spawn(worker) {
        Ok(handle) => Ok((name, handle)),
        Err(source) => Err(Error::Spawn { name, source }),
    }
}
