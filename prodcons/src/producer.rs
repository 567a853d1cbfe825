//! Producer worker: generates matrices until the production quota is met.

use std::sync::Arc;

use matrix_mul::Matrix;
use tracing::{debug, trace};

use crate::pipeline::SharedBuffer;
use crate::stats::Ledger;

pub struct Producer<S> {
    index: usize,
    buffer: Arc<SharedBuffer>,
    source: S,
}

impl<S> Producer<S>
where
    S: FnMut() -> Matrix,
{
    pub fn new(index: usize, buffer: Arc<SharedBuffer>, source: S) -> Self {
        Self {
            index,
            buffer,
            source,
        }
    }

    /// Runs until the global produced count reaches the quota.
    ///
    /// Returns the number of matrices this worker inserted.
    pub fn run(mut self) -> usize {
        debug!(worker = self.index, "producer started");
        let mut inserted = 0;

        loop {
            // Generation happens outside the lock. A matrix generated after
            // the quota is met is dropped without being counted.
            let matrix = (self.source)();
            let sum = matrix.sum();

            let mut guard = self.buffer.lock().wait_for_space(Ledger::production_done);
            if guard.ledger().production_done() {
                guard.wake_all();
                break;
            }

            let id = guard.ledger().produced() as u64;
            if guard.push(matrix.with_id(id)).is_err() {
                unreachable!("wait_for_space returned with a full buffer");
            }
            guard.ledger_mut().record_produced(sum);
            inserted += 1;
            trace!(worker = self.index, id, sum, len = guard.len(), "put");

            if guard.ledger().production_done() {
                // Producers still blocked on a full buffer must observe the
                // quota rather than wait for a slot that nobody needs.
                guard.wake_all();
                break;
            }
        }

        debug!(worker = self.index, inserted, "producer finished");
        inserted
    }
}
