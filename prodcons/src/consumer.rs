//! Consumer worker: drains the buffer looking for multiplicable pairs.

use std::sync::Arc;

use matrix_mul::Matrix;
use tracing::{debug, trace};

use crate::buffer::BufferGuard;
use crate::pipeline::SharedBuffer;
use crate::report::Reporter;
use crate::stats::Ledger;

enum State {
    /// Waiting for the left operand.
    WantFirst,
    /// Holding the left operand, drawing right operands until one fits.
    HaveFirst(Matrix),
}

pub struct Consumer {
    index: usize,
    buffer: Arc<SharedBuffer>,
    reporter: Arc<dyn Reporter>,
}

impl Consumer {
    pub fn new(index: usize, buffer: Arc<SharedBuffer>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            index,
            buffer,
            reporter,
        }
    }

    /// Runs until the global consumed count reaches the quota.
    ///
    /// Every removed matrix is counted as consumed exactly once, including
    /// right operands that did not fit and a left operand still waiting for
    /// a partner when the quota runs out. Returns the number of
    /// multiplications this worker performed.
    pub fn run(self) -> usize {
        debug!(worker = self.index, "consumer started");
        let mut multiplied = 0;
        let mut state = State::WantFirst;
        let mut guard = self.buffer.lock();

        loop {
            guard = guard.wait_for_item(Ledger::consumption_done);
            let Some(matrix) = self.take(&mut guard) else {
                break;
            };

            state = match state {
                State::WantFirst => State::HaveFirst(matrix),
                State::HaveFirst(first) => match first.multiply(&matrix) {
                    Ok(product) => {
                        guard.ledger_mut().record_multiplied();
                        drop(guard);

                        self.reporter.multiplied(&first, &matrix, &product);
                        multiplied += 1;

                        guard = self.buffer.lock();
                        State::WantFirst
                    }
                    Err(e) => {
                        trace!(worker = self.index, lhs = first.id(), rhs = matrix.id(), error = %e, "discarding");
                        State::HaveFirst(first)
                    }
                },
            };
        }

        if let State::HaveFirst(first) = state {
            debug!(worker = self.index, id = first.id(), "quota reached with an unpaired matrix");
        }
        debug!(worker = self.index, multiplied, "consumer finished");
        multiplied
    }

    /// Removes one matrix and records it, or returns `None` once the quota
    /// is met. The quota is checked before the removal so that no matrix is
    /// taken past it.
    fn take(&self, guard: &mut BufferGuard<'_, Matrix, Ledger>) -> Option<Matrix> {
        if guard.ledger().consumption_done() {
            guard.wake_all();
            return None;
        }

        let matrix = guard.pop()?;
        guard.ledger_mut().record_consumed(matrix.sum());
        self.reporter.consumed(&matrix);
        trace!(worker = self.index, id = matrix.id(), len = guard.len(), "get");

        if guard.ledger().consumption_done() {
            guard.wake_all();
        }
        Some(matrix)
    }
}
