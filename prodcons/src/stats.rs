//! Per-role statistics and the shared run ledger.

use crate::counter::Counter;

/// Totals accumulated by every worker of one role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProdConsStats {
    /// Matrices this role put into or took out of the buffer.
    pub matrixtotal: usize,
    /// Sum of all elements of those matrices.
    pub sumtotal: i64,
    /// Successful multiplications (consumers only).
    pub multtotal: usize,
}

impl ProdConsStats {
    pub(crate) fn record(&mut self, sum: i64) {
        self.matrixtotal += 1;
        self.sumtotal += sum;
    }
}

/// Bookkeeping that lives under the buffer mutex next to the slots.
///
/// Keeping the quota checks, the progress counters and the stats behind the
/// same lock as occupancy gives every worker a consistent view when it
/// decides to block or to stop.
#[derive(Debug)]
pub struct Ledger {
    quota: usize,
    produced: Counter,
    consumed: Counter,
    failed: bool,
    pub(crate) producer: ProdConsStats,
    pub(crate) consumer: ProdConsStats,
}

impl Ledger {
    pub fn new(quota: usize) -> Self {
        Self {
            quota,
            produced: Counter::new(),
            consumed: Counter::new(),
            failed: false,
            producer: ProdConsStats::default(),
            consumer: ProdConsStats::default(),
        }
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    pub fn produced(&self) -> usize {
        self.produced.get()
    }

    pub fn consumed(&self) -> usize {
        self.consumed.get()
    }

    /// `true` once a worker has panicked.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Producers stop when the quota is met or the run has failed.
    pub fn production_done(&self) -> bool {
        self.failed || self.produced.get() >= self.quota
    }

    /// Consumers stop when the quota is met or the run has failed.
    pub fn consumption_done(&self) -> bool {
        self.failed || self.consumed.get() >= self.quota
    }

    pub fn producer_stats(&self) -> ProdConsStats {
        self.producer
    }

    pub fn consumer_stats(&self) -> ProdConsStats {
        self.consumer
    }

    /// Records a matrix entering the buffer; returns its sequence number.
    pub(crate) fn record_produced(&mut self, sum: i64) -> usize {
        self.producer.record(sum);
        self.produced.increment()
    }

    pub(crate) fn record_consumed(&mut self, sum: i64) {
        self.consumer.record(sum);
        self.consumed.increment();
    }

    pub(crate) fn record_multiplied(&mut self) {
        self.consumer.multtotal += 1;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.failed = true;
    }
}
