use std::io::Write;

use chrono::{DateTime, Utc};
use prodcons::RunSummary;

use crate::config::Settings;

/// Outcome of one coordinator run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

pub fn write_banner(out: &mut impl Write, settings: &Settings) -> std::io::Result<()> {
    if settings.is_default() {
        writeln!(out, "USING DEFAULTS: {settings}")?;
    } else {
        writeln!(out, "USING: {settings}")?;
    }
    writeln!(
        out,
        "Producing {} matrices in mode {}.",
        settings.matrices,
        settings.mode.number()
    )?;
    writeln!(out, "Using a shared buffer of size={}", settings.buffer_size)?;
    writeln!(out, "With {} producer and consumer thread(s).", settings.workers)?;
    writeln!(out)
}

pub fn write_totals(out: &mut impl Write, summary: &RunSummary) -> std::io::Result<()> {
    writeln!(
        out,
        "Sum of Matrix elements --> Produced={} = Consumed={}",
        summary.producer.sumtotal, summary.consumer.sumtotal
    )?;
    writeln!(
        out,
        "Matrices produced={} consumed={} multiplied={}",
        summary.producer.matrixtotal, summary.consumer.matrixtotal, summary.consumer.multtotal
    )
}
