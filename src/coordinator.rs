use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use matrix_mul::Generator;
use prodcons::{ConsoleReporter, Pipeline, Reporter, SilentReporter, Workers};
use tracing::{info, warn};

use crate::Error;
use crate::config::Settings;
use crate::report::{self, RunReport};

/// Runs one full pipeline with console reporting.
pub fn run(settings: &Settings, out: &mut impl Write) -> Result<RunReport, Error> {
    let reporter: Arc<dyn Reporter> = if settings.quiet {
        Arc::new(SilentReporter)
    } else {
        Arc::new(ConsoleReporter)
    };
    run_with(settings, reporter, out)
}

/// Prints the banner, runs the workers to completion, and prints the totals.
pub fn run_with(
    settings: &Settings,
    reporter: Arc<dyn Reporter>,
    out: &mut impl Write,
) -> Result<RunReport, Error> {
    report::write_banner(out, settings)?;
    out.flush()?;

    let started_at = Utc::now();
    let pipeline = Pipeline::new(settings.buffer_size, settings.matrices.get());
    let mode = settings.mode;
    let seed = settings.seed;
    let summary = pipeline.run(
        Workers::pairs(settings.workers),
        move |i| {
            let mut generator = match seed {
                Some(seed) => Generator::seeded(mode, seed.wrapping_add(i as u64)),
                None => Generator::new(mode),
            };
            move || generator.generate()
        },
        reporter,
    )?;
    let finished_at = Utc::now();

    let report = RunReport {
        summary,
        started_at,
        finished_at,
    };
    info!(
        started_at = %report.started_at,
        elapsed_ms = report.elapsed_ms(),
        high_water = summary.high_water,
        "run complete"
    );
    if !summary.is_conserved() {
        warn!(
            produced = summary.producer.matrixtotal,
            consumed = summary.consumer.matrixtotal,
            produced_sum = summary.producer.sumtotal,
            consumed_sum = summary.consumer.sumtotal,
            "produced and consumed totals differ"
        );
    }

    report::write_totals(out, &report.summary)?;
    out.flush()?;
    Ok(report)
}
