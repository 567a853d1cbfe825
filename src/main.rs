use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use pcmatrix::config::{Cli, Settings};
use pcmatrix::{coordinator, Error};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "run failed");
            eprintln!("pcmatrix: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let settings = Settings::try_from(cli)?;
    // Workers print through their own stdout handle, so stdout must not
    // stay locked across the run.
    coordinator::run(&settings, &mut std::io::stdout())?;
    Ok(())
}
