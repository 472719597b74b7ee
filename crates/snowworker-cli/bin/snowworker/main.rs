mod cli;

use crate::cli::{Command, CLI};
use clap::Parser;
use snowworker_cli::report::{decode, write_decoded, write_ids};
use snowworker_cli::{ClockArg, LayoutArgs};
use snowworker_flake::{Clock, MonotonicClock, Snowflake, SystemClock};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries ids only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();
    let mut out = std::io::stdout().lock();

    match config.command {
        Command::Next { worker_id, count } => {
            info!(
                worker_id,
                count,
                clock = %config.layout.clock,
                strategy = %config.layout.strategy,
                "generating ids"
            );
            match config.layout.clock {
                ClockArg::System => next(&config.layout, worker_id, count, SystemClock, &mut out)?,
                ClockArg::Monotonic => next(
                    &config.layout,
                    worker_id,
                    count,
                    MonotonicClock::new(),
                    &mut out,
                )?,
            }
        }
        Command::Decode { ids, json } => {
            let decoded = ids
                .into_iter()
                .map(|id| decode(&config.layout, id))
                .collect::<Result<Vec<_>, _>>()?;
            write_decoded(&decoded, json, &mut out)?;
        }
    }

    Ok(())
}

fn next<C: Clock>(
    layout: &LayoutArgs,
    worker_id: u32,
    count: usize,
    clock: C,
    out: &mut impl std::io::Write,
) -> Result<(), snowworker_cli::CliError> {
    let generator = Snowflake::with_clock(layout.options(worker_id), clock)?;
    write_ids(&generator, count, out)
}
