use clap::{Parser, Subcommand};
use snowworker_cli::settings::{LayoutArgs, WORKER_ID_ENV};
use snowworker_flake::SnowflakeId;

pub const DEFAULT_COUNT: usize = 1;

#[derive(Debug, Parser)]
#[command(name = "snowworker", about = "Generate and inspect snowflake ids")]
pub struct CLI {
    #[command(flatten)]
    pub layout: LayoutArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print fresh ids, one per line.
    Next {
        /// Identity of this worker; must be unique among live workers.
        #[arg(long, env = WORKER_ID_ENV)]
        worker_id: u32,

        #[arg(short = 'n', long, default_value_t = DEFAULT_COUNT)]
        count: usize,
    },
    /// Print the fields packed into existing ids.
    Decode {
        #[arg(required = true, value_parser = parse_id)]
        ids: Vec<SnowflakeId>,

        #[arg(long)]
        json: bool,
    },
}

fn parse_id(value: &str) -> Result<SnowflakeId, std::num::ParseIntError> {
    value.parse::<u64>().map(SnowflakeId::from_raw)
}
