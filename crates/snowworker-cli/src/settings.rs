use clap::{Args, ValueEnum};
use jiff::Timestamp;
use snowworker_flake::{
    GeneratorOptions, IdLayout, SequenceStrategy, DEFAULT_BASE_TIME, DEFAULT_SEQ_BITS,
    DEFAULT_WORKER_ID_BITS,
};
use std::fmt::{Display, Formatter};

pub const WORKER_ID_ENV: &str = "SNOWWORKER_WORKER_ID";
pub const WORKER_ID_BITS_ENV: &str = "SNOWWORKER_WORKER_ID_BITS";
pub const SEQ_BITS_ENV: &str = "SNOWWORKER_SEQ_BITS";
pub const BASE_TIME_ENV: &str = "SNOWWORKER_BASE_TIME";
pub const TIME_UNIT_MILLIS_ENV: &str = "SNOWWORKER_TIME_UNIT_MILLIS";
pub const MIN_SEQ_NUMBER_ENV: &str = "SNOWWORKER_MIN_SEQ_NUMBER";
pub const STRATEGY_ENV: &str = "SNOWWORKER_STRATEGY";
pub const RANDOM_OFFSET_ENV: &str = "SNOWWORKER_RANDOM_OFFSET";
pub const CLOCK_ENV: &str = "SNOWWORKER_CLOCK";

pub const DEFAULT_RANDOM_OFFSET: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    #[value(name = "baseline")]
    Baseline,
    #[value(name = "randomized")]
    Randomized,
}

impl Display for StrategyArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyArg::Baseline => write!(f, "baseline"),
            StrategyArg::Randomized => write!(f, "randomized"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClockArg {
    #[value(name = "system")]
    System,
    #[value(name = "monotonic")]
    Monotonic,
}

impl Display for ClockArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockArg::System => write!(f, "system"),
            ClockArg::Monotonic => write!(f, "monotonic"),
        }
    }
}

/// Id layout and sequencing shared by every peer in a fleet.
///
/// All of these must agree across workers, otherwise their ids are not
/// comparable.
#[derive(Debug, Clone, Args)]
pub struct LayoutArgs {
    #[arg(long, env = WORKER_ID_BITS_ENV, default_value_t = DEFAULT_WORKER_ID_BITS)]
    pub worker_id_bits: u8,

    #[arg(long, env = SEQ_BITS_ENV, default_value_t = DEFAULT_SEQ_BITS)]
    pub seq_bits: u8,

    #[arg(long, env = BASE_TIME_ENV, default_value_t = DEFAULT_BASE_TIME)]
    pub base_time: Timestamp,

    #[arg(long, env = TIME_UNIT_MILLIS_ENV, default_value_t = 1)]
    pub time_unit_millis: u32,

    #[arg(long, env = MIN_SEQ_NUMBER_ENV, default_value_t = 0)]
    pub min_seq_number: u32,

    #[arg(
        long,
        env = STRATEGY_ENV,
        value_enum,
        default_value_t = StrategyArg::Baseline
    )]
    pub strategy: StrategyArg,

    /// Largest offset added to the first sequence number of each tick.
    #[arg(long, env = RANDOM_OFFSET_ENV, default_value_t = DEFAULT_RANDOM_OFFSET)]
    pub random_offset: u32,

    #[arg(long, env = CLOCK_ENV, value_enum, default_value_t = ClockArg::System)]
    pub clock: ClockArg,
}

impl LayoutArgs {
    pub fn strategy(&self) -> SequenceStrategy {
        match self.strategy {
            StrategyArg::Baseline => SequenceStrategy::Baseline,
            StrategyArg::Randomized => SequenceStrategy::Randomized {
                max_offset: self.random_offset,
            },
        }
    }

    pub fn layout(&self) -> IdLayout {
        IdLayout::new(self.worker_id_bits, self.seq_bits)
    }

    pub fn options(&self, worker_id: u32) -> GeneratorOptions {
        GeneratorOptions::builder()
            .worker_id(worker_id)
            .worker_id_bits(self.worker_id_bits)
            .seq_bits(self.seq_bits)
            .base_time(self.base_time)
            .time_unit_millis(self.time_unit_millis)
            .min_seq_number(self.min_seq_number)
            .strategy(self.strategy())
            .build()
    }
}
