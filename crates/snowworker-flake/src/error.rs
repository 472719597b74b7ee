use jiff::Timestamp;
use thiserror::Error;

/// Errors returned while validating [`GeneratorOptions`](crate::GeneratorOptions)
/// at construction time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid worker id bits {bits}; expected {min}..={max}")]
    InvalidWorkerIdBits { bits: u8, min: u8, max: u8 },
    #[error("invalid sequence bits {bits}; expected {min}..={max}")]
    InvalidSeqBits { bits: u8, min: u8, max: u8 },
    #[error(
        "worker id bits ({worker_id_bits}) + sequence bits ({seq_bits}) exceed the budget of {max}"
    )]
    BitBudgetExceeded {
        worker_id_bits: u8,
        seq_bits: u8,
        max: u8,
    },
    #[error("invalid worker id {worker_id}; expected 0..={max_worker_id}")]
    InvalidWorkerId { worker_id: u32, max_worker_id: u32 },
    #[error("time unit must be at least one millisecond")]
    ZeroTimeUnit,
    #[error(
        "empty sequence range: min {min_seq_number} + random offset {max_offset} exceeds max {max_seq_number}"
    )]
    EmptySequenceRange {
        min_seq_number: u32,
        max_offset: u32,
        max_seq_number: u32,
    },
    #[error("base time is ahead of current clock time: base={base_time}, now={now}")]
    EpochAhead { base_time: Timestamp, now: Timestamp },
    #[error("timestamp field exhausted: tick {tick} exceeds max tick {max_tick}")]
    EpochExhausted { tick: i64, max_tick: i64 },
}

/// Errors returned by [`Snowflake::next_id`](crate::Snowflake::next_id).
///
/// The generator never retries on its own; whether to back off and try again
/// or to abort is up to the caller. `EpochExhausted` is permanent for the
/// configured base time and layout.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("clock moved backwards by {delta_ticks} tick(s): last={last_tick}, now={current_tick}")]
    ClockRegression {
        delta_ticks: i64,
        last_tick: i64,
        current_tick: i64,
    },
    #[error("timestamp field exhausted: tick {tick} exceeds max tick {max_tick}")]
    EpochExhausted { tick: i64, max_tick: i64 },
}
