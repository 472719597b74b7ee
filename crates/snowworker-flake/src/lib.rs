//! Snowflake-style 64-bit id generation.
//!
//! Each id packs `tick | worker_id | sequence`, where the tick counts time
//! units since a configured base time. One [`Snowflake`] instance owns one
//! worker id and hands out strictly increasing ids to any number of threads.

mod clock;
pub mod error;
mod generator;
mod id;
mod options;
mod sequence;

pub use clock::{Clock, MonotonicClock, SystemClock, TickClock};
pub use error::{ConfigError, GeneratorError};
pub use generator::Snowflake;
pub use id::{IdLayout, IdParts, SnowflakeId};
pub use options::{
    GeneratorOptions, SequenceStrategy, DEFAULT_BASE_TIME, DEFAULT_SEQ_BITS,
    DEFAULT_WORKER_ID_BITS,
};
pub use sequence::{Allocation, SequenceAllocator};
