//! Command-line front end for `snowworker-flake`.
//!
//! The worker id comes from a flag or the environment; everything else about
//! the id layout is shared configuration.

pub mod error;
pub mod report;
pub mod settings;

pub use error::CliError;
pub use settings::{ClockArg, LayoutArgs, StrategyArg};
