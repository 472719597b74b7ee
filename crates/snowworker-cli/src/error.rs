use snowworker_flake::{ConfigError, GeneratorError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid generator configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("id generation failed: {0}")]
    Generator(#[from] GeneratorError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode json: {0}")]
    Json(#[from] serde_json::Error),
}
