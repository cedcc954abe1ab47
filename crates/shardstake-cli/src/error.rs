//! CLI error type.

use shardstake_state::StateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate peer key '{0}' in input")]
    DuplicateInput(String),
    #[error(transparent)]
    State(#[from] StateError),
}
