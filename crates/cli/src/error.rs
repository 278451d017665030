use connectors::error::StoreError;
use engine_core::error::CloneError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to write the output file: {0}")]
    OutputWrite(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Clone error: {0}")]
    Clone(#[from] CloneError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid chunk size {0}; must be between 1 and 25")]
    InvalidChunkSize(usize),

    #[error("Table '{0}' was not found")]
    TableNotFound(String),

    /// Raised after the summary has been printed so the process exits
    /// non-zero on a partial result.
    #[error("Operation did not fully complete")]
    Incomplete,
}
